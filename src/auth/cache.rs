//! Challenge cache keyed by exact request URL
//!
//! Owned by a client instance and shared between its clones. Writes are
//! atomic upserts, so concurrent requests racing to discover the same
//! challenge at worst send a duplicated probe.

use super::challenge::BearerChallenge;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    challenge: BearerChallenge,
    stored_at: Instant,
}

/// URL to challenge map with an optional time-to-live
#[derive(Debug, Clone, Default)]
pub struct ChallengeCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    ttl: Option<Duration>,
}

impl ChallengeCache {
    /// Cache whose entries never expire
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache whose entries are re-discovered after `ttl`
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Challenge previously stored for exactly this URL
    pub fn get(&self, url: &str) -> Option<BearerChallenge> {
        let expired = match self.entries.get(url) {
            Some(entry) if !self.is_expired(&entry) => return Some(entry.challenge.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!(url, "Evicting expired bearer challenge");
            self.entries.remove_if(url, |_, entry| self.is_expired(entry));
        }
        None
    }

    /// Store (or replace) the challenge for a URL
    pub fn insert(&self, url: impl Into<String>, challenge: BearerChallenge) {
        self.entries.insert(
            url.into(),
            CacheEntry {
                challenge,
                stored_at: Instant::now(),
            },
        );
    }

    /// Forget the challenge for a URL
    pub fn remove(&self, url: &str) -> Option<BearerChallenge> {
        self.entries.remove(url).map(|(_, entry)| entry.challenge)
    }

    /// Forget every challenge
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.stored_at.elapsed() >= ttl)
    }
}
