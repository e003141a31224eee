//! Challenge-cached authenticator implementation
//!
//! Decides, per outgoing request, whether a bearer token can be attached
//! straight from a cached challenge or whether an unauthenticated probe is
//! needed to discover the challenge first.

use super::cache::ChallengeCache;
use super::challenge::BearerChallenge;
use super::provider::{TokenProvider, TokenRequest};
use crate::error::{Error, Result};
use crate::types::CloudEnvironment;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Request, StatusCode};
use std::sync::Arc;
use tracing::debug;

/// Which path `authorize` took for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Token attached from a cached challenge, no probe sent
    CachedChallenge,
    /// Probe returned a bearer challenge and a token was attached
    Challenged,
    /// No token attached; the request goes out as it was
    PassThrough,
}

impl AuthOutcome {
    /// Check if a bearer token was attached
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::CachedChallenge | Self::Challenged)
    }
}

/// Attaches bearer tokens to requests using server-issued challenges
#[derive(Clone)]
pub struct ChallengeAuthenticator {
    /// Token acquisition callback
    provider: Arc<dyn TokenProvider>,
    /// URL to challenge map
    cache: ChallengeCache,
    /// Supplies the resource passed to the provider
    environment: CloudEnvironment,
    /// Transport for probe requests
    http_client: Client,
}

impl ChallengeAuthenticator {
    /// Create an authenticator for the global cloud with a fresh cache
    pub fn new(provider: impl TokenProvider + 'static) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    /// Create an authenticator from a shared provider
    pub fn from_arc(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            cache: ChallengeCache::new(),
            environment: CloudEnvironment::default(),
            http_client: Client::new(),
        }
    }

    /// Use a different cloud environment
    #[must_use]
    pub fn with_environment(mut self, environment: CloudEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Use an existing (possibly shared) challenge cache
    #[must_use]
    pub fn with_cache(mut self, cache: ChallengeCache) -> Self {
        self.cache = cache;
        self
    }

    /// Send probes through the given client
    #[must_use]
    pub fn with_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// The challenge cache
    pub fn cache(&self) -> &ChallengeCache {
        &self.cache
    }

    /// The cloud environment
    pub fn environment(&self) -> &CloudEnvironment {
        &self.environment
    }

    /// Authorize a request in place
    ///
    /// The `Authorization` header is only set when a token is obtained.
    /// Token provider failures and probe transport failures propagate.
    pub async fn authorize(&self, request: &mut Request) -> Result<AuthOutcome> {
        let url = request.url().as_str().to_string();

        if let Some(challenge) = self.cache.get(&url) {
            debug!(url = %url, "Bearer challenge cache hit");
            if let Some(token) = self.acquire(&challenge).await? {
                attach_bearer(request, &token)?;
                return Ok(AuthOutcome::CachedChallenge);
            }
            debug!(url = %url, "No token for cached challenge, probing");
        }

        let probe = Request::new(request.method().clone(), request.url().clone());
        let response = self.http_client.execute(probe).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            debug!(url = %url, status = response.status().as_u16(), "Probe not challenged");
            return Ok(AuthOutcome::PassThrough);
        }

        let Some(challenge) = BearerChallenge::from_headers(response.headers()) else {
            debug!(url = %url, "401 without a usable bearer challenge");
            return Ok(AuthOutcome::PassThrough);
        };

        debug!(
            url = %url,
            authority = %challenge.authorization_server,
            scope = %challenge.scope,
            "Caching bearer challenge"
        );
        self.cache.insert(url, challenge.clone());

        match self.acquire(&challenge).await? {
            Some(token) => {
                attach_bearer(request, &token)?;
                Ok(AuthOutcome::Challenged)
            }
            None => Ok(AuthOutcome::PassThrough),
        }
    }

    async fn acquire(&self, challenge: &BearerChallenge) -> Result<Option<String>> {
        let token = self
            .provider
            .acquire_token(TokenRequest {
                authority: challenge.authorization_server.clone(),
                resource: self.environment.resource_manager_endpoint().to_string(),
                scope: challenge.scope.clone(),
            })
            .await?;
        Ok(token.filter(|t| !t.is_empty()))
    }
}

impl std::fmt::Debug for ChallengeAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeAuthenticator")
            .field("environment", &self.environment)
            .field("cached_challenges", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Set `Authorization: Bearer <token>` on a request
fn attach_bearer(request: &mut Request, token: &str) -> Result<()> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| Error::auth(format!("Token is not a valid header value: {e}")))?;
    value.set_sensitive(true);
    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(())
}
