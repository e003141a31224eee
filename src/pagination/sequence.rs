//! Lazy, cached, restartable paged sequence
//!
//! Every enumeration replays the shared cache first and only then asks the
//! fetcher for more pages. The cache is append-only, so all consumers observe
//! a consistent prefix no matter when they started.

use super::types::PageFetcher;
use crate::error::{Error, Result};
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct SequenceState<T> {
    cache: Vec<T>,
    fetcher: Box<dyn PageFetcher<T>>,
}

/// Position of one enumeration over the shared cache
struct Position {
    index: usize,
    headers: HeaderMap,
    cancel: CancellationToken,
}

/// A resource list that is fetched lazily and cached for re-enumeration
///
/// Clones share the same cache and fetcher.
pub struct PagedSequence<T> {
    state: Arc<Mutex<SequenceState<T>>>,
}

impl<T> Clone for PagedSequence<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> PagedSequence<T>
where
    T: Clone + Send + 'static,
{
    /// Create a sequence over a fetcher
    pub fn new(fetcher: impl PageFetcher<T> + 'static) -> Self {
        Self::from_boxed(Box::new(fetcher))
    }

    /// Create a sequence over a boxed fetcher
    pub fn from_boxed(fetcher: Box<dyn PageFetcher<T>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SequenceState {
                cache: Vec::new(),
                fetcher,
            })),
        }
    }

    /// Enumerate with no extra headers and no cancellation
    pub fn stream(&self) -> impl Stream<Item = Result<T>> + Send + '_ {
        self.stream_with(HeaderMap::new(), CancellationToken::new())
    }

    /// Enumerate, sending `headers` with every page request
    ///
    /// Cancellation is observed while a page is being fetched; items already
    /// cached are replayed regardless.
    pub fn stream_with(
        &self,
        headers: HeaderMap,
        cancel: CancellationToken,
    ) -> impl Stream<Item = Result<T>> + Send + '_ {
        let start = Position {
            index: 0,
            headers,
            cancel,
        };

        stream::try_unfold(start, move |mut position| async move {
            let mut state = self.state.lock().await;

            while position.index >= state.cache.len() {
                if state.fetcher.is_on_last_page() {
                    return Ok::<_, Error>(None);
                }
                let page = state
                    .fetcher
                    .fetch_next_page(&position.headers, &position.cancel)
                    .await?;
                debug!(
                    fetched = page.len(),
                    cached = state.cache.len() + page.len(),
                    "Appending page to sequence cache"
                );
                state.cache.extend(page);
            }

            let item = state.cache[position.index].clone();
            position.index += 1;
            Ok(Some((item, position)))
        })
    }

    /// Drain the sequence into a vector
    pub async fn collect_all(&self) -> Result<Vec<T>> {
        self.stream().try_collect().await
    }

    /// Number of items cached so far
    pub async fn cached_len(&self) -> usize {
        self.state.lock().await.cache.len()
    }

    /// Snapshot of the cached items
    pub async fn cached(&self) -> Vec<T> {
        self.state.lock().await.cache.clone()
    }

    /// Check if every page has been fetched
    pub async fn is_exhausted(&self) -> bool {
        self.state.lock().await.fetcher.is_on_last_page()
    }
}

impl<T> std::fmt::Debug for PagedSequence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedSequence").finish_non_exhaustive()
    }
}
