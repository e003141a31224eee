//! Generic cursor-driven page fetcher
//!
//! One fetcher type for every resource: the resource-specific part is a page
//! function `(PageRequest) -> Page<T>` supplied as a closure.

use super::types::{Page, PageFetcher, PageRequest};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Page fetcher driven by a continuation cursor
pub struct CursorFetcher<F> {
    page_fn: F,
    cursor: Option<String>,
    on_last_page: bool,
    pages_fetched: usize,
}

impl<F> CursorFetcher<F> {
    /// Wrap a page function
    pub fn new(page_fn: F) -> Self {
        Self {
            page_fn,
            cursor: None,
            on_last_page: false,
            pages_fetched: 0,
        }
    }

    /// Cursor the next call will send
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Number of page-function calls that succeeded
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for CursorFetcher<F>
where
    T: Send,
    F: FnMut(PageRequest) -> Fut + Send,
    Fut: Future<Output = Result<Page<T>>> + Send,
{
    fn is_on_last_page(&self) -> bool {
        self.on_last_page
    }

    async fn fetch_next_page(
        &mut self,
        headers: &HeaderMap,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>> {
        if self.on_last_page {
            return Ok(Vec::new());
        }

        let request = PageRequest {
            cursor: self.cursor.clone(),
            headers: headers.clone(),
        };
        let page = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Error::Cancelled),
            page = (self.page_fn)(request) => page?,
        };

        self.pages_fetched += 1;
        self.cursor = page.next_cursor.filter(|c| !c.is_empty());
        self.on_last_page = self.cursor.is_none();
        debug!(
            page = self.pages_fetched,
            items = page.items.len(),
            last = self.on_last_page,
            "Fetched page"
        );

        Ok(page.items)
    }
}

impl<F> std::fmt::Debug for CursorFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorFetcher")
            .field("cursor", &self.cursor)
            .field("on_last_page", &self.on_last_page)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}
