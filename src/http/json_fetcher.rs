//! JSON list endpoints as page fetchers
//!
//! A list response is a JSON object with an item array (`value` by default)
//! and a continuation field described by a `ContinuationStyle`.

use super::client::{HttpClient, RequestConfig};
use crate::error::{Error, Result};
use crate::pagination::{ContinuationStyle, CursorFetcher, Page, PageFetcher, PageRequest, PagedSequence};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Describes how to list one resource collection
#[derive(Debug, Clone)]
pub struct JsonPageFetcher {
    client: HttpClient,
    url: String,
    items_field: String,
    continuation: ContinuationStyle,
    query: HashMap<String, String>,
}

impl JsonPageFetcher {
    /// List `url` reading items from `value` and the cursor from `continuationToken`
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            items_field: "value".to_string(),
            continuation: ContinuationStyle::continuation_token(),
            query: HashMap::new(),
        }
    }

    /// Set the response field holding the item array
    #[must_use]
    pub fn items_field(mut self, field: impl Into<String>) -> Self {
        self.items_field = field.into();
        self
    }

    /// Set where the continuation cursor is found
    #[must_use]
    pub fn continuation(mut self, style: ContinuationStyle) -> Self {
        self.continuation = style;
        self
    }

    /// Add a query parameter sent with every page (e.g. `api-version`)
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Fetch a single page, converting each item with `factory`
    pub async fn fetch_page<T, F>(&self, request: PageRequest, factory: &F) -> Result<Page<T>>
    where
        F: Fn(Value) -> Result<T>,
    {
        let mut config = RequestConfig::new().headers(&request.headers);

        let url = match (&self.continuation, request.cursor) {
            (ContinuationStyle::NextLink { .. }, Some(link)) => link,
            (style, cursor) => {
                for (key, value) in &self.query {
                    config = config.query(key.as_str(), value.as_str());
                }
                if let (Some(param), Some(cursor)) = (style.query_param(), cursor) {
                    config = config.query(param, cursor);
                }
                self.url.clone()
            }
        };

        let body: Value = self.client.request_json(Method::GET, &url, config).await?;

        let items = match body.get(&self.items_field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .cloned()
                .map(factory)
                .collect::<Result<Vec<T>>>()?,
            Some(other) => {
                return Err(Error::pagination(format!(
                    "Field '{}' is not an array: {other}",
                    self.items_field
                )))
            }
        };
        let next_cursor = self.continuation.extract_cursor(&body)?;

        debug!(url = %url, items = items.len(), more = next_cursor.is_some(), "Decoded list page");
        Ok(Page::new(items, next_cursor))
    }

    /// Turn this description into a page fetcher
    pub fn into_fetcher<T, F>(self, factory: F) -> impl PageFetcher<T>
    where
        T: Send + 'static,
        F: Fn(Value) -> Result<T> + Send + Sync + 'static,
    {
        let this = Arc::new(self);
        let factory = Arc::new(factory);
        CursorFetcher::new(move |request: PageRequest| {
            let this = Arc::clone(&this);
            let factory = Arc::clone(&factory);
            async move { this.fetch_page(request, factory.as_ref()).await }
        })
    }

    /// Lazy cached sequence over the collection
    pub fn into_sequence<T, F>(self, factory: F) -> PagedSequence<T>
    where
        T: Clone + Send + 'static,
        F: Fn(Value) -> Result<T> + Send + Sync + 'static,
    {
        PagedSequence::new(self.into_fetcher(factory))
    }

    /// Lazy cached sequence deserializing each item into `T`
    pub fn into_typed_sequence<T>(self) -> PagedSequence<T>
    where
        T: DeserializeOwned + Clone + Send + 'static,
    {
        self.into_sequence(|item| serde_json::from_value(item).map_err(Error::from))
    }
}
