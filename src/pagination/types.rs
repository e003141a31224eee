//! Pagination types and traits
//!
//! Defines the page fetcher capability and the wire shapes a continuation
//! cursor can arrive in.

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

/// One page of results plus the cursor for the next one
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Cursor for the next page; `None` on the last page
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Create a page; an empty cursor counts as no cursor
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.filter(|c| !c.is_empty()),
        }
    }

    /// Create the final page
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// Check if this is the final page
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Input of a single page-function call
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Cursor returned by the previous page (`None` for the first page)
    pub cursor: Option<String>,
    /// Extra headers to send with the list call
    pub headers: HeaderMap,
}

/// Capability to fetch a resource list one page at a time
#[async_trait]
pub trait PageFetcher<T>: Send {
    /// True once a fetch has returned no continuation cursor
    fn is_on_last_page(&self) -> bool;

    /// Fetch the next page
    ///
    /// Returns an empty list without any I/O once the last page was reached.
    async fn fetch_next_page(
        &mut self,
        headers: &HeaderMap,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>>;
}

/// Where a list response carries its continuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinuationStyle {
    /// Explicit token field, sent back verbatim as a query parameter
    Token {
        /// Response field holding the token (e.g. `continuationToken`)
        field: String,
        /// Query parameter for the next request
        query_param: String,
    },
    /// Next-link URL from which one named query parameter is extracted
    NextLinkParam {
        /// Response field holding the link (e.g. `nextLink`)
        field: String,
        /// Parameter to extract and resend (e.g. `$skipToken`)
        query_param: String,
    },
    /// Next-link URL that is requested as is
    NextLink {
        /// Response field holding the link
        field: String,
    },
}

impl ContinuationStyle {
    /// `continuationToken` body field, resent as `continuationToken`
    pub fn continuation_token() -> Self {
        Self::Token {
            field: "continuationToken".to_string(),
            query_param: "continuationToken".to_string(),
        }
    }

    /// `$skipToken` extracted from a `nextLink` URL
    pub fn skip_token() -> Self {
        Self::NextLinkParam {
            field: "nextLink".to_string(),
            query_param: "$skipToken".to_string(),
        }
    }

    /// Follow `nextLink` verbatim
    pub fn next_link() -> Self {
        Self::NextLink {
            field: "nextLink".to_string(),
        }
    }

    /// Response field this style reads
    pub fn field(&self) -> &str {
        match self {
            Self::Token { field, .. }
            | Self::NextLinkParam { field, .. }
            | Self::NextLink { field } => field,
        }
    }

    /// Query parameter the cursor is sent back as (`None` for `NextLink`)
    pub fn query_param(&self) -> Option<&str> {
        match self {
            Self::Token { query_param, .. } | Self::NextLinkParam { query_param, .. } => {
                Some(query_param)
            }
            Self::NextLink { .. } => None,
        }
    }

    /// Extract the next cursor from a list response body
    ///
    /// Missing, null and empty fields all mean "last page".
    pub fn extract_cursor(&self, body: &Value) -> Result<Option<String>> {
        let raw = match body.get(self.field()) {
            Some(Value::String(s)) if !s.is_empty() => s.as_str(),
            _ => return Ok(None),
        };

        match self {
            Self::Token { .. } | Self::NextLink { .. } => Ok(Some(raw.to_string())),
            Self::NextLinkParam { query_param, .. } => {
                extract_single_query_param(raw, query_param).map(Some)
            }
        }
    }
}

/// Extract a query parameter that must appear exactly once in `url`
pub fn extract_single_query_param(url: &str, name: &str) -> Result<String> {
    if url.is_empty() || name.is_empty() {
        return Err(Error::pagination(
            "URL and parameter name must not be empty",
        ));
    }

    let parsed = Url::parse(url)?;
    let mut values = parsed
        .query_pairs()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned());

    match (values.next(), values.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(Error::pagination(format!(
            "Did not find exactly one instance of {name} in {url}"
        ))),
    }
}
