//! HTTP client module
//!
//! Provides the reqwest-based client used for control-plane calls and the
//! bridge from JSON list endpoints to `PagedSequence`.
//!
//! # Features
//!
//! - **Authorization**: Optional `ChallengeAuthenticator` applied to each request
//! - **Error translation**: Service error bodies decoded into `Error::Service`
//! - **List endpoints**: `JsonPageFetcher` turns a list URL into a page fetcher

mod client;
mod json_fetcher;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use json_fetcher::JsonPageFetcher;
