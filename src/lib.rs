// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # AML Client
//!
//! Resilience layer for a machine-learning control-plane client.
//!
//! ## Features
//!
//! - **Polling**: Wait for long-running operations with bounded exponential backoff
//! - **Pagination**: Lazy, cached, restartable sequences over continuation-token lists
//! - **Challenge Auth**: Discover bearer challenges once per URL, then attach tokens directly
//! - **HTTP**: A reqwest client that wires the authenticator in and decodes service errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aml_client::{ChallengeAuthenticator, HttpClient, JsonPageFetcher, StaticTokenProvider};
//!
//! #[tokio::main]
//! async fn main() -> aml_client::Result<()> {
//!     let config = aml_client::ClientConfig::load("client.yaml")?;
//!     let auth = ChallengeAuthenticator::new(StaticTokenProvider::new("token"))
//!         .with_environment(config.environment()?)
//!         .with_cache(config.challenge_cache());
//!     let client = HttpClient::with_auth(config.http_client_config(), auth)?;
//!
//!     let models = JsonPageFetcher::new(client, "https://ml.example/models")
//!         .query("api-version", "2019-09-30")
//!         .into_typed_sequence::<serde_json::Value>();
//!     for model in models.collect_all().await? {
//!         println!("{}", model["name"]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         HttpClient                           │
//! │   request() → authorize → send once → decode service errors  │
//! └──────────────────────────────────────────────────────────────┘
//!          │                        │                      │
//! ┌────────┴────────┐   ┌───────────┴──────────┐   ┌───────┴───────┐
//! │      Auth       │   │      Pagination      │   │    Polling    │
//! ├─────────────────┤   ├──────────────────────┤   ├───────────────┤
//! │ BearerChallenge │   │ CursorFetcher        │   │ PollPolicy    │
//! │ ChallengeCache  │   │ PagedSequence        │   │ wait_for_*    │
//! │ TokenProvider   │   │ ContinuationStyle    │   │ terminal set  │
//! └─────────────────┘   └──────────────────────┘   └───────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Challenge-based bearer authentication
pub mod auth;

/// HTTP client and JSON list fetching
pub mod http;

/// Lazy cached pagination
pub mod pagination;

/// Long-running operation polling
pub mod polling;

/// Client configuration loaded from YAML
pub mod config;

/// Tracing subscriber set-up
pub mod logging;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{
    AuthOutcome, BearerChallenge, ChallengeAuthenticator, ChallengeCache, FnTokenProvider,
    StaticTokenProvider, TokenProvider, TokenRequest,
};
pub use config::ClientConfig;
pub use error::{Error, Result, ResultExt};
pub use http::{HttpClient, HttpClientConfig, JsonPageFetcher, RequestConfig};
pub use pagination::{ContinuationStyle, CursorFetcher, Page, PageFetcher, PageRequest, PagedSequence};
pub use polling::{is_terminal_state, PollPolicy, Refreshable, StatusResource, TERMINAL_STATES};
pub use types::CloudEnvironment;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
