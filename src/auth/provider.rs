//! Token acquisition
//!
//! The authenticator owns no token cache; whatever the provider returns is
//! attached as is. Providers that talk to an identity service are expected
//! to do their own caching.

use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// Arguments of a single token acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    /// Authorization server taken from the challenge
    pub authority: String,
    /// Resource the token is for (the cloud's resource-manager endpoint)
    pub resource: String,
    /// Scope taken from the challenge
    pub scope: String,
}

/// User supplied token acquisition
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire a token; `Ok(None)` or an empty string means "no token"
    async fn acquire_token(&self, request: TokenRequest) -> Result<Option<String>>;
}

/// Adapts an async closure to [`TokenProvider`]
pub struct FnTokenProvider<F> {
    callback: F,
}

impl<F> FnTokenProvider<F> {
    /// Wrap a closure
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F, Fut> TokenProvider for FnTokenProvider<F>
where
    F: Fn(TokenRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<String>>> + Send,
{
    async fn acquire_token(&self, request: TokenRequest) -> Result<Option<String>> {
        (self.callback)(request).await
    }
}

impl<F> std::fmt::Debug for FnTokenProvider<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTokenProvider").finish_non_exhaustive()
    }
}

/// Always returns the same token
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Create a provider for a fixed token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn acquire_token(&self, _request: TokenRequest) -> Result<Option<String>> {
        Ok(Some(self.token.clone()))
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}
