//! HTTP client for control-plane calls
//!
//! Handles:
//! - Base URL joining and default headers
//! - Bearer authorization through a `ChallengeAuthenticator`
//! - Translation of error responses into `Error::Service` / `Error::HttpStatus`
//!
//! Every call is sent exactly once. Callers that want retries wrap the call
//! themselves.

use crate::auth::ChallengeAuthenticator;
use crate::error::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative paths
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: default_user_agent(),
        }
    }
}

/// `aml-client/<crate version>`
pub(crate) fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: HashMap<String, String>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add every header of a map whose value is visible ASCII
    ///
    /// Other values are skipped and logged at debug level.
    #[must_use]
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            match value.to_str() {
                Ok(value) => {
                    self.headers.insert(name.as_str().to_string(), value.to_string());
                }
                Err(_) => debug!(header = %name, "Dropping header with non-ASCII value"),
            }
        }
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client with optional challenge-based authorization
///
/// Cheap to clone; clones share the connection pool and challenge cache.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<ChallengeAuthenticator>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator: None,
        })
    }

    /// Create a client that authorizes every request
    ///
    /// The authenticator's probes go through this client's connection pool.
    pub fn with_auth(config: HttpClientConfig, authenticator: ChallengeAuthenticator) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.set_authenticator(authenticator);
        Ok(client)
    }

    /// Set the authenticator
    pub fn set_authenticator(&mut self, authenticator: ChallengeAuthenticator) {
        self.authenticator = Some(authenticator.with_client(self.client.clone()));
    }

    /// Authenticator in use, if any
    pub fn authenticator(&self) -> Option<&ChallengeAuthenticator> {
        self.authenticator.as_ref()
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a generic request
    ///
    /// Non-success responses become errors; the body is decoded as a service
    /// error when it has the `{"error": {"code": ...}}` shape.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(url)?;
        let mut builder = self.client.request(method.clone(), full_url);

        for (key, value) in &self.config.default_headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        for (key, value) in &config.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if !config.query.is_empty() {
            builder = builder.query(&config.query);
        }
        if let Some(ref body) = config.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let mut request = builder.build()?;

        if let Some(ref auth) = self.authenticator {
            let outcome = auth.authorize(&mut request).await?;
            debug!(?outcome, url = %request.url(), "Authorization decided");
        }

        let response = self.client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            debug!("Request succeeded: {} {}", method, response.url());
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Request failed: {} {}", method, url);
        Err(error_from_body(status.as_u16(), body))
    }

    /// Make a request and parse JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, url, config).await?;
        let json: T = response.json().await.map_err(Error::Http)?;
        Ok(json)
    }

    /// Make a GET request and parse JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request_json(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Resolve a path against the base URL; absolute URLs pass through
    pub fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                Ok(Url::parse(&format!("{base}/{path}"))?)
            }
            None => Ok(Url::parse(path)?),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .finish_non_exhaustive()
    }
}

/// Map a failed response to an error
///
/// `{"error": {"code": "...", "message": "..."}}` becomes `Error::Service`,
/// anything else `Error::HttpStatus` with the raw body.
pub(crate) fn error_from_body(status: u16, body: String) -> Error {
    let decoded = serde_json::from_str::<Value>(&body).ok();
    let service_error = decoded.as_ref().and_then(|v| v.get("error"));

    match service_error.and_then(|e| e.get("code")).and_then(Value::as_str) {
        Some(code) => {
            let message = service_error
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            Error::service(status, code, message)
        }
        None => Error::http_status(status, body),
    }
}
