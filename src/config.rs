//! Client configuration
//!
//! Settings for the cloud environment, HTTP transport, polling schedule and
//! challenge cache, loadable from YAML:
//!
//! ```yaml
//! environment: azure_global_cloud
//! http:
//!   base_url: https://management.azure.com
//!   timeout_seconds: 30
//! polling:
//!   initial_interval_seconds: 1.0
//!   max_interval_seconds: 90.0
//!   growth_multiplier: 1.5
//! challenge_cache:
//!   ttl_seconds: 3600
//! ```
//!
//! Every section is optional; omitted values take the library defaults.

use crate::auth::ChallengeCache;
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::polling::PollPolicy;
use crate::types::{CloudEnvironment, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Overrides the HTTP timeout (seconds)
pub const ENV_TIMEOUT_SECONDS: &str = "AML_CLIENT_TIMEOUT_SECONDS";

/// Overrides the resource-manager endpoint, selecting a custom environment
pub const ENV_RESOURCE_MANAGER_ENDPOINT: &str = "AML_CLIENT_RESOURCE_MANAGER_ENDPOINT";

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Cloud name (`azure_global_cloud`, `azure_china_cloud`,
    /// `azure_us_government`, `azure_german_cloud` or `custom`)
    pub environment: EnvironmentName,

    /// Resource-manager endpoint; required for `custom`, overrides the
    /// well-known endpoint otherwise
    pub resource_manager_endpoint: Option<String>,

    /// HTTP transport settings
    pub http: HttpSettings,

    /// Polling schedule
    pub polling: PollingSettings,

    /// Challenge cache settings
    pub challenge_cache: ChallengeCacheSettings,
}

/// Cloud selector as written in configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentName {
    /// Public global cloud
    #[default]
    AzureGlobalCloud,
    /// China sovereign cloud
    AzureChinaCloud,
    /// US government cloud
    #[serde(rename = "azure_us_government")]
    AzureUSGovernment,
    /// German sovereign cloud
    AzureGermanCloud,
    /// Custom endpoint
    Custom,
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Base URL that relative request paths are joined to
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent; defaults to `aml-client/<version>`
    pub user_agent: Option<String>,
    /// Headers sent with every request
    pub default_headers: StringMap,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: 30,
            user_agent: None,
            default_headers: StringMap::new(),
        }
    }
}

/// Polling schedule, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    /// First sleep interval
    pub initial_interval_seconds: f64,
    /// Ceiling for the sleep interval
    pub max_interval_seconds: f64,
    /// Interval multiplier after each poll
    pub growth_multiplier: f64,
    /// Overall wait budget; unbounded when absent
    pub timeout_seconds: Option<f64>,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            initial_interval_seconds: 1.0,
            max_interval_seconds: 90.0,
            growth_multiplier: 1.5,
            timeout_seconds: None,
        }
    }
}

/// Challenge cache settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeCacheSettings {
    /// Re-discover challenges after this many seconds; never when absent
    pub ttl_seconds: Option<u64>,
}

// ============================================================================
// Loading
// ============================================================================

impl ClientConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse client config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read client config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply `AML_CLIENT_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup(ENV_TIMEOUT_SECONDS) {
            self.http.timeout_seconds = raw.trim().parse().map_err(|e| {
                Error::config(format!("{ENV_TIMEOUT_SECONDS} must be whole seconds: {e}"))
            })?;
        }
        if let Some(endpoint) = lookup(ENV_RESOURCE_MANAGER_ENDPOINT) {
            self.environment = EnvironmentName::Custom;
            self.resource_manager_endpoint = Some(endpoint);
        }
        self.validate()
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.environment()?;
        self.poll_policy()?;
        Ok(())
    }

    // ========================================================================
    // Derived Components
    // ========================================================================

    /// Resolve the cloud environment
    pub fn environment(&self) -> Result<CloudEnvironment> {
        let endpoint = self
            .resource_manager_endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty());

        match (self.environment, endpoint) {
            (_, Some(endpoint)) => Ok(CloudEnvironment::custom(endpoint)),
            (EnvironmentName::Custom, None) => Err(Error::config(
                "environment 'custom' requires resource_manager_endpoint",
            )),
            (EnvironmentName::AzureGlobalCloud, None) => Ok(CloudEnvironment::AzureGlobalCloud),
            (EnvironmentName::AzureChinaCloud, None) => Ok(CloudEnvironment::AzureChinaCloud),
            (EnvironmentName::AzureUSGovernment, None) => Ok(CloudEnvironment::AzureUSGovernment),
            (EnvironmentName::AzureGermanCloud, None) => Ok(CloudEnvironment::AzureGermanCloud),
        }
    }

    /// Build the validated poll policy
    pub fn poll_policy(&self) -> Result<PollPolicy> {
        let p = &self.polling;
        let timeout = match p.timeout_seconds {
            Some(secs) => seconds("polling.timeout_seconds", secs)?,
            None => Duration::MAX,
        };
        PollPolicy::new(
            seconds("polling.initial_interval_seconds", p.initial_interval_seconds)?,
            seconds("polling.max_interval_seconds", p.max_interval_seconds)?,
            p.growth_multiplier,
            timeout,
        )
    }

    /// Create an empty challenge cache with the configured TTL
    pub fn challenge_cache(&self) -> ChallengeCache {
        match self.challenge_cache.ttl_seconds {
            Some(secs) => ChallengeCache::with_ttl(Duration::from_secs(secs)),
            None => ChallengeCache::new(),
        }
    }

    /// HTTP client settings
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.http.timeout_seconds));
        if let Some(ref base_url) = self.http.base_url {
            builder = builder.base_url(base_url.as_str());
        }
        if let Some(ref agent) = self.http.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        for (key, value) in &self.http.default_headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder.build()
    }
}

/// Convert fractional seconds from a config file
fn seconds(field: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| Error::config(format!("{field} is not a valid duration ({value}): {e}")))
}
