//! Common types used throughout the client
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Cloud Environment
// ============================================================================

/// Cloud the control plane lives in
///
/// Determines the resource-manager endpoint that is passed as the `resource`
/// argument when acquiring tokens for a bearer challenge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudEnvironment {
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
    /// Any other deployment, identified by its resource-manager endpoint
    Custom {
        /// Resource-manager endpoint (e.g. `https://management.example/`)
        resource_manager_endpoint: String,
    },
}

impl CloudEnvironment {
    /// Create a custom environment
    pub fn custom(resource_manager_endpoint: impl Into<String>) -> Self {
        Self::Custom {
            resource_manager_endpoint: resource_manager_endpoint.into(),
        }
    }

    /// Resource-manager endpoint for this cloud
    pub fn resource_manager_endpoint(&self) -> &str {
        match self {
            Self::AzureGlobalCloud => "https://management.azure.com/",
            Self::AzureChinaCloud => "https://management.chinacloudapi.cn/",
            Self::AzureUSGovernment => "https://management.usgovcloudapi.net/",
            Self::AzureGermanCloud => "https://management.microsoftazure.de/",
            Self::Custom {
                resource_manager_endpoint,
            } => resource_manager_endpoint,
        }
    }

    /// Short display name
    pub fn name(&self) -> &str {
        match self {
            Self::AzureGlobalCloud => "AzureGlobalCloud",
            Self::AzureChinaCloud => "AzureChinaCloud",
            Self::AzureUSGovernment => "AzureUSGovernment",
            Self::AzureGermanCloud => "AzureGermanCloud",
            Self::Custom { .. } => "Custom",
        }
    }
}

impl std::fmt::Display for CloudEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_default() {
        let env = CloudEnvironment::default();
        assert_eq!(env, CloudEnvironment::AzureGlobalCloud);
        assert_eq!(
            env.resource_manager_endpoint(),
            "https://management.azure.com/"
        );
    }

    #[test]
    fn test_environment_custom() {
        let env = CloudEnvironment::custom("https://mgmt.example/");
        assert_eq!(env.resource_manager_endpoint(), "https://mgmt.example/");
        assert_eq!(env.to_string(), "Custom");
    }

    #[test]
    fn test_environment_serde() {
        let env: CloudEnvironment = serde_yaml::from_str("azure_china_cloud").unwrap();
        assert_eq!(env, CloudEnvironment::AzureChinaCloud);

        let env: CloudEnvironment = serde_yaml::from_str("azure_us_government").unwrap();
        assert_eq!(env, CloudEnvironment::AzureUSGovernment);

        let env: CloudEnvironment = serde_json::from_value(serde_json::json!({
            "custom": { "resource_manager_endpoint": "https://m.example/" }
        }))
        .unwrap();
        assert_eq!(env.resource_manager_endpoint(), "https://m.example/");
    }
}
