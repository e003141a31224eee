//! Bearer challenge parsing
//!
//! Parses `WWW-Authenticate: Bearer key="value", ...` headers. Parsing is
//! permissive: keys may appear in any order, values may be quoted or bare,
//! and unknown keys are kept. Anything that does not yield an authority and
//! a scope (or resource) is simply not a bearer challenge.

use regex::Regex;
use reqwest::header::{HeaderMap, WWW_AUTHENTICATE};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for `key="value"` and `key=value` pairs
static PARAM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_\-]*)\s*=\s*(?:"([^"]*)"|([^\s,"]+))"#).unwrap()
});

const BEARER_SCHEME: &str = "bearer";

/// Authentication metadata returned by the server with a 401
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerChallenge {
    /// Where to obtain a token (`authorization_uri` / `authorization`)
    pub authorization_server: String,
    /// `resource` parameter, if present
    pub resource: Option<String>,
    /// `scope` parameter, falling back to `resource`
    pub scope: String,
    /// All parameters, keys lower-cased
    pub parameters: HashMap<String, String>,
}

impl BearerChallenge {
    /// Build a challenge directly (e.g. to pre-populate a cache)
    pub fn new(authorization_server: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            authorization_server: authorization_server.into(),
            resource: None,
            scope: scope.into(),
            parameters: HashMap::new(),
        }
    }

    /// Parse a single `WWW-Authenticate` value
    ///
    /// Returns `None` for non-bearer schemes and malformed headers.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, rest) = match header.split_once(char::is_whitespace) {
            Some((scheme, rest)) => (scheme, rest),
            None => (header, ""),
        };
        if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
            return None;
        }

        let parameters: HashMap<String, String> = PARAM_REGEX
            .captures_iter(rest)
            .filter_map(|caps| {
                let key = caps.get(1)?.as_str().to_ascii_lowercase();
                let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
                Some((key, value))
            })
            .collect();

        let authorization_server = non_empty(&parameters, "authorization_uri")
            .or_else(|| non_empty(&parameters, "authorization"))?
            .to_string();
        let resource = non_empty(&parameters, "resource").map(String::from);
        let scope = non_empty(&parameters, "scope")
            .map(String::from)
            .or_else(|| resource.clone())?;

        Some(Self {
            authorization_server,
            resource,
            scope,
            parameters,
        })
    }

    /// Find the first bearer challenge among a response's `WWW-Authenticate` headers
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(Self::parse)
    }

    /// Look up any challenge parameter by (case-insensitive) name
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }
}

fn non_empty<'a>(parameters: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    parameters
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}
