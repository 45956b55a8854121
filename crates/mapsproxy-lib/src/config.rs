//! Upstream configuration injected into the proxies.
//!
//! The credential is read once at startup (see [`UpstreamConfig::from_env`])
//! and then handed to the proxies as a plain value. Tests build the value
//! directly instead of touching the process environment.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Environment variable overriding the upstream base URL.
pub const BASE_URL_ENV: &str = "MAPS_API_BASE_URL";

/// Environment variable holding an optional request timeout in seconds.
pub const TIMEOUT_ENV: &str = "MAPS_API_TIMEOUT_SECS";

/// Base URL of the upstream mapping API.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

const MISSING_KEY_MESSAGE: &str = "Google Maps API key not configured";

/// Settings for reaching the upstream mapping API.
#[derive(Clone)]
pub struct UpstreamConfig {
    api_key: Option<String>,
    base_url: String,
    timeout: Option<Duration>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl UpstreamConfig {
    /// Create a configuration carrying `api_key` and the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Create configuration from environment variables.
    ///
    /// - `GOOGLE_MAPS_API_KEY`: upstream credential (empty counts as unset)
    /// - `MAPS_API_BASE_URL`: upstream base URL (default: Google Maps)
    /// - `MAPS_API_TIMEOUT_SECS`: request timeout; unset or unparsable means none
    pub fn from_env() -> Self {
        let api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());

        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            api_key,
            base_url,
            timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = if key.is_empty() { None } else { Some(key) };
        self
    }

    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured credential, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The credential, or a `failed-precondition` error when it is absent.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key()
            .ok_or_else(|| Error::failed_precondition(MISSING_KEY_MESSAGE))
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

// The key must never end up in logs.
impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_default_config() {
        let config = UpstreamConfig::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(config.api_key().is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let config = UpstreamConfig::new("");
        assert!(!config.has_api_key());
        assert!(UpstreamConfig::new(" ").has_api_key());
        let err = config.require_api_key().unwrap_err();
        assert_eq!(err.code(), ErrorCode::FailedPrecondition);
        assert_eq!(err.to_string(), "Google Maps API key not configured");
    }

    #[test]
    fn test_require_api_key() {
        let config = UpstreamConfig::new("secret-key");
        assert_eq!(config.require_api_key().unwrap(), "secret-key");
        assert!(!config.without_api_key().has_api_key());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = UpstreamConfig::default().with_base_url("http://localhost:9000/maps/");
        assert_eq!(config.base_url(), "http://localhost:9000/maps");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = UpstreamConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
