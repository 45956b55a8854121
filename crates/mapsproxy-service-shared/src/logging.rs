//! Structured logging for the proxy services.
//!
//! - [`LoggingConfig`]: format, level filter and service name
//! - [`init_logging`]: install the global `tracing` subscriber
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: `json` (default) or `text`/`pretty`
//! - `RUST_LOG`: level filter (default: `info`)
//! - `SERVICE_NAME`: overrides the service name reported at startup
//!
//! Upstream URLs are only ever logged in redacted form, so the credential
//! does not appear in log output at any level.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event (production).
    #[default]
    Json,
    /// Human-readable multi-line output (development).
    Text,
}

impl LogFormat {
    /// Parse a format name; anything other than `text`/`pretty` is JSON.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Fallback filter used when `RUST_LOG` is not set.
    pub level: String,
    pub service: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            service: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let format = std::env::var("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            format,
            level,
            service: std::env::var("SERVICE_NAME").ok(),
        }
    }

    /// Set the service name unless `SERVICE_NAME` already provided one.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        if self.service.is_none() {
            self.service = Some(service.into());
        }
        self
    }
}

/// Install the global subscriber.
///
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            service = config.service.as_deref().unwrap_or("mapsproxy"),
            format = ?config.format,
            "logging initialized"
        );
    }
}
