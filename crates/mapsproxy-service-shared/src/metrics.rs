//! Prometheus metrics for the proxy services.
//!
//! This module provides:
//! - [`MetricsConfig`]: Configuration for the metrics system
//! - [`init_metrics`]: Initialize the Prometheus metrics recorder
//! - [`metrics_handler`]: Axum handler for `/metrics` endpoint
//! - Business metric helpers for envelope outcomes and rejected requests
//!
//! Upstream attempt counters (`mapsproxy_upstream_requests_total`,
//! `mapsproxy_mode_fallbacks_total`) are emitted by `mapsproxy-lib` itself and
//! show up here once the recorder is installed.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Global Prometheus handle for rendering metrics.
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
    /// Path for the metrics endpoint (e.g., "/metrics").
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    /// - `METRICS_PATH`: Path for metrics endpoint (default: "/metrics")
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let path = std::env::var("METRICS_PATH")
            .ok()
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at startup before any metrics are recorded.
///
/// # Errors
///
/// Returns an error if metrics are disabled, the recorder is already
/// installed, or the Prometheus builder fails to install.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the metrics endpoint, in Prometheus exposition format.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// Metrics are disabled in configuration.
    Disabled,
    /// The recorder has already been installed.
    AlreadyInitialized,
    /// The Prometheus builder failed to install.
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Record an envelope returned to a caller.
///
/// Increments `mapsproxy_envelopes_total`. `status` is the upstream status
/// carried by failed envelopes, or "OK" for successes.
///
/// # Arguments
///
/// * `endpoint` - "directions" or "places"
/// * `success` - The envelope's `success` flag
/// * `status` - Upstream status for failed envelopes, if known
pub fn record_envelope(endpoint: &'static str, success: bool, status: Option<&str>) {
    let status = match (success, status) {
        (true, _) => "OK".to_string(),
        (false, Some(status)) => status.to_string(),
        (false, None) => "UNKNOWN".to_string(),
    };

    metrics::counter!(
        "mapsproxy_envelopes_total",
        "endpoint" => endpoint,
        "success" => if success { "true" } else { "false" },
        "status" => status
    )
    .increment(1);
}

/// Record a request that ended in a typed error.
///
/// Increments `mapsproxy_requests_failed_total`.
///
/// # Arguments
///
/// * `endpoint` - "directions" or "places"
/// * `reason` - The error code, e.g. "invalid-argument"
pub fn record_request_failed(endpoint: &'static str, reason: &str) {
    metrics::counter!(
        "mapsproxy_requests_failed_total",
        "endpoint" => endpoint,
        "reason" => reason.to_string()
    )
    .increment(1);
}
