//! Health check handlers for liveness and readiness probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Whether the upstream credential is configured (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_configured: Option<bool>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            api_key_configured: None,
        }
    }

    /// Create a ready status.
    pub fn ready(service: &str, version: &str) -> Self {
        Self {
            api_key_configured: Some(true),
            ..Self::alive(service, version)
        }
    }

    /// Create a not-ready status.
    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            api_key_configured: Some(false),
        }
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK if the service is running.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"mapsproxy-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Returns 200 OK when the upstream credential is configured, 503 otherwise:
/// without it every proxied request would fail.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if !state.has_api_key() {
        let status = HealthStatus::not_ready(service, version, "api key not configured");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    (StatusCode::OK, Json(HealthStatus::ready(service, version))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsproxy_lib::testing::{test_proxy, ScriptedTransport};
    use mapsproxy_lib::{MapsProxy, UpstreamConfig};
    use std::sync::Arc;

    #[test]
    fn test_health_status_alive() {
        let status = HealthStatus::alive("test-service", "1.0.0");
        assert_eq!(status.status, "ok");
        assert_eq!(status.service, "test-service");
        assert_eq!(status.version, "1.0.0");
        assert!(status.api_key_configured.is_none());
    }

    #[test]
    fn test_health_status_not_ready() {
        let status = HealthStatus::not_ready("test-service", "1.0.0", "no key");
        assert!(status.status.starts_with("not_ready:"));
        assert_eq!(status.api_key_configured, Some(false));
    }

    #[test]
    fn test_health_status_serialization() {
        let json = serde_json::to_string(&HealthStatus::alive("directions", "0.1.0")).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(!json.contains("api_key_configured"));
    }

    #[tokio::test]
    async fn test_ready_with_key() {
        let state = AppState::new(test_proxy(ScriptedTransport::new().into_arc()));
        let response = health_ready(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_ready_without_key() {
        let proxy = MapsProxy::new(UpstreamConfig::default(), Arc::new(ScriptedTransport::new()));
        let response = health_ready(State(AppState::new(proxy))).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
