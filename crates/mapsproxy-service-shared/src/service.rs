//! Process configuration and the common router around an endpoint.

use std::net::SocketAddr;

use axum::{routing::get, Router};

use crate::cors::{cors_layer, CorsConfig};
use crate::health::{health_live, health_ready};
use crate::metrics::{metrics_handler, MetricsConfig};
use crate::middleware::MetricsLayer;
use crate::state::AppState;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Settings shared by both service binaries.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub cors: CorsConfig,
    pub metrics: MetricsConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors: CorsConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Read `SERVICE_PORT`, `CORS_ALLOWED_ORIGINS`, `METRICS_ENABLED` and
    /// `METRICS_PATH`. An unparseable port falls back to the default.
    pub fn from_env() -> Self {
        let port = std::env::var("SERVICE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            cors: CorsConfig::from_env(),
            metrics: MetricsConfig::from_env(),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Add health probes, the metrics endpoint, CORS and request tracking to the
/// endpoint routes, then attach `state`.
pub fn service_router(
    endpoints: Router<AppState>,
    state: AppState,
    config: &ServiceConfig,
) -> Router {
    let mut router = endpoints
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    if config.metrics.enabled {
        router = router.route(&config.metrics.path, get(metrics_handler));
    }

    router
        .layer(cors_layer(&config.cors))
        .layer(MetricsLayer)
        .with_state(state)
}
