//! Nearby places proxy HTTP microservice.
//!
//! # Configuration
//!
//! - `GOOGLE_MAPS_API_KEY` - Upstream API key (requests fail with
//!   `failed-precondition` while unset)
//! - `MAPS_API_BASE_URL` - Upstream base URL
//! - `MAPS_API_TIMEOUT_SECS` - Upstream request timeout (default: none)
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated origins (default: any)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use tracing::{error, info};

use mapsproxy_service_places::{router, ROUTE};
use mapsproxy_service_shared::{
    init_logging, init_metrics, AppState, LoggingConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("places");
    init_logging(&logging_config);

    let config = ServiceConfig::from_env();
    if let Err(e) = init_metrics(&config.metrics) {
        // Metrics are optional
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    info!(port = config.port, route = ROUTE, "starting places service");

    let state = AppState::from_env().map_err(|e| {
        error!(error = %e, "failed to build application state");
        e
    })?;

    let app = router(state, &config);

    let addr = config.addr();
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
