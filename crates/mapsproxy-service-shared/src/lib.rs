//! Shared infrastructure for the mapsproxy HTTP services.
//!
//! This crate provides common functionality used by both proxy services:
//!
//! - [`AppState`]: The configured [`MapsProxy`](mapsproxy_lib::MapsProxy) shared by handlers
//! - [`health`]: Health check handlers for liveness/readiness probes
//! - [`ProblemDetails`]: RFC 9457 Problem Details for typed error responses
//! - [`ServiceResponse`]: Envelope-or-problem response returned by handlers
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - [`cors`]: Cross-origin configuration for browser clients
//! - [`service_router`]: Health, metrics, CORS and request tracking around an endpoint
//! - [`Validate`] implementations for the proxy request types
//!
//! # Architecture
//!
//! The services follow a thin-handler pattern where all proxy logic resides
//! in `mapsproxy-lib`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate required fields                                 │
//! │  - Call mapsproxy-lib (credential, URL, upstream, envelope) │
//! │  - Return envelope or problem document                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds state over a scripted upstream. Enable
//! the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod cors;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod service;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cors::{cors_layer, CorsConfig};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_envelope, record_request_failed, MetricsConfig,
    MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_proxy_error, ProblemDetails, PROBLEM_FAILED_PRECONDITION, PROBLEM_INTERNAL,
    PROBLEM_INVALID_ARGUMENT,
};
pub use request::{parse_json_body, Validate};
pub use response::ServiceResponse;
pub use service::{service_router, ServiceConfig, DEFAULT_PORT};
pub use state::{AppState, AppStateError};
