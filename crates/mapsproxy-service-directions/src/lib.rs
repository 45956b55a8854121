//! Directions proxy HTTP microservice.
//!
//! # Endpoints
//!
//! - `POST /getDirections` - Route between two places, with travel-mode fallback
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! The body is `{origin, destination, waypoints?, mode?}`. Upstream outcomes
//! are answered with `200` and a `{success, ...}` envelope; missing fields,
//! a missing API key and internal failures are answered with a problem
//! document carrying the error code.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use mapsproxy_lib::{DirectionsEnvelope, DirectionsRequest};
use mapsproxy_service_shared::{
    from_proxy_error, parse_json_body, record_envelope, record_request_failed, service_router,
    AppState, RequestId, ServiceConfig, ServiceResponse, Validate,
};

/// Metric label for this service.
pub const ENDPOINT: &str = "directions";

/// Route path of the directions endpoint.
pub const ROUTE: &str = "/getDirections";

/// Build the full application router.
pub fn router(state: AppState, config: &ServiceConfig) -> Router {
    let endpoints = Router::new().route(ROUTE, post(directions_handler));
    service_router(endpoints, state, config)
}

/// Handle POST /getDirections requests.
pub async fn directions_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<DirectionsRequest>, JsonRejection>,
) -> ServiceResponse<DirectionsEnvelope> {
    let request = match parse_json_body(payload, request_id.as_str()) {
        Ok(request) => request,
        Err(problem) => {
            warn!(request_id = %request_id, detail = ?problem.detail, "unreadable request body");
            record_request_failed(ENDPOINT, "invalid-argument");
            return ServiceResponse::problem(problem);
        }
    };

    info!(
        request_id = %request_id,
        waypoints = request.waypoints().len(),
        mode = request.requested_mode().unwrap_or("default"),
        "handling directions request"
    );

    // Early rejection only; the proxy call repeats this check and is authoritative.
    if let Err(problem) = request.validate(request_id.as_str()) {
        record_request_failed(ENDPOINT, "invalid-argument");
        return ServiceResponse::problem(problem);
    }

    match state.proxy().get_directions(&request).await {
        Ok(envelope) => {
            record_envelope(ENDPOINT, envelope.success, envelope.status.as_deref());
            info!(
                request_id = %request_id,
                success = envelope.success,
                status = envelope.status.as_deref().unwrap_or("OK"),
                "directions request completed"
            );
            ServiceResponse::Success(envelope)
        }
        Err(e) => {
            let code = e.code();
            warn!(request_id = %request_id, code = %code, error = %e, "directions request failed");
            record_request_failed(ENDPOINT, code.as_str());
            ServiceResponse::problem(from_proxy_error(&e, request_id.as_str()))
        }
    }
}
