//! Nearby places proxy HTTP microservice.
//!
//! # Endpoints
//!
//! - `POST /getNearbyPlaces` - Places of an optional type around a location
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! The body is `{location, radius?, type?}` with `location` as `"lat,lng"`
//! and `radius` in meters (default 5000).

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use mapsproxy_lib::{NearbyPlacesRequest, PlacesEnvelope};
use mapsproxy_service_shared::{
    from_proxy_error, parse_json_body, record_envelope, record_request_failed, service_router,
    AppState, RequestId, ServiceConfig, ServiceResponse, Validate,
};

/// Metric label for this service.
pub const ENDPOINT: &str = "places";

/// Route path of the nearby search endpoint.
pub const ROUTE: &str = "/getNearbyPlaces";

/// Build the full application router.
pub fn router(state: AppState, config: &ServiceConfig) -> Router {
    let endpoints = Router::new().route(ROUTE, post(places_handler));
    service_router(endpoints, state, config)
}

/// Handle POST /getNearbyPlaces requests.
pub async fn places_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<NearbyPlacesRequest>, JsonRejection>,
) -> ServiceResponse<PlacesEnvelope> {
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
        radius = ?request.radius,
        place_type = request.place_type().unwrap_or("any"),
        "handling nearby places request"
    );

    // Early rejection only; the proxy call repeats this check and is authoritative.
    if let Err(problem) = request.validate(request_id.as_str()) {
        record_request_failed(ENDPOINT, "invalid-argument");
        return ServiceResponse::problem(problem);
    }

    match state.proxy().get_nearby_places(&request).await {
        Ok(envelope) => {
            record_envelope(ENDPOINT, envelope.success, None);
            info!(
                request_id = %request_id,
                success = envelope.success,
                results = envelope.results.as_ref().map_or(0, Vec::len),
                "nearby places request completed"
            );
            ServiceResponse::Success(envelope)
        }
        Err(e) => {
            let code = e.code();
            warn!(request_id = %request_id, code = %code, error = %e, "nearby places request failed");
            record_request_failed(ENDPOINT, code.as_str());
            ServiceResponse::problem(from_proxy_error(&e, request_id.as_str()))
        }
    }
}
