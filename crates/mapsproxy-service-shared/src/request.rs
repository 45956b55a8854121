//! Request validation for HTTP endpoints.

use axum::{extract::rejection::JsonRejection, Json};

use mapsproxy_lib::{DirectionsRequest, NearbyPlacesRequest};

use crate::problem::{from_proxy_error, ProblemDetails};

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

impl Validate for DirectionsRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        self.check()
            .map_err(|e| Box::new(from_proxy_error(&e, request_id)))
    }
}

impl Validate for NearbyPlacesRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        self.check()
            .map_err(|e| Box::new(from_proxy_error(&e, request_id)))
    }
}

/// Unwrap a JSON body, reporting an unreadable body as `invalid-argument`.
///
/// Handlers take `Result<Json<T>, JsonRejection>` so that a body of the wrong
/// shape gets the same problem document as a missing field instead of
/// axum's plain-text rejection.
pub fn parse_json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    request_id: &str,
) -> Result<T, Box<ProblemDetails>> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        Box::new(ProblemDetails::invalid_argument(
            rejection.body_text(),
            request_id,
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_request_valid() {
        let req = DirectionsRequest::new("Berlin", "Potsdam");
        assert!(req.validate("test").is_ok());
    }

    #[test]
    fn test_directions_request_missing_origin() {
        let req: DirectionsRequest = serde_json::from_str(r#"{"destination":"Potsdam"}"#).unwrap();
        let err = req.validate("test").unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(err.code.as_deref(), Some("invalid-argument"));
        assert_eq!(
            err.detail.as_deref(),
            Some("Origin and destination are required")
        );
        assert_eq!(err.instance.as_deref(), Some("test"));
    }

    #[test]
    fn test_directions_request_empty_destination() {
        let req = DirectionsRequest::new("Berlin", "");
        assert!(req.validate("test").is_err());
    }

    #[test]
    fn test_places_request_valid() {
        let req = NearbyPlacesRequest::new("52.52,13.40").with_radius(1000.0);
        assert!(req.validate("test").is_ok());
    }

    #[test]
    fn test_places_request_missing_location() {
        let req: NearbyPlacesRequest = serde_json::from_str(r#"{"radius":100}"#).unwrap();
        let err = req.validate("test").unwrap_err();
        assert_eq!(err.detail.as_deref(), Some("Location is required"));
    }

    #[test]
    fn test_parse_json_body_ok() {
        let body = parse_json_body(Ok(Json(NearbyPlacesRequest::new("1,2"))), "test").unwrap();
        assert_eq!(body.location.as_deref(), Some("1,2"));
    }
}
