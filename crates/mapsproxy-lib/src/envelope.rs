//! Uniform response envelopes returned to callers.
//!
//! `success` is true exactly when the upstream reported a non-error status.
//! Upstream payloads are passed through untouched as JSON values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message returned when every candidate travel mode produced no route.
pub const NO_ROUTE_MESSAGE: &str = "No route found between these points";

/// Message used when the upstream rejected a request without explaining why.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Envelope returned by the directions proxy.
///
/// ```text
/// {"success":true,"data":{...upstream payload...}}
/// {"success":false,"status":"REQUEST_DENIED","error":"The provided API key is invalid."}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsEnvelope {
    pub success: bool,

    /// Full upstream payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Upstream status on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DirectionsEnvelope {
    pub fn found(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            status: None,
            error: None,
        }
    }

    pub fn failed(status: impl Into<String>, error: impl Into<String>) -> Self {
        Self::rejected(Some(status.into()), error)
    }

    /// Failure whose upstream status may be unknown; `status` is then omitted.
    pub fn rejected(status: Option<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            status,
            error: Some(error.into()),
        }
    }

    /// Every candidate mode came back with `ZERO_RESULTS`.
    pub fn no_route() -> Self {
        Self::failed("ZERO_RESULTS", NO_ROUTE_MESSAGE)
    }
}

/// Envelope returned by the nearby places proxy.
///
/// ```text
/// {"success":true,"results":[...]}
/// {"success":false,"error":"OVER_QUERY_LIMIT"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesEnvelope {
    pub success: bool,

    /// Upstream results on success; always present (possibly empty) then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlacesEnvelope {
    pub fn found(results: Vec<Value>) -> Self {
        Self {
            success: true,
            results: Some(results),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_directions_success_shape() {
        let envelope = DirectionsEnvelope::found(json!({"status": "OK", "routes": []}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "data": {"status": "OK", "routes": []}})
        );
    }

    #[test]
    fn test_directions_no_route_shape() {
        let value = serde_json::to_value(DirectionsEnvelope::no_route()).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "status": "ZERO_RESULTS",
                "error": "No route found between these points"
            })
        );
    }

    #[test]
    fn test_places_empty_results_serialized() {
        let value = serde_json::to_value(PlacesEnvelope::found(vec![])).unwrap();
        assert_eq!(value, json!({"success": true, "results": []}));
    }

    #[test]
    fn test_places_failure_shape() {
        let value = serde_json::to_value(PlacesEnvelope::failed("INVALID_REQUEST")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "INVALID_REQUEST"}));
    }
}
