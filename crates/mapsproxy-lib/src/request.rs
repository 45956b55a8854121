//! Inbound request types for the two proxy operations.
//!
//! Every field is optional at the type level so that a missing field reaches
//! validation and is reported as `invalid-argument`, rather than failing
//! deserialization.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Request for a route between two places.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DirectionsRequest {
    /// Start of the route (address, place name, or `lat,lng`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// End of the route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Intermediate stops, in visiting order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<String>>,

    /// Travel mode tried first; defaults to `bicycling`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl DirectionsRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            destination: Some(destination.into()),
            ..Self::default()
        }
    }

    pub fn with_waypoints<I, S>(mut self, waypoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.waypoints = Some(waypoints.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Validated `(origin, destination)` pair.
    pub fn endpoints(&self) -> Result<(&str, &str)> {
        match (present(&self.origin), present(&self.destination)) {
            (Some(origin), Some(destination)) => Ok((origin, destination)),
            _ => Err(Error::invalid_argument(
                "Origin and destination are required",
            )),
        }
    }

    /// Check required fields without touching the upstream.
    pub fn check(&self) -> Result<()> {
        self.endpoints().map(|_| ())
    }

    /// Waypoints to send, or an empty slice when none were given.
    pub fn waypoints(&self) -> &[String] {
        self.waypoints.as_deref().unwrap_or(&[])
    }

    /// The requested mode, treating an empty string as not requested.
    pub fn requested_mode(&self) -> Option<&str> {
        present(&self.mode)
    }
}

/// Request for places near a location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NearbyPlacesRequest {
    /// Search centre as `lat,lng`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Search radius in metres; defaults to 5000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,

    /// Upstream place type filter (e.g. `bicycle_store`).
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub place_type: Option<String>,
}

impl NearbyPlacesRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = Some(place_type.into());
        self
    }

    /// Validated search location.
    pub fn location(&self) -> Result<&str> {
        present(&self.location).ok_or_else(|| Error::invalid_argument("Location is required"))
    }

    pub fn check(&self) -> Result<()> {
        self.location().map(|_| ())
    }

    /// Type filter to send, treating an empty string as absent.
    pub fn place_type(&self) -> Option<&str> {
        present(&self.place_type)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_directions_request_valid() {
        let req = DirectionsRequest::new("Berlin", "Potsdam");
        assert_eq!(req.endpoints().unwrap(), ("Berlin", "Potsdam"));
        assert!(req.waypoints().is_empty());
        assert!(req.requested_mode().is_none());
    }

    #[test]
    fn test_directions_request_missing_destination() {
        let req = DirectionsRequest {
            origin: Some("Berlin".to_string()),
            ..DirectionsRequest::default()
        };
        let err = req.check().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.to_string(), "Origin and destination are required");
    }

    #[test]
    fn test_directions_request_empty_origin() {
        let req = DirectionsRequest::new("", "Potsdam");
        assert!(req.check().is_err());
    }

    #[test]
    fn test_whitespace_values_are_forwarded() {
        let req = DirectionsRequest::new(" ", "Potsdam").with_mode(" ");
        assert_eq!(req.endpoints().unwrap(), (" ", "Potsdam"));
        assert_eq!(req.requested_mode(), Some(" "));
        assert_eq!(NearbyPlacesRequest::new(" ").location().unwrap(), " ");
    }

    #[test]
    fn test_empty_mode_is_not_requested() {
        let req = DirectionsRequest::new("A", "B").with_mode("");
        assert!(req.requested_mode().is_none());
    }

    #[test]
    fn test_directions_request_deserialization() {
        let json = r#"{"origin":"A","destination":"B","waypoints":["C","D"],"mode":"walking"}"#;
        let req: DirectionsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.waypoints(), ["C".to_string(), "D".to_string()]);
        assert_eq!(req.requested_mode(), Some("walking"));

        let nulls: DirectionsRequest =
            serde_json::from_str(r#"{"origin":null,"destination":"B"}"#).unwrap();
        assert!(nulls.check().is_err());
    }

    #[test]
    fn test_places_request_type_field() {
        let req: NearbyPlacesRequest =
            serde_json::from_str(r#"{"location":"52.5,13.4","type":"cafe"}"#).unwrap();
        assert_eq!(req.place_type(), Some("cafe"));
        assert!(req.radius.is_none());

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"type\":\"cafe\""));
    }

    #[test]
    fn test_places_request_missing_location() {
        let err = NearbyPlacesRequest::default().check().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.to_string(), "Location is required");
    }
}
