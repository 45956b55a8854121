//! Nearby places proxy.

use tracing::{debug, info, warn};

use crate::config::UpstreamConfig;
use crate::envelope::{PlacesEnvelope, UNKNOWN_ERROR_MESSAGE};
use crate::error::Result;
use crate::query::UpstreamQuery;
use crate::request::NearbyPlacesRequest;
use crate::transport::Transport;
use crate::upstream::UpstreamReply;

/// Search radius in metres when the caller does not give one.
pub const DEFAULT_RADIUS: f64 = 5000.0;

/// Search for places near a location with a single upstream call.
///
/// `ZERO_RESULTS` is a success with an empty result list.
pub async fn get_nearby_places(
    transport: &dyn Transport,
    config: &UpstreamConfig,
    request: &NearbyPlacesRequest,
) -> Result<PlacesEnvelope> {
    let location = request.location()?;
    let api_key = config.require_api_key()?;
    let radius = request.radius.unwrap_or(DEFAULT_RADIUS);
    let place_type = request.place_type();

    let query = UpstreamQuery::nearby_places(location, radius, place_type, api_key);

    info!(
        location,
        radius,
        place_type = place_type.unwrap_or("-"),
        "searching nearby places"
    );
    debug!(url = %query.redacted_url(config.base_url()), "upstream request");

    let body = transport.get_json(&query.url(config.base_url())).await?;
    let reply = UpstreamReply::from_body(body);

    metrics::counter!(
        "mapsproxy_upstream_requests_total",
        "endpoint" => "places",
        "status" => reply.status.to_string()
    )
    .increment(1);

    if reply.status.is_failure() {
        warn!(
            status = %reply.status,
            error_message = reply.error_message.as_deref().unwrap_or(""),
            "nearby search rejected upstream"
        );
        let error = reply
            .error_message
            .or_else(|| reply.status.reported().map(str::to_string))
            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
        return Ok(PlacesEnvelope::failed(error));
    }

    let results = reply.into_results();
    info!(count = results.len(), "nearby places found");
    Ok(PlacesEnvelope::found(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{test_config, ScriptedTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_location_makes_no_call() {
        let transport = ScriptedTransport::new();
        let err = get_nearby_places(&transport, &test_config(), &NearbyPlacesRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_call() {
        let transport = ScriptedTransport::new();
        let config = test_config().without_api_key();

        let err = get_nearby_places(&transport, &config, &NearbyPlacesRequest::new("1,2"))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::FailedPrecondition);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_results_passed_through() {
        let results = json!([{"name": "Bike Shop"}, {"name": "Cafe"}, {"name": "Park"}]);
        let transport = ScriptedTransport::new().reply(json!({
            "status": "OK",
            "results": results.clone()
        }));

        let envelope = get_nearby_places(&transport, &test_config(), &NearbyPlacesRequest::new("1,2"))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(serde_json::to_value(envelope.results.unwrap()).unwrap(), results);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_ok_without_results_is_empty() {
        let transport = ScriptedTransport::new().status("OK");

        let envelope = get_nearby_places(&transport, &test_config(), &NearbyPlacesRequest::new("1,2"))
            .await
            .unwrap();

        assert_eq!(envelope, PlacesEnvelope::found(vec![]));
    }

    #[tokio::test]
    async fn test_zero_results_is_success() {
        let transport = ScriptedTransport::new().status("ZERO_RESULTS");

        let envelope = get_nearby_places(&transport, &test_config(), &NearbyPlacesRequest::new("1,2"))
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.results, Some(vec![]));
    }

    #[tokio::test]
    async fn test_error_status_uses_message_then_status() {
        let transport = ScriptedTransport::new()
            .reply(json!({"status": "INVALID_REQUEST", "error_message": "Invalid location"}))
            .status("OVER_QUERY_LIMIT");
        let request = NearbyPlacesRequest::new("nowhere");

        let first = get_nearby_places(&transport, &test_config(), &request)
            .await
            .unwrap();
        let second = get_nearby_places(&transport, &test_config(), &request)
            .await
            .unwrap();

        assert_eq!(first, PlacesEnvelope::failed("Invalid location"));
        assert_eq!(second, PlacesEnvelope::failed("OVER_QUERY_LIMIT"));
    }

    #[tokio::test]
    async fn test_default_radius_and_type() {
        let transport = ScriptedTransport::new().status("OK").status("OK");

        get_nearby_places(&transport, &test_config(), &NearbyPlacesRequest::new("1,2"))
            .await
            .unwrap();
        get_nearby_places(
            &transport,
            &test_config(),
            &NearbyPlacesRequest::new("1,2")
                .with_radius(800.0)
                .with_type("bicycle_store"),
        )
        .await
        .unwrap();

        let urls = transport.requested_urls();
        assert!(urls[0].contains("radius=5000"));
        assert!(!urls[0].contains("type="));
        assert!(urls[1].contains("radius=800"));
        assert!(urls[1].ends_with("&type=bicycle_store"));
    }

    #[tokio::test]
    async fn test_reply_without_status_is_failure_envelope() {
        let transport = ScriptedTransport::new()
            .reply(json!({}))
            .reply(json!(["not", "an", "object"]))
            .reply(json!({"error_message": "Invalid key"}));
        let request = NearbyPlacesRequest::new("1,2");

        for expected in ["Unknown error", "Unknown error", "Invalid key"] {
            let envelope = get_nearby_places(&transport, &test_config(), &request)
                .await
                .unwrap();
            assert_eq!(envelope, PlacesEnvelope::failed(expected));
        }
        assert_eq!(transport.call_count(), 3);
    }
}
