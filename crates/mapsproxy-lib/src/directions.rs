//! Directions proxy with travel-mode fallback.
//!
//! The requested mode (or `bicycling`) is tried first, then `driving`. Only a
//! `ZERO_RESULTS` reply moves on to the next mode; any other non-`OK` status
//! is returned to the caller straight away. Asking for `driving` therefore
//! issues the same request twice when the first attempt finds nothing.

use tracing::{debug, info, warn};

use crate::config::UpstreamConfig;
use crate::envelope::{DirectionsEnvelope, UNKNOWN_ERROR_MESSAGE};
use crate::error::Result;
use crate::query::UpstreamQuery;
use crate::request::DirectionsRequest;
use crate::transport::Transport;
use crate::upstream::{UpstreamReply, UpstreamStatus};

/// Mode tried first when the caller does not ask for one.
pub const DEFAULT_MODE: &str = "bicycling";

/// Mode tried after the first one returned no route.
pub const FALLBACK_MODE: &str = "driving";

/// Travel modes attempted, in order.
pub fn candidate_modes(requested: Option<&str>) -> [&str; 2] {
    [requested.unwrap_or(DEFAULT_MODE), FALLBACK_MODE]
}

/// Look up a route, falling back to driving when the first mode finds none.
///
/// Validation and credential errors are returned before any upstream call.
/// Upstream outcomes, including rejections, come back as an envelope.
pub async fn get_directions(
    transport: &dyn Transport,
    config: &UpstreamConfig,
    request: &DirectionsRequest,
) -> Result<DirectionsEnvelope> {
    let (origin, destination) = request.endpoints()?;
    let api_key = config.require_api_key()?;
    let waypoints = request.waypoints();

    for (attempt, mode) in candidate_modes(request.requested_mode())
        .into_iter()
        .enumerate()
    {
        let query = UpstreamQuery::directions(origin, destination, waypoints, mode, api_key);

        info!(
            mode,
            origin,
            destination,
            waypoints = waypoints.len(),
            "requesting directions"
        );
        debug!(url = %query.redacted_url(config.base_url()), "upstream request");

        let body = transport.get_json(&query.url(config.base_url())).await?;
        let reply = UpstreamReply::from_body(body);

        metrics::counter!(
            "mapsproxy_upstream_requests_total",
            "endpoint" => "directions",
            "mode" => mode.to_string(),
            "status" => reply.status.to_string()
        )
        .increment(1);

        match reply.status {
            UpstreamStatus::Ok => {
                info!(mode, "route found");
                return Ok(DirectionsEnvelope::found(reply.body));
            }
            UpstreamStatus::ZeroResults => {
                info!(mode, status = "ZERO_RESULTS", "no route for mode");
                if attempt == 0 {
                    metrics::counter!("mapsproxy_mode_fallbacks_total").increment(1);
                }
            }
            status @ (UpstreamStatus::Other(_) | UpstreamStatus::Missing) => {
                warn!(
                    mode,
                    status = %status,
                    error_message = reply.error_message.as_deref().unwrap_or(""),
                    "directions request rejected upstream"
                );
                let error = reply
                    .error_message
                    .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
                return Ok(DirectionsEnvelope::rejected(
                    status.reported().map(str::to_string),
                    error,
                ));
            }
        }
    }

    Ok(DirectionsEnvelope::no_route())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{test_config, ScriptedTransport, TEST_API_KEY};
    use serde_json::json;

    #[test]
    fn test_candidate_modes() {
        assert_eq!(candidate_modes(None), ["bicycling", "driving"]);
        assert_eq!(candidate_modes(Some("walking")), ["walking", "driving"]);
        assert_eq!(candidate_modes(Some("driving")), ["driving", "driving"]);
    }

    #[tokio::test]
    async fn test_missing_origin_makes_no_call() {
        let transport = ScriptedTransport::new();
        let request = DirectionsRequest {
            destination: Some("Potsdam".to_string()),
            ..DirectionsRequest::default()
        };

        let err = get_directions(&transport, &test_config(), &request)
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_call() {
        let transport = ScriptedTransport::new();
        let config = test_config().without_api_key();
        let request = DirectionsRequest::new("Berlin", "Potsdam");

        let err = get_directions(&transport, &config, &request)
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::FailedPrecondition);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ok_on_first_mode_stops() {
        let payload = json!({"status": "OK", "routes": [{"summary": "B1"}]});
        let transport = ScriptedTransport::new().reply(payload.clone());
        let request = DirectionsRequest::new("Berlin", "Potsdam");

        let envelope = get_directions(&transport, &test_config(), &request)
            .await
            .unwrap();

        assert_eq!(envelope, DirectionsEnvelope::found(payload));
        let urls = transport.requested_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("mode=bicycling"));
        assert!(urls[0].contains(&format!("key={}", TEST_API_KEY)));
    }

    #[tokio::test]
    async fn test_zero_results_falls_back_to_driving() {
        let second = json!({"status": "OK", "routes": [{"summary": "A10"}]});
        let transport = ScriptedTransport::new()
            .status("ZERO_RESULTS")
            .reply(second.clone());
        let request = DirectionsRequest::new("Berlin", "Potsdam").with_mode("walking");

        let envelope = get_directions(&transport, &test_config(), &request)
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.data, Some(second));
        let urls = transport.requested_urls();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].contains("mode=walking"));
        assert!(urls[1].contains("mode=driving"));
    }

    #[tokio::test]
    async fn test_upstream_error_skips_fallback() {
        let transport = ScriptedTransport::new().reply(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }));
        let request = DirectionsRequest::new("Berlin", "Potsdam");

        let envelope = get_directions(&transport, &test_config(), &request)
            .await
            .unwrap();

        assert_eq!(
            envelope,
            DirectionsEnvelope::failed("REQUEST_DENIED", "The provided API key is invalid.")
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_upstream_error_without_message() {
        let transport = ScriptedTransport::new().status("OVER_QUERY_LIMIT");
        let request = DirectionsRequest::new("Berlin", "Potsdam");

        let envelope = get_directions(&transport, &test_config(), &request)
            .await
            .unwrap();

        assert_eq!(envelope.status.as_deref(), Some("OVER_QUERY_LIMIT"));
        assert_eq!(envelope.error.as_deref(), Some("Unknown error"));
    }

    #[tokio::test]
    async fn test_reply_without_status_is_failure_envelope() {
        let transport = ScriptedTransport::new().reply(json!({"routes": []}));
        let request = DirectionsRequest::new("Berlin", "Potsdam");

        let envelope = get_directions(&transport, &test_config(), &request)
            .await
            .unwrap();

        assert_eq!(envelope, DirectionsEnvelope::rejected(None, "Unknown error"));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "error": "Unknown error"})
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_reply_without_status_keeps_error_message() {
        let transport = ScriptedTransport::new().reply(json!({"error_message": "quota"}));
        let request = DirectionsRequest::new("A", "B");

        let envelope = get_directions(&transport, &test_config(), &request)
            .await
            .unwrap();

        assert_eq!(envelope.status, None);
        assert_eq!(envelope.error.as_deref(), Some("quota"));
    }

    #[tokio::test]
    async fn test_all_modes_zero_results() {
        let transport = ScriptedTransport::new()
            .status("ZERO_RESULTS")
            .status("ZERO_RESULTS");
        let request = DirectionsRequest::new("Berlin", "Reykjavik");

        let envelope = get_directions(&transport, &test_config(), &request)
            .await
            .unwrap();

        assert_eq!(envelope, DirectionsEnvelope::no_route());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_driving_request_is_attempted_twice() {
        let transport = ScriptedTransport::new()
            .status("ZERO_RESULTS")
            .status("ZERO_RESULTS");
        let request = DirectionsRequest::new("A", "B").with_mode("driving");

        get_directions(&transport, &test_config(), &request)
            .await
            .unwrap();

        let urls = transport.requested_urls();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], urls[1]);
    }

    #[tokio::test]
    async fn test_waypoints_in_every_attempt() {
        let transport = ScriptedTransport::new()
            .status("ZERO_RESULTS")
            .status("OK");
        let request = DirectionsRequest::new("A", "B").with_waypoints(["X", "Y Z"]);

        get_directions(&transport, &test_config(), &request)
            .await
            .unwrap();

        for url in transport.requested_urls() {
            assert!(url.ends_with("&waypoints=X%7CY%20Z"), "unexpected url {url}");
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_internal() {
        let transport = ScriptedTransport::new().fail("connection reset by peer");
        let request = DirectionsRequest::new("A", "B");

        let err = get_directions(&transport, &test_config(), &request)
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Internal);
        assert_eq!(err.to_string(), "connection reset by peer");
    }
}
