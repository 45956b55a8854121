//! Test utilities for microservice handler testing.
//!
//! Builds [`AppState`] over a [`ScriptedTransport`] so handler tests can
//! script upstream replies and count outbound calls.

use std::sync::Arc;

pub use mapsproxy_lib::testing::{test_config, ScriptedTransport, TEST_API_KEY, TEST_BASE_URL};
use mapsproxy_lib::MapsProxy;

use crate::state::AppState;

/// State with the test API key over `transport`.
pub fn test_state(transport: Arc<ScriptedTransport>) -> AppState {
    AppState::new(mapsproxy_lib::testing::test_proxy(transport))
}

/// State with no API key configured.
pub fn test_state_without_key(transport: Arc<ScriptedTransport>) -> AppState {
    AppState::new(MapsProxy::new(test_config().without_api_key(), transport))
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}
