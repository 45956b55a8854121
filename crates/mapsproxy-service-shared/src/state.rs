//! Application state for HTTP microservices.
//!
//! This module provides the shared state structure that axum handlers use to
//! reach the configured proxy.

use std::sync::Arc;

use mapsproxy_lib::{Error as ProxyError, MapsProxy, UpstreamConfig};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The HTTP client for the upstream could not be built.
    ClientBuild(ProxyError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientBuild(e) => write!(f, "failed to build upstream client: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ClientBuild(e) => Some(e),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::post, extract::State};
/// use mapsproxy_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let proxy = state.proxy();
///     // ... use proxy
/// }
///
/// let state = AppState::from_env().unwrap();
/// let app = Router::new()
///     .route("/getDirections", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    proxy: MapsProxy,
}

impl AppState {
    /// Build state from an upstream configuration, talking HTTP.
    ///
    /// A missing API key is not an error here: the service still starts and
    /// each request is answered with `failed-precondition`.
    pub fn connect(config: UpstreamConfig) -> Result<Self, AppStateError> {
        if !config.has_api_key() {
            tracing::warn!(
                env = mapsproxy_lib::API_KEY_ENV,
                "upstream API key not configured; requests will fail with failed-precondition"
            );
        }

        tracing::info!(base_url = %config.base_url(), timeout = ?config.timeout(), "building upstream client");
        let proxy = MapsProxy::connect(config).map_err(AppStateError::ClientBuild)?;
        Ok(Self::new(proxy))
    }

    /// Build state from environment variables (see [`UpstreamConfig::from_env`]).
    pub fn from_env() -> Result<Self, AppStateError> {
        Self::connect(UpstreamConfig::from_env())
    }

    /// Create application state from a pre-built proxy.
    ///
    /// This is useful for testing with a scripted transport.
    pub fn new(proxy: MapsProxy) -> Self {
        Self {
            inner: Arc::new(AppStateInner { proxy }),
        }
    }

    pub fn proxy(&self) -> &MapsProxy {
        &self.inner.proxy
    }

    /// Whether the upstream credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.inner.proxy.config().has_api_key()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("base_url", &self.inner.proxy.config().base_url())
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}
