//! Cross-origin configuration for browser clients.
//!
//! By default any origin may call the services. `CORS_ALLOWED_ORIGINS`
//! narrows that to a comma-separated list; `*` keeps the permissive default.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Environment variable holding the allowed origins.
pub const CORS_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// `None` allows every origin.
    pub allowed_origins: Option<Vec<String>>,
}

impl CorsConfig {
    /// Allow every origin.
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn with_origins<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: Some(origins.into_iter().map(Into::into).collect()),
        }
    }

    pub fn from_env() -> Self {
        std::env::var(CORS_ORIGINS_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    /// Parse a comma-separated origin list. Empty input or `*` means any origin.
    pub fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            Self::permissive()
        } else {
            Self::with_origins(origins)
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_none()
    }
}

/// Build the CORS layer. Origins that are not valid header values are
/// skipped with a warning.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match &config.allowed_origins {
        None => layer.allow_origin(Any),
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}
