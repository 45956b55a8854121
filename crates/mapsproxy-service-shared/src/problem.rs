//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Typed proxy errors (`invalid-argument`, `failed-precondition`, `internal`)
//! leave the services as problem documents. The error code string travels in
//! the `code` extension member so callers can branch on it directly.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use mapsproxy_lib::{Error as ProxyError, ErrorCode};

/// Problem type URI for missing or malformed request fields.
pub const PROBLEM_INVALID_ARGUMENT: &str = "/problems/invalid-argument";

/// Problem type URI for requests the server is not configured to serve.
pub const PROBLEM_FAILED_PRECONDITION: &str = "/problems/failed-precondition";

/// Problem type URI for unexpected failures.
pub const PROBLEM_INTERNAL: &str = "/problems/internal";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use mapsproxy_service_shared::ProblemDetails;
///
/// let problem = ProblemDetails::invalid_argument(
///     "Origin and destination are required",
///     "req-12345",
/// );
/// assert_eq!(problem.status, 400);
/// assert_eq!(problem.code.as_deref(), Some("invalid-argument"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (the request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Error code (`invalid-argument`, `failed-precondition`, `internal`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            code: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code.as_str().to_string());
        self
    }

    /// Problem for an error code, with the status that code maps to.
    pub fn for_code(
        code: ErrorCode,
        detail: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        let (type_uri, title, status) = match code {
            ErrorCode::InvalidArgument => (
                PROBLEM_INVALID_ARGUMENT,
                "Invalid Argument",
                StatusCode::BAD_REQUEST,
            ),
            // Same status the callable-function protocol uses.
            ErrorCode::FailedPrecondition => (
                PROBLEM_FAILED_PRECONDITION,
                "Failed Precondition",
                StatusCode::BAD_REQUEST,
            ),
            ErrorCode::Internal => (
                PROBLEM_INTERNAL,
                "Internal Error",
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        };

        Self::new(type_uri, title, status)
            .with_detail(detail)
            .with_request_id(request_id)
            .with_code(code)
    }

    /// Create a 400 problem for missing or malformed input.
    pub fn invalid_argument(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::for_code(ErrorCode::InvalidArgument, detail, request_id)
    }

    /// Create a 400 problem for a missing server-side precondition.
    pub fn failed_precondition(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::for_code(ErrorCode::FailedPrecondition, detail, request_id)
    }

    /// Create a 500 problem for unexpected failures.
    pub fn internal(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::for_code(ErrorCode::Internal, detail, request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert a proxy error to ProblemDetails, keeping its message as detail.
pub fn from_proxy_error(error: &ProxyError, request_id: &str) -> ProblemDetails {
    ProblemDetails::for_code(error.code(), error.to_string(), request_id)
}
