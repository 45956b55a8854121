//! Handler response: an envelope or an RFC 9457 problem.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::problem::ProblemDetails;

/// HTTP response - either an envelope (always 200, even when the envelope
/// reports `success: false`) or a typed error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ServiceResponse<T> {
    Success(T),
    Error(ProblemDetails),
}

impl<T> ServiceResponse<T> {
    pub fn problem(problem: impl Into<Box<ProblemDetails>>) -> Self {
        ServiceResponse::Error(*problem.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ServiceResponse::Success(_))
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        match self {
            ServiceResponse::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            ServiceResponse::Error(problem) => problem.into_response(),
        }
    }
}
