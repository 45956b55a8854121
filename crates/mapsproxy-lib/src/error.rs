use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenient result alias for the mapsproxy library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds surfaced to callers of the proxy endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    /// A required request field was missing or empty.
    InvalidArgument,
    /// The server is not configured to serve the request (missing credential).
    FailedPrecondition,
    /// Anything unexpected: transport failures, unparseable upstream bodies.
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "invalid-argument",
            ErrorCode::FailedPrecondition => "failed-precondition",
            ErrorCode::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level library error type.
///
/// Upstream domain outcomes (`REQUEST_DENIED`, exhausted fallbacks, ...) are
/// not errors; they travel back to the caller inside an envelope. Only the
/// cases below abort a request.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a required request field is missing.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Raised when the upstream credential has not been configured.
    #[error("{message}")]
    FailedPrecondition { message: String },

    /// Raised for unexpected failures that have no more specific variant.
    #[error("{message}")]
    Internal { message: String },

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn failed_precondition<S: Into<String>>(message: S) -> Self {
        Self::FailedPrecondition {
            message: message.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Error code reported to the caller for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Error::FailedPrecondition { .. } => ErrorCode::FailedPrecondition,
            Error::Internal { .. } | Error::Http(_) | Error::Json(_) => ErrorCode::Internal,
        }
    }
}
