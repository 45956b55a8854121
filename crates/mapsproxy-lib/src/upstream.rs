//! Interpretation of upstream JSON replies.

use std::fmt;

use serde_json::Value;

/// Status reported in the `status` field of every upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamStatus {
    Ok,
    ZeroResults,
    /// Any other status, e.g. `REQUEST_DENIED` or `OVER_QUERY_LIMIT`.
    Other(String),
    /// The reply carried no string `status` at all.
    Missing,
}

impl UpstreamStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "OK" => UpstreamStatus::Ok,
            "ZERO_RESULTS" => UpstreamStatus::ZeroResults,
            other => UpstreamStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UpstreamStatus::Ok => "OK",
            UpstreamStatus::ZeroResults => "ZERO_RESULTS",
            UpstreamStatus::Other(status) => status,
            UpstreamStatus::Missing => "MISSING",
        }
    }

    /// The status as reported upstream; `None` when the reply had none.
    pub fn reported(&self) -> Option<&str> {
        match self {
            UpstreamStatus::Missing => None,
            status => Some(status.as_str()),
        }
    }

    /// `OK` and `ZERO_RESULTS` are the only non-failure statuses.
    pub fn is_failure(&self) -> bool {
        matches!(self, UpstreamStatus::Other(_) | UpstreamStatus::Missing)
    }
}

impl fmt::Display for UpstreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded upstream reply: its status, optional error message, and the
/// complete body for passthrough.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: UpstreamStatus,
    pub error_message: Option<String>,
    pub body: Value,
}

impl UpstreamReply {
    /// Decode a reply body. A body without a string `status` (including a
    /// non-object body) decodes as [`UpstreamStatus::Missing`].
    pub fn from_body(body: Value) -> Self {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map_or(UpstreamStatus::Missing, UpstreamStatus::parse);

        let error_message = body
            .get("error_message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Self {
            status,
            error_message,
            body,
        }
    }

    /// The `results` array, or empty when the upstream omitted it.
    pub fn into_results(self) -> Vec<Value> {
        match self.body {
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(results)) => results,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}
