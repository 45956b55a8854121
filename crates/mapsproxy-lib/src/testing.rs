//! Scripted upstream for tests.
//!
//! [`ScriptedTransport`] replays canned replies in order and records every URL
//! it was asked for, so tests can assert both the outcome and the exact
//! number and shape of outbound calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::proxy::MapsProxy;
use crate::transport::Transport;

/// API key used by test configurations.
pub const TEST_API_KEY: &str = "test-api-key";

/// Base URL used by test configurations.
pub const TEST_BASE_URL: &str = "https://maps.test/api";

enum Scripted {
    Reply(Value),
    Failure(String),
}

/// In-memory [`Transport`] returning scripted replies.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body to be returned by the next call.
    pub fn reply(self, body: Value) -> Self {
        lock(&self.script).push_back(Scripted::Reply(body));
        self
    }

    /// Queue a reply carrying only `status`.
    pub fn status(self, status: &str) -> Self {
        self.reply(json!({ "status": status }))
    }

    /// Queue a transport failure for the next call.
    pub fn fail(self, message: impl Into<String>) -> Self {
        lock(&self.script).push_back(Scripted::Failure(message.into()));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// URLs requested so far, in call order.
    pub fn requested_urls(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        lock(&self.requests).push(url.to_string());
        match lock(&self.script).pop_front() {
            Some(Scripted::Reply(body)) => Ok(body),
            Some(Scripted::Failure(message)) => Err(Error::internal(message)),
            None => Err(Error::internal("no scripted reply left")),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Configuration with [`TEST_API_KEY`] and [`TEST_BASE_URL`].
pub fn test_config() -> UpstreamConfig {
    UpstreamConfig::new(TEST_API_KEY).with_base_url(TEST_BASE_URL)
}

/// A proxy over `transport` using [`test_config`].
pub fn test_proxy(transport: Arc<ScriptedTransport>) -> MapsProxy {
    MapsProxy::new(test_config(), transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_and_records_urls() {
        let transport = ScriptedTransport::new().status("ZERO_RESULTS").status("OK");

        let first = transport.get_json("https://a").await.unwrap();
        let second = transport.get_json("https://b").await.unwrap();

        assert_eq!(first["status"], "ZERO_RESULTS");
        assert_eq!(second["status"], "OK");
        assert_eq!(transport.requested_urls(), vec!["https://a", "https://b"]);
    }

    #[tokio::test]
    async fn test_exhausted_script_fails() {
        let transport = ScriptedTransport::new();
        assert!(transport.get_json("https://a").await.is_err());
        assert_eq!(transport.call_count(), 1);
    }
}
