//! HTTP transport used to reach the upstream mapping API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Issues a GET request and decodes the body as JSON.
///
/// The proxies only ever talk to the upstream through this trait, so tests
/// can replace the network with canned replies.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client honouring the configured timeout, if any.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        // reqwest includes the request URL in its errors; the URL carries the
        // API key, so it is stripped before the error can reach a caller.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::from(e.without_url()))?;

        let status = response.status();
        debug!(http_status = status.as_u16(), "upstream responded");

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::from(e.without_url()))?;

        Ok(serde_json::from_slice(&body)?)
    }
}
