//! [`MapsProxy`]: configuration and transport bundled for the HTTP services.

use std::fmt;
use std::sync::Arc;

use crate::config::UpstreamConfig;
use crate::directions::get_directions;
use crate::envelope::{DirectionsEnvelope, PlacesEnvelope};
use crate::error::Result;
use crate::places::get_nearby_places;
use crate::request::{DirectionsRequest, NearbyPlacesRequest};
use crate::transport::{HttpTransport, Transport};

/// Both proxy operations over one configuration and transport.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct MapsProxy {
    config: UpstreamConfig,
    transport: Arc<dyn Transport>,
}

impl MapsProxy {
    pub fn new(config: UpstreamConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Build a proxy that talks to the upstream over HTTP.
    pub fn connect(config: UpstreamConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    pub async fn get_directions(&self, request: &DirectionsRequest) -> Result<DirectionsEnvelope> {
        get_directions(self.transport.as_ref(), &self.config, request).await
    }

    pub async fn get_nearby_places(&self, request: &NearbyPlacesRequest) -> Result<PlacesEnvelope> {
        get_nearby_places(self.transport.as_ref(), &self.config, request).await
    }
}

impl fmt::Debug for MapsProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapsProxy")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
