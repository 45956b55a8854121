//! mapsproxy library entry points.
//!
//! This crate holds everything needed to relay a directions or nearby-place
//! lookup to the upstream mapping API: the injected [`UpstreamConfig`], the
//! query builder, the [`Transport`] seam that issues the HTTP call, and the
//! two proxies that normalize upstream replies into an envelope. The HTTP
//! services should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod directions;
pub mod envelope;
pub mod error;
pub mod places;
pub mod proxy;
pub mod query;
pub mod request;
pub mod transport;
pub mod upstream;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::{UpstreamConfig, API_KEY_ENV, DEFAULT_BASE_URL};
pub use directions::{candidate_modes, get_directions, DEFAULT_MODE, FALLBACK_MODE};
pub use envelope::{DirectionsEnvelope, PlacesEnvelope, NO_ROUTE_MESSAGE};
pub use error::{Error, ErrorCode, Result};
pub use places::{get_nearby_places, DEFAULT_RADIUS};
pub use proxy::MapsProxy;
pub use query::UpstreamQuery;
pub use request::{DirectionsRequest, NearbyPlacesRequest};
pub use transport::{HttpTransport, Transport};
pub use upstream::{UpstreamReply, UpstreamStatus};
