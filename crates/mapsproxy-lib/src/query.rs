//! Construction of upstream request URLs.
//!
//! Parameter values are percent-encoded with the URI-component character set
//! (unreserved characters kept, spaces become `%20`). Waypoints are joined
//! with `|` before encoding, so the separator travels as `%7C`.

/// Upstream path of the directions endpoint.
pub const DIRECTIONS_PATH: &str = "/directions/json";

/// Upstream path of the nearby search endpoint.
pub const NEARBY_SEARCH_PATH: &str = "/place/nearbysearch/json";

const KEY_PARAM: &str = "key";
const REDACTED: &str = "REDACTED";

/// A single upstream GET request: endpoint path plus ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamQuery {
    path: &'static str,
    params: Vec<(&'static str, String)>,
}

impl UpstreamQuery {
    /// Directions lookup for a single travel mode.
    pub fn directions(
        origin: &str,
        destination: &str,
        waypoints: &[String],
        mode: &str,
        api_key: &str,
    ) -> Self {
        let mut params = vec![
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("mode", mode.to_string()),
            (KEY_PARAM, api_key.to_string()),
        ];
        if !waypoints.is_empty() {
            params.push(("waypoints", waypoints.join("|")));
        }

        Self {
            path: DIRECTIONS_PATH,
            params,
        }
    }

    /// Nearby search around `location`.
    pub fn nearby_places(
        location: &str,
        radius: f64,
        place_type: Option<&str>,
        api_key: &str,
    ) -> Self {
        let mut params = vec![
            ("location", location.to_string()),
            ("radius", radius.to_string()),
            (KEY_PARAM, api_key.to_string()),
        ];
        if let Some(place_type) = place_type {
            params.push(("type", place_type.to_string()));
        }

        Self {
            path: NEARBY_SEARCH_PATH,
            params,
        }
    }

    pub fn path(&self) -> &str {
        self.path
    }

    /// Raw (unencoded) value of a parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Full request URL against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        self.render(base_url, false)
    }

    /// Same as [`url`](Self::url) with the credential masked, for logging.
    pub fn redacted_url(&self, base_url: &str) -> String {
        self.render(base_url, true)
    }

    fn render(&self, base_url: &str, redact: bool) -> String {
        let query = self
            .params
            .iter()
            .map(|(name, value)| {
                let value = if redact && *name == KEY_PARAM {
                    REDACTED
                } else {
                    value.as_str()
                };
                format!("{}={}", name, urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");

        format!("{}{}?{}", base_url.trim_end_matches('/'), self.path, query)
    }
}
