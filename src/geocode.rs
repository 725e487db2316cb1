//! Reverse geocoding behind a capability trait.
//!
//! Resolution is strictly best-effort: any failure degrades to the fixed
//! placeholder address and never aborts a submission.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Address reported when coordinates are absent or resolution fails.
pub const LOCATION_UNAVAILABLE: &str = "Location not available";

pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_USER_AGENT: &str = "pothole-guard";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Form-style parsing: both parts must be present, non-empty after
    /// trimming, and numeric; anything else counts as absent coordinates.
    pub fn from_parts(lat: Option<&str>, lon: Option<&str>) -> Option<Self> {
        let lat = lat?.trim();
        let lon = lon?.trim();
        if lat.is_empty() || lon.is_empty() {
            return None;
        }
        Some(Self {
            lat: lat.parse().ok()?,
            lon: lon.parse().ok()?,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding service returned status {status}")]
    Status { status: reqwest::StatusCode },

    #[error("no address found for {coords}")]
    NoResult { coords: Coordinates },

    #[error("invalid geocoding endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Capability seam for the reverse-geocoding collaborator.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, coords: Coordinates) -> Result<String, GeocodeError>;
}

/// Resolver used in offline mode; always degrades to the placeholder.
#[derive(Debug, Default)]
pub struct NoopResolver;

#[async_trait]
impl LocationResolver for NoopResolver {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn resolve(&self, coords: Coordinates) -> Result<String, GeocodeError> {
        Err(GeocodeError::NoResult { coords })
    }
}

/// Reverse lookup against the Nominatim `reverse` endpoint.
pub struct NominatimResolver {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

impl NominatimResolver {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_owned())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: NOMINATIM_ENDPOINT.to_owned(),
        })
    }

}

#[async_trait]
impl LocationResolver for NominatimResolver {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn resolve(&self, coords: Coordinates) -> Result<String, GeocodeError> {
        let url = Url::parse_with_params(
            &self.endpoint,
            [
                ("format", "jsonv2".to_owned()),
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
            ],
        )?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GeocodeError::Status {
                status: response.status(),
            });
        }
        let body: ReverseResponse = response.json().await?;
        body.display_name
            .filter(|name| !name.is_empty())
            .ok_or(GeocodeError::NoResult { coords })
    }
}

/// Resolve to an address, or to the placeholder when coordinates are absent
/// or the resolver fails. The resolver is not invoked without coordinates.
pub async fn resolve_or_placeholder(
    resolver: &dyn LocationResolver,
    coords: Option<Coordinates>,
) -> String {
    let Some(coords) = coords else {
        return LOCATION_UNAVAILABLE.to_owned();
    };
    match resolver.resolve(coords).await {
        Ok(address) => address,
        Err(_) => LOCATION_UNAVAILABLE.to_owned(),
    }
}
