//! Place search against a Nominatim-compatible endpoint.

use serde::Deserialize;
use thiserror::Error;

use crate::constants::USER_AGENT;
use crate::geometry::GeoPoint;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("search request failed: {0}")]
    Http(String),

    #[error("search service answered with status {0}")]
    Status(u16),

    #[error("could not read search response: {0}")]
    Decode(String),

    #[error("search result has an invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

/// A geocoded place
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: u64,
    pub display_name: String,
    pub location: GeoPoint,
}

impl Place {
    /// Name up to the first comma, used to label waypoints and pins
    pub fn short_name(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.display_name)
    }
}

pub trait Geocoder: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(default)]
    place_id: u64,
    display_name: String,
    lat: String,
    lon: String,
}

impl TryFrom<NominatimPlace> for Place {
    type Error = GeocodeError;

    fn try_from(raw: NominatimPlace) -> Result<Self, Self::Error> {
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| GeocodeError::InvalidCoordinate(s.to_string()))
        };
        let lat = parse(&raw.lat)?;
        let lon = parse(&raw.lon)?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GeocodeError::InvalidCoordinate(format!("{}, {}", raw.lat, raw.lon)));
        }

        Ok(Place {
            id: raw.place_id,
            display_name: raw.display_name,
            location: GeoPoint::new(lon, lat),
        })
    }
}

/// Parse a Nominatim `format=json` response body
pub fn parse_response(body: &str) -> Result<Vec<Place>, GeocodeError> {
    let raw: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;
    raw.into_iter().map(Place::try_from).collect()
}

pub struct NominatimGeocoder {
    url: String,
    limit: usize,
}

impl NominatimGeocoder {
    pub fn new(url: impl Into<String>, limit: usize) -> Self {
        Self {
            url: url.into(),
            limit: limit.max(1),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response = ureq::get(&self.url)
            .set("User-Agent", USER_AGENT)
            .query("format", "json")
            .query("q", query)
            .query("limit", &self.limit.to_string())
            .call();

        match response {
            Ok(resp) => {
                let body = resp
                    .into_string()
                    .map_err(|e| GeocodeError::Decode(e.to_string()))?;
                parse_response(&body)
            }
            Err(ureq::Error::Status(code, _)) => Err(GeocodeError::Status(code)),
            Err(e) => Err(GeocodeError::Http(e.to_string())),
        }
    }
}
