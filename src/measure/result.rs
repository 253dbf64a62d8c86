//! Finalized measurement records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::GeoPoint;

use super::format::{format_area, format_distance};
use super::route::Waypoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Distance,
    Area,
    Marker,
}

impl MeasurementKind {
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKind::Distance => "distance",
            MeasurementKind::Area => "area",
            MeasurementKind::Marker => "marker",
        }
    }

    /// Render a raw value in this kind's units
    pub fn format_value(&self, value: f64) -> String {
        match self {
            MeasurementKind::Distance => format_distance(value),
            MeasurementKind::Area => format_area(value),
            MeasurementKind::Marker => String::new(),
        }
    }
}

/// Store-assigned identity, used to key overlays and scheduled tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ResultId(pub u64);

/// Waypoint data carried by results built from search selections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub waypoints: Vec<Waypoint>,
    /// Per-leg lengths in meters (empty for polygon routes)
    #[serde(default)]
    pub segments: Vec<f64>,
}

/// A finished measurement. Immutable once built; owned by the result store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    #[serde(default)]
    pub id: ResultId,
    pub kind: MeasurementKind,
    /// Meters for distances, square meters for areas, 0 for markers
    pub value: f64,
    pub text: String,
    pub coordinates: Vec<GeoPoint>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteSummary>,
}

impl MeasurementResult {
    pub fn new(kind: MeasurementKind, value: f64, text: String, coordinates: Vec<GeoPoint>) -> Self {
        Self {
            id: ResultId::default(),
            kind,
            value,
            text,
            coordinates,
            created_at: Utc::now(),
            route: None,
        }
    }

    pub fn with_route(mut self, route: RouteSummary) -> Self {
        self.route = Some(route);
        self
    }

    /// Position for labels: the last vertex of a path, the first otherwise
    pub fn label_anchor(&self) -> Option<GeoPoint> {
        match self.kind {
            MeasurementKind::Distance => self.coordinates.last().copied(),
            MeasurementKind::Area | MeasurementKind::Marker => self.coordinates.first().copied(),
        }
    }
}

/// Entry of the recent-measurements ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: MeasurementKind,
    pub value: f64,
    pub text: String,
    #[serde(rename = "when")]
    pub created_at: DateTime<Utc>,
}

impl From<&MeasurementResult> for HistoryEntry {
    fn from(result: &MeasurementResult) -> Self {
        Self {
            kind: result.kind,
            value: result.value,
            text: result.text.clone(),
            created_at: result.created_at,
        }
    }
}
