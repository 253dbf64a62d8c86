//! Multi-waypoint routes assembled from search selections.
//!
//! Waypoints arrive one at a time from the search panel, so the builder only
//! checks role ordering and computes readings; deciding when to finalize is
//! the controller's job.

use serde::{Deserialize, Serialize};

use crate::geometry::{GeoPoint, GeometryAdapter, MapPoint};

use super::error::MeasureError;
use super::format::{format_area, format_route};
use super::result::{MeasurementKind, MeasurementResult, RouteSummary};
use super::session::LiveReading;
use super::tools::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointRole {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub location: GeoPoint,
    pub role: WaypointRole,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, location: GeoPoint, role: WaypointRole) -> Self {
        Self {
            name: name.into(),
            location,
            role,
        }
    }
}

/// Shape a route resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RouteKind {
    /// Open path, reported with per-leg breakdown
    #[default]
    Distance,
    /// Waypoints form one implicitly closed polygon ring
    Area,
}

impl RouteKind {
    pub fn min_waypoints(&self) -> usize {
        match self {
            RouteKind::Distance => 2,
            RouteKind::Area => 3,
        }
    }

    pub fn result_kind(&self) -> MeasurementKind {
        match self {
            RouteKind::Distance => MeasurementKind::Distance,
            RouteKind::Area => MeasurementKind::Area,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteBuilder {
    kind: RouteKind,
    waypoints: Vec<Waypoint>,
}

impl RouteBuilder {
    pub fn new(kind: RouteKind) -> Self {
        Self {
            kind,
            waypoints: Vec::new(),
        }
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Whether the next waypoint must be the start
    pub fn needs_start(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Append a waypoint and return the updated reading.
    ///
    /// The first waypoint must be `Start`, and only the first. Rejected
    /// waypoints leave the builder unchanged.
    pub fn add_waypoint(
        &mut self,
        waypoint: Waypoint,
        geometry: &dyn GeometryAdapter,
    ) -> Result<LiveReading, MeasureError> {
        let is_start = waypoint.role == WaypointRole::Start;
        if is_start != self.waypoints.is_empty() {
            return Err(MeasureError::InvalidRole);
        }

        self.waypoints.push(waypoint);
        Ok(self.reading(geometry))
    }

    /// Drop the newest waypoint unless it is the start
    pub fn undo(&mut self) -> Option<Waypoint> {
        if self.waypoints.len() <= 1 {
            return None;
        }
        self.waypoints.pop()
    }

    /// Keep only the start waypoint. Returns false when nothing was dropped.
    pub fn reset_to_start(&mut self) -> bool {
        if self.waypoints.len() <= 1 {
            return false;
        }
        self.waypoints.truncate(1);
        true
    }

    fn projected(&self, geometry: &dyn GeometryAdapter) -> Vec<MapPoint> {
        self.waypoints
            .iter()
            .map(|w| geometry.to_projected(w.location))
            .collect()
    }

    /// Leg lengths, each pair converted to projected coordinates separately
    pub fn segments(&self, geometry: &dyn GeometryAdapter) -> Vec<f64> {
        self.waypoints
            .windows(2)
            .map(|pair| geometry.geo_length(&[pair[0].location, pair[1].location]))
            .collect()
    }

    pub fn reading(&self, geometry: &dyn GeometryAdapter) -> LiveReading {
        let segments = self.segments(geometry);
        let total = match self.kind {
            RouteKind::Distance => Some(segments.iter().sum()),
            RouteKind::Area if self.waypoints.len() >= 3 => {
                Some(geometry.area(&self.projected(geometry)))
            }
            RouteKind::Area => None,
        };

        LiveReading {
            total,
            segment: segments.last().copied(),
        }
    }

    /// Build the result and empty the builder.
    ///
    /// Returns `Ok(None)` when only the start (or nothing) was added, which the
    /// caller treats as a cancel. Polygon routes below three waypoints are
    /// rejected and left as they are.
    pub fn finalize(
        &mut self,
        geometry: &dyn GeometryAdapter,
    ) -> Result<Option<MeasurementResult>, MeasureError> {
        if self.waypoints.len() <= 1 {
            self.waypoints.clear();
            return Ok(None);
        }

        let need = self.kind.min_waypoints();
        if self.waypoints.len() < need {
            return Err(MeasureError::InsufficientPoints {
                tool: Tool::MultiRoute,
                have: self.waypoints.len(),
                need,
            });
        }

        let result = match self.kind {
            RouteKind::Distance => {
                let segments = self.segments(geometry);
                let total: f64 = segments.iter().sum();
                let text = format_route(total, &segments);
                let coordinates = self.waypoints.iter().map(|w| w.location).collect();
                MeasurementResult::new(MeasurementKind::Distance, total, text, coordinates)
                    .with_route(RouteSummary {
                        waypoints: std::mem::take(&mut self.waypoints),
                        segments,
                    })
            }
            RouteKind::Area => {
                let area = geometry.area(&self.projected(geometry));
                let coordinates = self.waypoints.iter().map(|w| w.location).collect();
                MeasurementResult::new(MeasurementKind::Area, area, format_area(area), coordinates)
                    .with_route(RouteSummary {
                        waypoints: std::mem::take(&mut self.waypoints),
                        segments: Vec::new(),
                    })
            }
        };

        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SphericalMercator;
    use crate::measure::format::format_distance;

    fn stop(name: &str, lon: f64, lat: f64, role: WaypointRole) -> Waypoint {
        Waypoint::new(name, GeoPoint::new(lon, lat), role)
    }

    #[test]
    fn test_first_waypoint_must_be_start() {
        let adapter = SphericalMercator;
        let mut builder = RouteBuilder::new(RouteKind::Distance);
        let err = builder
            .add_waypoint(stop("a", 0.0, 0.0, WaypointRole::Middle), &adapter)
            .unwrap_err();
        assert_eq!(err, MeasureError::InvalidRole);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let adapter = SphericalMercator;
        let mut builder = RouteBuilder::new(RouteKind::Distance);
        builder
            .add_waypoint(stop("a", 0.0, 0.0, WaypointRole::Start), &adapter)
            .unwrap();
        let err = builder
            .add_waypoint(stop("b", 0.0, 0.1, WaypointRole::Start), &adapter)
            .unwrap_err();
        assert_eq!(err, MeasureError::InvalidRole);
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_distance_route_total_and_breakdown() {
        let adapter = SphericalMercator;
        let mut builder = RouteBuilder::new(RouteKind::Distance);
        builder
            .add_waypoint(stop("a", 0.0, 0.0, WaypointRole::Start), &adapter)
            .unwrap();
        builder
            .add_waypoint(stop("b", 0.0, 0.1, WaypointRole::Middle), &adapter)
            .unwrap();
        let reading = builder
            .add_waypoint(stop("c", 0.1, 0.1, WaypointRole::End), &adapter)
            .unwrap();

        let segments = builder.segments(&adapter);
        assert_eq!(segments.len(), 2);

        let result = builder.finalize(&adapter).unwrap().unwrap();
        let sum: f64 = segments.iter().sum();
        assert!((result.value - sum).abs() < 1e-6);
        assert!((reading.total.unwrap() - sum).abs() < 1e-6);
        assert!(result.text.contains(&format_distance(result.value)));
        for segment in &segments {
            assert!(result.text.contains(&format_distance(*segment)));
        }

        let route = result.route.unwrap();
        assert_eq!(route.waypoints.len(), 3);
        assert_eq!(route.waypoints[0].role, WaypointRole::Start);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_finalize_with_only_start_degrades_to_cancel() {
        let adapter = SphericalMercator;
        let mut builder = RouteBuilder::new(RouteKind::Distance);
        builder
            .add_waypoint(stop("a", 0.0, 0.0, WaypointRole::Start), &adapter)
            .unwrap();
        assert_eq!(builder.finalize(&adapter), Ok(None));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_area_route_needs_three_waypoints() {
        let adapter = SphericalMercator;
        let mut builder = RouteBuilder::new(RouteKind::Area);
        builder
            .add_waypoint(stop("a", 0.0, 0.0, WaypointRole::Start), &adapter)
            .unwrap();
        let reading = builder
            .add_waypoint(stop("b", 0.01, 0.0, WaypointRole::Middle), &adapter)
            .unwrap();
        assert_eq!(reading.total, None);

        let err = builder.finalize(&adapter).unwrap_err();
        assert_eq!(err.missing_points(), Some(1));
        assert_eq!(builder.len(), 2);

        builder
            .add_waypoint(stop("c", 0.01, 0.01, WaypointRole::End), &adapter)
            .unwrap();
        let result = builder.finalize(&adapter).unwrap().unwrap();
        assert_eq!(result.kind, MeasurementKind::Area);
        assert_eq!(result.coordinates.len(), 3);
        assert!(result.value > 0.0);
    }

    #[test]
    fn test_undo_and_reset_keep_start() {
        let adapter = SphericalMercator;
        let mut builder = RouteBuilder::new(RouteKind::Distance);
        assert_eq!(builder.undo(), None);
        builder
            .add_waypoint(stop("a", 0.0, 0.0, WaypointRole::Start), &adapter)
            .unwrap();
        assert_eq!(builder.undo(), None);
        builder
            .add_waypoint(stop("b", 0.0, 0.1, WaypointRole::Middle), &adapter)
            .unwrap();
        builder
            .add_waypoint(stop("c", 0.0, 0.2, WaypointRole::Middle), &adapter)
            .unwrap();

        assert_eq!(builder.undo().map(|w| w.name), Some("c".to_string()));
        assert!(builder.reset_to_start());
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.waypoints()[0].name, "a");
        assert!(!builder.reset_to_start());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&WaypointRole::Middle).unwrap(),
            "\"middle\""
        );
    }
}
