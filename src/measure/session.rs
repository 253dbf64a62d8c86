//! Point accumulation for the free-hand and smart measurement modes.

use crate::geometry::{GeometryAdapter, MapPoint};

use super::error::MeasureError;
use super::format::{format_area, format_distance};
use super::result::{MeasurementKind, MeasurementResult};
use super::tools::Tool;

/// Running values reported after each change to a session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LiveReading {
    /// Cumulative length, or area once the ring has three vertices
    pub total: Option<f64>,
    /// Length of the most recent pair of points
    pub segment: Option<f64>,
}

impl LiveReading {
    pub fn total_text(&self, kind: MeasurementKind) -> Option<String> {
        self.total.map(|v| kind.format_value(v))
    }

    pub fn segment_text(&self) -> Option<String> {
        self.segment.map(format_distance)
    }
}

/// Transient list of projected points for the active mode.
///
/// When an anchor is set it is always `coordinates[0]` and survives undo and
/// reset; only points appended after it can be dropped.
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    tool: Tool,
    coordinates: Vec<MapPoint>,
    anchor: Option<MapPoint>,
}

impl MeasurementSession {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            coordinates: Vec::new(),
            anchor: None,
        }
    }

    /// Session whose first point is fixed (smart distance from a search result)
    pub fn anchored(tool: Tool, anchor: MapPoint) -> Self {
        Self {
            tool,
            coordinates: vec![anchor],
            anchor: Some(anchor),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn kind(&self) -> MeasurementKind {
        if self.tool == Tool::Area {
            MeasurementKind::Area
        } else {
            MeasurementKind::Distance
        }
    }

    pub fn coordinates(&self) -> &[MapPoint] {
        &self.coordinates
    }

    pub fn anchor(&self) -> Option<MapPoint> {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Number of points that undo/reset may remove
    pub fn removable(&self) -> usize {
        self.coordinates.len() - usize::from(self.anchor.is_some())
    }

    pub fn add_point(&mut self, point: MapPoint, geometry: &dyn GeometryAdapter) -> LiveReading {
        self.coordinates.push(point);
        self.reading(geometry)
    }

    /// Pop the newest point. The anchor is never removed.
    pub fn remove_last_point(&mut self) -> Option<MapPoint> {
        if self.removable() == 0 {
            return None;
        }
        self.coordinates.pop()
    }

    /// Drop everything after the anchor. Returns false when there was nothing to drop.
    pub fn reset_to_start(&mut self) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        if self.coordinates.len() <= 1 {
            return false;
        }
        self.coordinates.clear();
        self.coordinates.push(anchor);
        true
    }

    pub fn reading(&self, geometry: &dyn GeometryAdapter) -> LiveReading {
        reading_of(self.kind(), &self.coordinates, geometry)
    }

    /// Tentative reading as if `cursor` were the next point. `None` until the
    /// session has a first point to stretch from.
    pub fn preview(&self, cursor: MapPoint, geometry: &dyn GeometryAdapter) -> Option<LiveReading> {
        if self.coordinates.is_empty() {
            return None;
        }
        let mut points = self.coordinates.clone();
        points.push(cursor);
        Some(reading_of(self.kind(), &points, geometry))
    }

    pub fn check_complete(&self) -> Result<(), MeasureError> {
        let need = self.tool.min_points();
        if self.coordinates.len() < need {
            return Err(MeasureError::InsufficientPoints {
                tool: self.tool,
                have: self.coordinates.len(),
                need,
            });
        }
        Ok(())
    }

    /// Convert the accumulated points into a result and empty the session.
    ///
    /// On `InsufficientPoints` the session is left untouched.
    pub fn finalize(
        &mut self,
        geometry: &dyn GeometryAdapter,
    ) -> Result<MeasurementResult, MeasureError> {
        self.check_complete()?;

        let kind = self.kind();
        let (value, text) = match kind {
            MeasurementKind::Area => {
                let area = geometry.area(&self.coordinates);
                (area, format_area(area))
            }
            _ => {
                let length = geometry.length(&self.coordinates);
                (length, format_distance(length))
            }
        };

        let coordinates = std::mem::take(&mut self.coordinates)
            .into_iter()
            .map(|p| geometry.to_geographic(p))
            .collect();
        self.anchor = None;

        Ok(MeasurementResult::new(kind, value, text, coordinates))
    }
}

fn reading_of(kind: MeasurementKind, points: &[MapPoint], geometry: &dyn GeometryAdapter) -> LiveReading {
    let total = match kind {
        MeasurementKind::Area if points.len() >= 3 => Some(geometry.area(points)),
        MeasurementKind::Area => None,
        _ => Some(geometry.length(points)),
    };

    let segment = match points {
        [.., a, b] => Some(geometry.length(&[*a, *b])),
        _ => None,
    };

    LiveReading { total, segment }
}
