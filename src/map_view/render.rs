//! Gizmo rendering: graticule, finished results, the active draft and search pins.

use bevy::prelude::*;

use crate::geometry::{GeoPoint, GeometryAdapter, MapPoint};
use crate::measure::{MeasurementKind, OverlayKey, RouteKind, SharedSurface, Tool, ToolController};
use crate::theme;

use super::params::MapCameraParams;
use super::MapOrigin;

/// Graticule spacings in degrees, coarsest first
const GRATICULE_STEPS: [f64; 13] = [
    30.0, 10.0, 5.0, 2.0, 1.0, 0.5, 0.2, 0.1, 0.05, 0.02, 0.01, 0.005, 0.002,
];

/// Fewest graticule lines across the visible span
const MIN_GRATICULE_LINES: f64 = 4.0;

/// Web-mercator stops short of the poles
const MAX_LATITUDE: f64 = 85.0;

/// Vertex dot radius in screen pixels
const VERTEX_RADIUS_PX: f32 = 4.0;
const MARKER_RADIUS_PX: f32 = 7.0;

/// Coarsest step that still puts `MIN_GRATICULE_LINES` lines across `span_deg`
pub fn graticule_step(span_deg: f64) -> f64 {
    GRATICULE_STEPS
        .iter()
        .copied()
        .find(|step| span_deg / step >= MIN_GRATICULE_LINES)
        .unwrap_or(0.001)
}

/// Multiples of `step` inside `[min, max]`
pub fn graticule_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

fn project(geometry: &dyn GeometryAdapter, origin: &MapOrigin, geo: GeoPoint) -> Vec2 {
    geometry.to_projected(geo).to_world(origin.0)
}

pub fn draw_graticule(
    mut gizmos: Gizmos,
    controller: Res<ToolController>,
    origin: Res<MapOrigin>,
    camera: MapCameraParams,
) {
    let Some((min, max)) = camera.visible_bounds() else {
        return;
    };
    let geometry = controller.geometry();
    let sw = geometry.to_geographic(MapPoint::from_world(min, origin.0));
    let ne = geometry.to_geographic(MapPoint::from_world(max, origin.0));

    let lon_min = sw.lon.max(-180.0);
    let lon_max = ne.lon.min(180.0);
    let lat_min = sw.lat.max(-MAX_LATITUDE);
    let lat_max = ne.lat.min(MAX_LATITUDE);
    if lon_min >= lon_max || lat_min >= lat_max {
        return;
    }

    let step = graticule_step((lon_max - lon_min).max(lat_max - lat_min));

    for lon in graticule_values(lon_min, lon_max, step) {
        let color = if lon == 0.0 {
            theme::GRATICULE_MAJOR
        } else {
            theme::GRATICULE_COLOR
        };
        gizmos.line_2d(
            project(geometry, &origin, GeoPoint::new(lon, lat_min)),
            project(geometry, &origin, GeoPoint::new(lon, lat_max)),
            color,
        );
    }

    for lat in graticule_values(lat_min, lat_max, step) {
        let color = if lat == 0.0 {
            theme::GRATICULE_MAJOR
        } else {
            theme::GRATICULE_COLOR
        };
        gizmos.line_2d(
            project(geometry, &origin, GeoPoint::new(lon_min, lat)),
            project(geometry, &origin, GeoPoint::new(lon_max, lat)),
            color,
        );
    }
}

fn draw_path(gizmos: &mut Gizmos, points: &[Vec2], closed: bool, color: Color) {
    if points.len() < 2 {
        return;
    }
    if closed && points.len() > 2 {
        gizmos.linestrip_2d(points.iter().copied().chain(points.first().copied()), color);
    } else {
        gizmos.linestrip_2d(points.iter().copied(), color);
    }
}

fn draw_vertices(gizmos: &mut Gizmos, points: &[Vec2], radius: f32, color: Color) {
    for point in points {
        gizmos.circle_2d(Isometry2d::from_translation(*point), radius, color);
    }
}

pub fn draw_results(
    mut gizmos: Gizmos,
    controller: Res<ToolController>,
    origin: Res<MapOrigin>,
    camera: MapCameraParams,
) {
    let geometry = controller.geometry();
    let mpp = camera.meters_per_pixel();

    for result in controller.store().results() {
        let points: Vec<Vec2> = result
            .coordinates
            .iter()
            .map(|geo| project(geometry, &origin, *geo))
            .collect();
        let color = theme::kind_color(result.kind);

        match result.kind {
            MeasurementKind::Distance => {
                draw_path(&mut gizmos, &points, false, color);
                draw_vertices(&mut gizmos, &points, VERTEX_RADIUS_PX * mpp, color);
            }
            MeasurementKind::Area => draw_path(&mut gizmos, &points, true, color),
            MeasurementKind::Marker => {
                draw_vertices(&mut gizmos, &points, MARKER_RADIUS_PX * mpp, color);
            }
        }
    }
}

/// The session or route under construction, a rubber band to the cursor and search pins
pub fn draw_drafts(
    mut gizmos: Gizmos,
    controller: Res<ToolController>,
    surface: Res<SharedSurface>,
    origin: Res<MapOrigin>,
    camera: MapCameraParams,
) {
    let geometry = controller.geometry();
    let mpp = camera.meters_per_pixel();

    if let Some(session) = controller.session() {
        let points: Vec<Vec2> = session
            .coordinates()
            .iter()
            .map(|p| p.to_world(origin.0))
            .collect();
        let closed = session.tool() == Tool::Area;
        draw_path(&mut gizmos, &points, closed, theme::DRAFT_COLOR);
        draw_vertices(&mut gizmos, &points, VERTEX_RADIUS_PX * mpp, theme::DRAFT_COLOR);

        if let Some(anchor) = session.anchor() {
            gizmos.circle_2d(
                Isometry2d::from_translation(anchor.to_world(origin.0)),
                MARKER_RADIUS_PX * mpp,
                theme::ANCHOR_COLOR,
            );
        }

        if let (Some(last), Some(cursor)) = (points.last(), camera.cursor_world_pos()) {
            gizmos.line_2d(*last, cursor, theme::DRAFT_COLOR.with_alpha(0.4));
        }
    }

    if let Some(route) = controller.route() {
        let points: Vec<Vec2> = route
            .waypoints()
            .iter()
            .map(|w| project(geometry, &origin, w.location))
            .collect();
        let closed = route.kind() == RouteKind::Area;
        draw_path(&mut gizmos, &points, closed, theme::DRAFT_COLOR);
        draw_vertices(&mut gizmos, &points, MARKER_RADIUS_PX * mpp, theme::DRAFT_COLOR);
    }

    for (key, overlay) in surface.overlays() {
        if matches!(key, OverlayKey::SearchPin(_)) {
            gizmos.circle_2d(
                Isometry2d::from_translation(overlay.at.to_world(origin.0)),
                MARKER_RADIUS_PX * mpp,
                theme::SEARCH_PIN_COLOR,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graticule_step_keeps_lines_visible() {
        assert_eq!(graticule_step(360.0), 30.0);
        assert_eq!(graticule_step(10.0), 2.0);
        assert_eq!(graticule_step(0.25), 0.05);
        assert_eq!(graticule_step(0.0001), 0.001);
    }

    #[test]
    fn test_graticule_values_are_step_multiples() {
        let values = graticule_values(126.93, 127.07, 0.05);
        assert_eq!(values.len(), 3);
        assert!((values[0] - 126.95).abs() < 1e-9);
        assert!((values[2] - 127.05).abs() < 1e-9);
    }

    #[test]
    fn test_graticule_values_empty_between_multiples() {
        assert!(graticule_values(1.1, 1.9, 1.0).is_empty());
    }
}
