//! Plain coordinate pairs for the two coordinate systems.

use bevy::math::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

/// WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// True when both axes are within `tolerance` degrees of `other`
    pub fn approx_eq(&self, other: &GeoPoint, tolerance: f64) -> bool {
        (self.lon - other.lon).abs() < tolerance && (self.lat - other.lat).abs() < tolerance
    }

    /// `[lon, lat]` pair, the axis order used by GeoJSON
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn from_array(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// Web-mercator (EPSG:3857) position in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &MapPoint) -> MapPoint {
        MapPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Render-space position relative to `origin`.
    ///
    /// Mercator meters reach ~2e7, beyond what f32 world coordinates resolve,
    /// so rendering always works relative to a fixed origin.
    pub fn to_world(self, origin: DVec2) -> Vec2 {
        (DVec2::new(self.x, self.y) - origin).as_vec2()
    }

    pub fn from_world(world: Vec2, origin: DVec2) -> MapPoint {
        let abs = world.as_dvec2() + origin;
        MapPoint::new(abs.x, abs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_approx_eq() {
        let a = GeoPoint::new(126.978, 37.5665);
        assert!(a.approx_eq(&GeoPoint::new(126.9785, 37.5661), 0.001));
        assert!(!a.approx_eq(&GeoPoint::new(126.980, 37.5665), 0.001));
    }

    #[test]
    fn test_world_conversion_is_relative_to_origin() {
        let origin = DVec2::new(14_135_000.0, 4_518_000.0);
        let point = MapPoint::new(14_135_250.5, 4_517_900.25);
        let world = point.to_world(origin);
        assert!((world.x - 250.5).abs() < 1e-3);
        assert!((world.y + 99.75).abs() < 1e-3);

        let back = MapPoint::from_world(world, origin);
        assert!((back.x - point.x).abs() < 1e-3);
        assert!((back.y - point.y).abs() < 1e-3);
    }

    #[test]
    fn test_midpoint() {
        let mid = MapPoint::new(0.0, 0.0).midpoint(&MapPoint::new(10.0, -4.0));
        assert_eq!(mid, MapPoint::new(5.0, -2.0));
    }
}
