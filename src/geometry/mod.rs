//! Coordinate types and the geometry engine the measurement core delegates to.
//!
//! Two coordinate systems are in play and they are never mixed implicitly:
//!
//! - [`GeoPoint`]: WGS84 longitude/latitude in degrees (search results, exports)
//! - [`MapPoint`]: EPSG:3857 web-mercator meters (map clicks, draft geometry)
//!
//! All lengths, areas and conversions go through a [`GeometryAdapter`].
//! [`SphericalMercator`] is the implementation used by the application.

mod point;
mod sphere;

pub use point::{GeoPoint, MapPoint};
pub use sphere::{SphericalMercator, EARTH_RADIUS_M, MERCATOR_RADIUS_M};

/// Length, area and projection primitives used by the measurement core.
///
/// Rings passed to [`GeometryAdapter::area`] are implicitly closed: the last
/// vertex connects back to the first, callers never repeat the first vertex.
pub trait GeometryAdapter: Send + Sync {
    /// Length in meters of the open path through `path`
    fn length(&self, path: &[MapPoint]) -> f64;

    /// Area in square meters enclosed by `ring`
    fn area(&self, ring: &[MapPoint]) -> f64;

    fn to_projected(&self, geo: GeoPoint) -> MapPoint;

    fn to_geographic(&self, point: MapPoint) -> GeoPoint;

    /// Length of a path given in geographic coordinates (projected pair by pair)
    fn geo_length(&self, path: &[GeoPoint]) -> f64 {
        let projected: Vec<MapPoint> = path.iter().map(|p| self.to_projected(*p)).collect();
        self.length(&projected)
    }
}
