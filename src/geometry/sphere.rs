//! Spherical-earth geometry over web-mercator coordinates.
//!
//! Lengths are great-circle (haversine) distances and areas use the spherical
//! excess formula, both on a sphere of mean earth radius. Coordinates are
//! projected with the usual EPSG:3857 sphere.

use std::f64::consts::PI;

use super::{GeoPoint, GeometryAdapter, MapPoint};

/// Mean earth radius used for lengths and areas
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Sphere radius of the EPSG:3857 projection
pub const MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Latitude where the square web-mercator world ends
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalMercator;

impl SphericalMercator {
    /// Great-circle distance between two geographic points
    pub fn haversine(a: GeoPoint, b: GeoPoint) -> f64 {
        if a.approx_eq(&b, 1e-12) {
            return 0.0;
        }

        let lat1 = a.lat.to_radians();
        let lat2 = b.lat.to_radians();
        let delta_lat = (b.lat - a.lat).to_radians();
        let delta_lon = (b.lon - a.lon).to_radians();

        let h = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

        EARTH_RADIUS_M * c
    }

    /// Area of a closed ring of geographic points on the sphere
    pub fn ring_area(ring: &[GeoPoint]) -> f64 {
        if ring.len() < 3 {
            return 0.0;
        }

        let mut sum = 0.0;
        for (i, p1) in ring.iter().enumerate() {
            let p2 = ring[(i + 1) % ring.len()];
            sum += (p2.lon - p1.lon).to_radians()
                * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin());
        }

        (sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
    }
}

impl GeometryAdapter for SphericalMercator {
    fn length(&self, path: &[MapPoint]) -> f64 {
        path.windows(2)
            .map(|pair| Self::haversine(self.to_geographic(pair[0]), self.to_geographic(pair[1])))
            .sum()
    }

    fn area(&self, ring: &[MapPoint]) -> f64 {
        let geo: Vec<GeoPoint> = ring.iter().map(|p| self.to_geographic(*p)).collect();
        Self::ring_area(&geo)
    }

    fn to_projected(&self, geo: GeoPoint) -> MapPoint {
        let lat = geo.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let x = MERCATOR_RADIUS_M * geo.lon.to_radians();
        let y = MERCATOR_RADIUS_M * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
        MapPoint::new(x, y)
    }

    fn to_geographic(&self, point: MapPoint) -> GeoPoint {
        let lon = (point.x / MERCATOR_RADIUS_M).to_degrees();
        let lat = (2.0 * (point.y / MERCATOR_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();
        GeoPoint::new(lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_roundtrip() {
        let adapter = SphericalMercator;
        let seoul = GeoPoint::new(126.9780, 37.5665);
        let back = adapter.to_geographic(adapter.to_projected(seoul));
        assert!(back.approx_eq(&seoul, 1e-9));
    }

    #[test]
    fn test_origin_projects_to_zero() {
        let p = SphericalMercator.to_projected(GeoPoint::new(0.0, 0.0));
        assert!(p.x.abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = SphericalMercator::haversine(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        // 2 * pi * R / 360
        assert!((d - 111_195.08).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_path_length_sums_segments() {
        let adapter = SphericalMercator;
        let a = adapter.to_projected(GeoPoint::new(0.0, 0.0));
        let b = adapter.to_projected(GeoPoint::new(0.0, 0.01));
        let c = adapter.to_projected(GeoPoint::new(0.01, 0.01));
        let total = adapter.length(&[a, b, c]);
        let parts = adapter.length(&[a, b]) + adapter.length(&[b, c]);
        assert!((total - parts).abs() < 1e-6);
    }

    #[test]
    fn test_ring_area_is_implicitly_closed() {
        let adapter = SphericalMercator;
        let square: Vec<MapPoint> = [(0.0, 0.0), (0.01, 0.0), (0.01, 0.01), (0.0, 0.01)]
            .iter()
            .map(|(lon, lat)| adapter.to_projected(GeoPoint::new(*lon, *lat)))
            .collect();

        let open = adapter.area(&square);
        let mut closed = square.clone();
        closed.push(square[0]);

        // ~1.11 km on a side near the equator
        assert!((open - 1_236_000.0).abs() < 5_000.0, "got {}", open);
        assert!((open - adapter.area(&closed)).abs() < 1e-6);
    }

    #[test]
    fn test_area_of_degenerate_ring_is_zero() {
        let adapter = SphericalMercator;
        let line: Vec<MapPoint> = [(0.0, 0.0), (0.01, 0.0), (0.02, 0.0)]
            .iter()
            .map(|(lon, lat)| adapter.to_projected(GeoPoint::new(*lon, *lat)))
            .collect();
        assert!(adapter.area(&line) < 1e-6);
    }
}
