//! Human-readable rendering of lengths and areas.
//!
//! The unit thresholds are exact: 1 000 m switches to kilometers with three
//! decimals, 100 000 m drops kilometers to one decimal, and 1 000 000 m²
//! switches from hectares to square kilometers.

const KM_THRESHOLD_M: f64 = 1_000.0;
const COARSE_KM_THRESHOLD_M: f64 = 100_000.0;
const KM2_THRESHOLD_M2: f64 = 1_000_000.0;

pub fn format_distance(meters: f64) -> String {
    if meters < KM_THRESHOLD_M {
        format!("{:.1} m", meters)
    } else if meters < COARSE_KM_THRESHOLD_M {
        format!("{:.3} km", meters / 1_000.0)
    } else {
        format!("{:.1} km", meters / 1_000.0)
    }
}

pub fn format_area(square_meters: f64) -> String {
    if square_meters < KM2_THRESHOLD_M2 {
        format!("{:.2} ha", square_meters / 10_000.0)
    } else {
        format!("{:.3} km²", square_meters / 1_000_000.0)
    }
}

/// Route summary line: `Total: <total> • <seg1> • <seg2> …`
pub fn format_route(total: f64, segments: &[f64]) -> String {
    let mut text = format!("Total: {}", format_distance(total));
    for segment in segments {
        text.push_str(" • ");
        text.push_str(&format_distance(*segment));
    }
    text
}

/// `lat, lon` at four decimals, the way markers are labelled
pub fn format_lat_lon(lat: f64, lon: f64) -> String {
    format!("{:.4}, {:.4}", lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_boundaries() {
        assert_eq!(format_distance(999.9), "999.9 m");
        assert_eq!(format_distance(1000.0), "1.000 km");
        assert_eq!(format_distance(100_000.0), "100.0 km");
    }

    #[test]
    fn test_distance_units_by_range() {
        assert_eq!(format_distance(0.0), "0.0 m");
        assert_eq!(format_distance(12.34), "12.3 m");
        assert_eq!(format_distance(1234.5), "1.234 km");
        assert_eq!(format_distance(99_999.0), "99.999 km");
        assert_eq!(format_distance(254_321.0), "254.3 km");
    }

    #[test]
    fn test_distance_uses_km_iff_at_least_1000() {
        for meters in [0.5, 10.0, 999.0, 999.99, 1000.0, 1000.1, 5e4, 1e5, 3e6] {
            let text = format_distance(meters);
            assert_eq!(text.ends_with(" km"), meters >= 1000.0, "{} -> {}", meters, text);
        }
    }

    #[test]
    fn test_area_boundaries() {
        assert_eq!(format_area(999_999.0), "100.00 ha");
        assert_eq!(format_area(1_000_000.0), "1.000 km²");
        assert!(format_area(999_999.0).ends_with(" ha"));
    }

    #[test]
    fn test_area_small_values() {
        assert_eq!(format_area(0.0), "0.00 ha");
        assert_eq!(format_area(25_000.0), "2.50 ha");
        assert_eq!(format_area(12_345_678.0), "12.346 km²");
    }

    #[test]
    fn test_route_text_lists_segments() {
        let text = format_route(1500.0, &[500.0, 1000.0]);
        assert_eq!(text, "Total: 1.500 km • 500.0 m • 1.000 km");
    }

    #[test]
    fn test_lat_lon_precision() {
        assert_eq!(format_lat_lon(37.56651, 126.97801), "37.5665, 126.9780");
    }
}
