//! Unit tests for the search module.

use super::geocoding::{parse_response, GeocodeError, Geocoder, NominatimGeocoder, Place};
use super::state::SearchState;
use crate::geometry::GeoPoint;

fn place(name: &str) -> Place {
    Place {
        id: 1,
        display_name: name.to_string(),
        location: GeoPoint::new(126.978, 37.5665),
    }
}

// Response parsing tests
#[test]
fn test_parse_response_string_coordinates() {
    let body = r#"[
        {"place_id": 42, "display_name": "Seoul, South Korea", "lat": "37.5666791", "lon": "126.9782914"},
        {"place_id": 7, "display_name": "Busan, South Korea", "lat": "35.1799528", "lon": "129.0752365"}
    ]"#;

    let places = parse_response(body).unwrap();
    assert_eq!(places.len(), 2);
    assert_eq!(places[0].id, 42);
    assert!((places[0].location.lat - 37.5666791).abs() < 1e-9);
    assert!((places[0].location.lon - 126.9782914).abs() < 1e-9);
}

#[test]
fn test_parse_response_empty() {
    assert!(parse_response("[]").unwrap().is_empty());
}

#[test]
fn test_parse_response_invalid_coordinate() {
    let body = r#"[{"place_id": 1, "display_name": "Nowhere", "lat": "north", "lon": "1.0"}]"#;
    assert!(matches!(
        parse_response(body),
        Err(GeocodeError::InvalidCoordinate(_))
    ));

    let out_of_range = r#"[{"place_id": 1, "display_name": "Nowhere", "lat": "91.0", "lon": "1.0"}]"#;
    assert!(matches!(
        parse_response(out_of_range),
        Err(GeocodeError::InvalidCoordinate(_))
    ));
}

#[test]
fn test_parse_response_not_json() {
    assert!(matches!(
        parse_response("<html>busy</html>"),
        Err(GeocodeError::Decode(_))
    ));
}

// Place naming tests
#[test]
fn test_short_name_before_first_comma() {
    assert_eq!(place("Seoul, South Korea").short_name(), "Seoul");
    assert_eq!(place("Jeju").short_name(), "Jeju");
    assert_eq!(place(", odd").short_name(), ", odd");
}

#[test]
fn test_blank_query_makes_no_request() {
    // An unroutable URL: any request would fail with Http
    let geocoder = NominatimGeocoder::new("http://127.0.0.1:9/search", 5);
    assert_eq!(geocoder.search("   "), Ok(Vec::new()));
}

// Generation handling tests
#[test]
fn test_superseded_response_is_dropped() {
    let mut state = SearchState::default();
    let first = state.begin(None);
    let second = state.begin(None);

    assert!(!state.apply(first, Ok(vec![place("Old")])));
    assert!(state.results.is_empty());
    assert!(state.is_searching);

    assert!(state.apply(second, Ok(vec![place("New")])));
    assert_eq!(state.results[0].display_name, "New");
    assert!(!state.is_searching);
}

#[test]
fn test_failure_sets_error_and_clears_results() {
    let mut state = SearchState::default();
    let generation = state.begin(None);
    state.apply(generation, Ok(vec![place("A")]));

    let generation = state.begin(None);
    state.apply(generation, Err(GeocodeError::Status(503)));
    assert!(state.results.is_empty());
    assert_eq!(
        state.error.as_deref(),
        Some("search service answered with status 503")
    );
}
