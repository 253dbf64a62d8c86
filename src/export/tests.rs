use std::fs::File;
use std::io::Read;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use zip::ZipArchive;

use super::*;
use crate::geometry::{GeoPoint, GeometryAdapter, MapPoint, SphericalMercator};
use crate::measure::{MeasurementKind, RouteSummary, Waypoint, WaypointRole};

fn distance(value: f64, points: &[(f64, f64)]) -> MeasurementResult {
    let mut result = MeasurementResult::new(
        MeasurementKind::Distance,
        value,
        MeasurementKind::Distance.format_value(value),
        points.iter().map(|&(lon, lat)| GeoPoint::new(lon, lat)).collect(),
    );
    result.created_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    result
}

fn area(value: f64) -> MeasurementResult {
    let mut result = MeasurementResult::new(
        MeasurementKind::Area,
        value,
        MeasurementKind::Area.format_value(value),
        vec![
            GeoPoint::new(126.97, 37.56),
            GeoPoint::new(126.98, 37.56),
            GeoPoint::new(126.98, 37.57),
        ],
    );
    result.created_at = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
    result
}

fn marker() -> MeasurementResult {
    MeasurementResult::new(
        MeasurementKind::Marker,
        0.0,
        "Marker: 37.5665, 126.9780".to_string(),
        vec![GeoPoint::new(126.978, 37.5665)],
    )
}

fn sample_results() -> Vec<MeasurementResult> {
    vec![
        distance(1200.0, &[(126.97, 37.56), (126.98, 37.56)]),
        distance(350.5, &[(127.0, 37.5), (127.001, 37.501), (127.002, 37.5)]),
        distance(98_765.4, &[(126.9, 37.4), (127.5, 37.9)]),
        area(45_000.0),
    ]
}

fn favorite() -> Favorite {
    Favorite {
        id: 1,
        name: "City Hall".to_string(),
        location: GeoPoint::new(126.978, 37.5665),
        added_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn assert_same_measurements(original: &[MeasurementResult], imported: &[MeasurementResult]) {
    assert_eq!(imported.len(), original.len());
    for (a, b) in original.iter().zip(imported) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.value, b.value);
        assert_eq!(a.coordinates, b.coordinates);
        assert_eq!(a.created_at, b.created_at);
    }
}

#[test]
fn test_json_export_then_import_keeps_measurements() {
    let results = sample_results();
    let favorites = vec![favorite()];
    let text = render(ExportFormat::Json, &ExportData::new(&results, &favorites)).unwrap();

    let imported = import_document(&text).unwrap();
    assert_same_measurements(&results, &imported);
}

#[test]
fn test_geojson_export_then_import_keeps_measurements() {
    let results = sample_results();
    let favorites = vec![favorite()];
    let text = render(ExportFormat::GeoJson, &ExportData::new(&results, &favorites)).unwrap();

    // The favorite point is written but never imported
    let imported = import_document(&text).unwrap();
    assert_same_measurements(&results, &imported);
}

#[test]
fn test_geojson_polygon_ring_is_closed() {
    let results = vec![area(10.0)];
    let document = to_geojson(&ExportData::new(&results, &[]));

    let ring = document["features"][0]["geometry"]["coordinates"][0]
        .as_array()
        .unwrap();
    assert_eq!(ring.len(), 4);
    assert_eq!(ring[0], ring[3]);
    assert_eq!(document["features"][0]["geometry"]["type"], "Polygon");
}

#[test]
fn test_geojson_area_ending_on_its_start_keeps_every_vertex() {
    let mut closed = area(10.0);
    let start = closed.coordinates[0];
    closed.coordinates.push(start);
    let results = vec![closed];
    let text = render(ExportFormat::GeoJson, &ExportData::new(&results, &[])).unwrap();

    let imported = import_document(&text).unwrap();
    assert_eq!(imported[0].coordinates.len(), 4);
    assert_same_measurements(&results, &imported);
}

/// Values and coordinates carried through the mercator projection, the way
/// the map tools produce them.
fn measured_on_map() -> Vec<MeasurementResult> {
    let mercator = SphericalMercator;
    let clicks: Vec<MapPoint> = [
        (126.977_969_2, 37.566_535_7),
        (127.027_621_9, 37.497_942_1),
        (126.924_134_6, 37.521_189_3),
    ]
    .into_iter()
    .map(|(lon, lat)| mercator.to_projected(GeoPoint::new(lon, lat)))
    .collect();
    let coordinates: Vec<GeoPoint> = clicks.iter().map(|p| mercator.to_geographic(*p)).collect();

    let length = mercator.length(&clicks);
    let area = mercator.area(&clicks);
    vec![
        MeasurementResult::new(
            MeasurementKind::Distance,
            length,
            MeasurementKind::Distance.format_value(length),
            coordinates.clone(),
        ),
        MeasurementResult::new(
            MeasurementKind::Area,
            area,
            MeasurementKind::Area.format_value(area),
            coordinates,
        ),
    ]
}

#[test]
fn test_projected_measurements_survive_json_exactly() {
    let results = measured_on_map();
    let text = render(ExportFormat::Json, &ExportData::new(&results, &[])).unwrap();

    let imported = import_document(&text).unwrap();
    assert_same_measurements(&results, &imported);
}

#[test]
fn test_projected_measurements_survive_geojson_exactly() {
    let results = measured_on_map();
    let text = render(ExportFormat::GeoJson, &ExportData::new(&results, &[])).unwrap();

    let imported = import_document(&text).unwrap();
    assert_same_measurements(&results, &imported);
}

#[test]
fn test_geojson_geometry_per_kind() {
    let results = vec![distance(1.0, &[(0.0, 0.0), (1.0, 0.0)]), marker()];
    let favorites = vec![favorite()];
    let document = to_geojson(&ExportData::new(&results, &favorites));

    let features = document["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);
    assert_eq!(features[0]["geometry"]["type"], "LineString");
    assert_eq!(features[1]["geometry"]["type"], "Point");
    assert_eq!(features[2]["properties"]["kind"], "favorite");
    assert_eq!(features[2]["properties"]["name"], "City Hall");
    assert_eq!(document["properties"]["totalMeasurements"], 2);
    assert_eq!(document["properties"]["totalFavorites"], 1);
}

#[test]
fn test_geojson_keeps_route_waypoints() {
    let route = RouteSummary {
        waypoints: vec![
            Waypoint::new("Home", GeoPoint::new(0.0, 0.0), WaypointRole::Start),
            Waypoint::new("Work", GeoPoint::new(0.01, 0.0), WaypointRole::End),
        ],
        segments: vec![1113.2],
    };
    let results = vec![distance(1113.2, &[(0.0, 0.0), (0.01, 0.0)]).with_route(route.clone())];
    let document = to_geojson(&ExportData::new(&results, &[]));
    assert_eq!(
        document["features"][0]["properties"]["waypoints"],
        json!(["Home", "Work"])
    );

    let imported = from_geojson(&document).unwrap();
    assert_eq!(imported[0].route.as_ref(), Some(&route));
}

#[test]
fn test_geojson_import_infers_kind_from_geometry() {
    let document = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Point", "coordinates": [10.0, 20.0]}
        }]
    });
    let imported = from_geojson(&document).unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].kind, MeasurementKind::Marker);
    assert_eq!(imported[0].coordinates, vec![GeoPoint::new(10.0, 20.0)]);
}

#[test]
fn test_geojson_import_rejects_unknown_geometry() {
    let document = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "MultiPoint", "coordinates": [[0.0, 0.0]]}
        }]
    });
    let err = from_geojson(&document).unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedGeometry(ref t) if t == "MultiPoint"));
}

#[test]
fn test_import_rejects_unrelated_json() {
    let err = import_document(r#"{"hello": "world"}"#).unwrap_err();
    assert!(matches!(err, ExportError::InvalidDocument(_)));

    let err = import_document("not json at all").unwrap_err();
    assert!(matches!(err, ExportError::Json(_)));
}

#[test]
fn test_json_summary_counts_kinds() {
    let mut results = sample_results();
    results.push(marker());
    let text = to_json(&ExportData::new(&results, &[favorite()])).unwrap();
    let document: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(document["summary"]["totalMeasurements"], 5);
    assert_eq!(document["summary"]["totalFavorites"], 1);
    assert_eq!(document["summary"]["measurementTypes"]["distance"], 3);
    assert_eq!(document["summary"]["measurementTypes"]["area"], 1);
    assert_eq!(document["summary"]["measurementTypes"]["marker"], 1);
    assert_eq!(document["metadata"]["name"], EXPORT_NAME);
}

#[test]
fn test_csv_rows_and_quoting() {
    let results = vec![distance(1200.0, &[(126.97, 37.56), (126.98, 37.56)]), marker()];
    let csv = to_csv(&ExportData::new(&results, &[favorite()]));
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("distance,1200,37.56,126.97,2026-03-01T09:30:00.000Z,1.200 km,"));
    assert!(lines[1].ends_with("126.97 37.56;126.98 37.56"));
    // The marker text holds a comma
    assert!(lines[2].contains("\"Marker: 37.5665, 126.9780\""));
    assert!(lines[3].starts_with("favorite,City Hall,37.5665,126.978,"));
}

#[test]
fn test_bundle_holds_all_formats() {
    let dir = std::env::temp_dir().join("waymark_test_bundle");
    let _ = std::fs::create_dir_all(&dir);
    let path = dir.join("bundle.zip");

    let results = sample_results();
    write_export(ExportTarget::Bundle, &ExportData::new(&results, &[]), &path).unwrap();

    let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(archive.len(), 3);

    let mut text = String::new();
    archive
        .by_name("waymark.json")
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    let imported = import_document(&text).unwrap();
    assert_same_measurements(&results, &imported);

    assert!(archive.by_name("waymark.geojson").is_ok());
    assert!(archive.by_name("waymark.csv").is_ok());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_import_file_reads_written_export() {
    let dir = std::env::temp_dir().join("waymark_test_import_file");
    let _ = std::fs::create_dir_all(&dir);
    let path = dir.join("results.geojson");

    let results = sample_results();
    write_export(
        ExportTarget::File(ExportFormat::GeoJson),
        &ExportData::new(&results, &[]),
        &path,
    )
    .unwrap();
    let imported = import_file(&path).unwrap();
    assert_eq!(imported.len(), 4);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_default_file_name_extension() {
    assert!(default_file_name(ExportTarget::Bundle).ends_with(".zip"));
    assert!(default_file_name(ExportTarget::File(ExportFormat::Csv)).starts_with("waymark-"));
}
