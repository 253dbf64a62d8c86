//! GeoJSON `FeatureCollection` export and import.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::geometry::GeoPoint;
use crate::measure::{MeasurementKind, MeasurementResult, RouteSummary};
use crate::storage::Favorite;

use super::{ExportData, ExportError, EXPORT_NAME};

fn positions(points: &[GeoPoint]) -> Vec<[f64; 2]> {
    points.iter().map(|p| p.to_array()).collect()
}

fn geometry_of(result: &MeasurementResult) -> Value {
    match result.kind {
        MeasurementKind::Distance => json!({
            "type": "LineString",
            "coordinates": positions(&result.coordinates),
        }),
        MeasurementKind::Area => {
            // GeoJSON rings repeat the first position at the end. Always
            // append it so import can strip exactly one closing position.
            let mut ring = positions(&result.coordinates);
            if let Some(first) = ring.first().copied() {
                ring.push(first);
            }
            json!({ "type": "Polygon", "coordinates": [ring] })
        }
        MeasurementKind::Marker => json!({
            "type": "Point",
            "coordinates": result.coordinates.first().map(|p| p.to_array()),
        }),
    }
}

fn result_feature(result: &MeasurementResult, index: usize) -> Value {
    let mut properties = json!({
        "id": format!("measurement_{}", index),
        "kind": result.kind,
        "value": result.value,
        "text": result.text,
        "timestamp": result.created_at,
    });
    if let (Some(route), Some(map)) = (&result.route, properties.as_object_mut()) {
        map.insert(
            "waypoints".into(),
            json!(route.waypoints.iter().map(|w| w.name.as_str()).collect::<Vec<_>>()),
        );
        map.insert("route".into(), json!(route));
    }

    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": geometry_of(result),
    })
}

fn favorite_feature(favorite: &Favorite, index: usize) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "id": format!("favorite_{}", index),
            "kind": "favorite",
            "name": favorite.name,
            "addedAt": favorite.added_at,
        },
        "geometry": {
            "type": "Point",
            "coordinates": favorite.location.to_array(),
        },
    })
}

pub fn to_geojson(data: &ExportData) -> Value {
    let features: Vec<Value> = data
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| result_feature(r, i))
        .chain(
            data.favorites
                .iter()
                .enumerate()
                .map(|(i, f)| favorite_feature(f, i)),
        )
        .collect();

    json!({
        "type": "FeatureCollection",
        "properties": {
            "name": EXPORT_NAME,
            "timestamp": data.exported_at,
            "totalMeasurements": data.results.len(),
            "totalFavorites": data.favorites.len(),
        },
        "features": features,
    })
}

fn invalid(msg: impl Into<String>) -> ExportError {
    ExportError::InvalidDocument(msg.into())
}

fn parse_position(value: &Value) -> Result<GeoPoint, ExportError> {
    let pair: [f64; 2] =
        serde_json::from_value(value.clone()).map_err(|_| invalid("position is not [lon, lat]"))?;
    Ok(GeoPoint::from_array(pair))
}

fn parse_positions(value: &Value) -> Result<Vec<GeoPoint>, ExportError> {
    value
        .as_array()
        .ok_or_else(|| invalid("coordinates are not a list"))?
        .iter()
        .map(parse_position)
        .collect()
}

/// Geometry to (kind implied by the geometry, open coordinate list)
fn parse_geometry(geometry: &Value) -> Result<(MeasurementKind, Vec<GeoPoint>), ExportError> {
    let kind = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("feature has no geometry type"))?;
    let coordinates = geometry
        .get("coordinates")
        .ok_or_else(|| invalid("geometry has no coordinates"))?;

    match kind {
        "LineString" => Ok((MeasurementKind::Distance, parse_positions(coordinates)?)),
        "Polygon" => {
            let outer = coordinates
                .get(0)
                .ok_or_else(|| invalid("polygon has no ring"))?;
            let mut ring = parse_positions(outer)?;
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            Ok((MeasurementKind::Area, ring))
        }
        "Point" => Ok((MeasurementKind::Marker, vec![parse_position(coordinates)?])),
        other => Err(ExportError::UnsupportedGeometry(other.to_string())),
    }
}

fn parse_feature(feature: &Value) -> Result<Option<MeasurementResult>, ExportError> {
    let empty = Map::new();
    let properties = feature
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    if properties.get("kind").and_then(Value::as_str) == Some("favorite") {
        return Ok(None);
    }

    let geometry = feature
        .get("geometry")
        .ok_or_else(|| invalid("feature has no geometry"))?;
    let (geometry_kind, coordinates) = parse_geometry(geometry)?;

    let kind = properties
        .get("kind")
        .and_then(|v| serde_json::from_value::<MeasurementKind>(v.clone()).ok())
        .unwrap_or(geometry_kind);
    let value = properties.get("value").and_then(Value::as_f64).unwrap_or(0.0);
    let text = properties
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| kind.format_value(value));
    let created_at = properties
        .get("timestamp")
        .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()).ok())
        .unwrap_or_else(Utc::now);

    let mut result = MeasurementResult::new(kind, value, text, coordinates);
    result.created_at = created_at;
    if let Some(route) = properties
        .get("route")
        .and_then(|v| serde_json::from_value::<RouteSummary>(v.clone()).ok())
    {
        result = result.with_route(route);
    }
    Ok(Some(result))
}

/// Measurements of a `FeatureCollection`; favorite features are skipped
pub fn from_geojson(document: &Value) -> Result<Vec<MeasurementResult>, ExportError> {
    let features = document
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("feature collection has no features"))?;

    let mut results = Vec::new();
    for feature in features {
        if let Some(result) = parse_feature(feature)? {
            results.push(result);
        }
    }
    Ok(results)
}
