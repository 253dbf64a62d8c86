//! Native JSON document: metadata, measurements, favorites and a summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::measure::{MeasurementKind, MeasurementResult};
use crate::storage::Favorite;

use super::{ExportData, EXPORT_NAME};

#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KindCounts {
    pub distance: usize,
    pub area: usize,
    pub marker: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_measurements: usize,
    pub total_favorites: usize,
    pub measurement_types: KindCounts,
}

#[derive(Debug, Serialize)]
struct JsonExport<'a> {
    metadata: Metadata,
    measurements: &'a [MeasurementResult],
    favorites: &'a [Favorite],
    summary: Summary,
}

/// The part of a document that import reads
#[derive(Debug, Deserialize)]
struct JsonImport {
    measurements: Vec<MeasurementResult>,
}

pub fn summarize(results: &[MeasurementResult], favorites: usize) -> Summary {
    let mut counts = KindCounts::default();
    for result in results {
        match result.kind {
            MeasurementKind::Distance => counts.distance += 1,
            MeasurementKind::Area => counts.area += 1,
            MeasurementKind::Marker => counts.marker += 1,
        }
    }
    Summary {
        total_measurements: results.len(),
        total_favorites: favorites,
        measurement_types: counts,
    }
}

pub fn to_json(data: &ExportData) -> Result<String, serde_json::Error> {
    let document = JsonExport {
        metadata: Metadata {
            name: EXPORT_NAME.to_string(),
            timestamp: data.exported_at,
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        measurements: data.results,
        favorites: data.favorites,
        summary: summarize(data.results, data.favorites.len()),
    };
    serde_json::to_string_pretty(&document)
}

pub fn from_json(document: serde_json::Value) -> Result<Vec<MeasurementResult>, serde_json::Error> {
    let parsed: JsonImport = serde_json::from_value(document)?;
    Ok(parsed.measurements)
}
