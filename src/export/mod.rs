//! Export and import of measurements.
//!
//! Three text formats are written: GeoJSON, CSV and the native JSON document.
//! A bundle is a zip holding all three. Import accepts the GeoJSON and JSON
//! documents; favorites in either are ignored.
//!
//! The UI picks paths with `rfd` and sends [`ExportRequest`] / [`ImportRequest`];
//! the systems here do the file work and report back through toasts.

mod bundle;
mod csv;
mod geojson;
mod json;

#[cfg(test)]
mod tests;

pub use bundle::write_bundle;
pub use csv::{to_csv, CSV_HEADER};
pub use geojson::{from_geojson, to_geojson};
pub use json::{from_json, summarize, to_json, KindCounts, Summary};

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use chrono::{DateTime, Local, Utc};
use thiserror::Error;

use crate::config::UpdateLastExportDirRequest;
use crate::measure::{MeasurementResult, ToolController, ToolEvent, ToolEventMessage};
use crate::storage::{Favorite, Favorites};

/// Name written into document metadata
pub const EXPORT_NAME: &str = "Waymark measurements";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("unsupported geometry type '{0}'")]
    UnsupportedGeometry(String),

    #[error("not a measurement document: {0}")]
    InvalidDocument(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
    Csv,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::GeoJson, ExportFormat::Csv, ExportFormat::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "GeoJSON",
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

/// What a single export writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    File(ExportFormat),
    Bundle,
}

impl ExportTarget {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportTarget::File(format) => format.extension(),
            ExportTarget::Bundle => "zip",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportTarget::File(format) => format.label(),
            ExportTarget::Bundle => "Zip bundle",
        }
    }
}

/// Snapshot of everything an export contains
pub struct ExportData<'a> {
    pub results: &'a [MeasurementResult],
    pub favorites: &'a [Favorite],
    pub exported_at: DateTime<Utc>,
}

impl<'a> ExportData<'a> {
    pub fn new(results: &'a [MeasurementResult], favorites: &'a [Favorite]) -> Self {
        Self {
            results,
            favorites,
            exported_at: Utc::now(),
        }
    }
}

pub fn render(format: ExportFormat, data: &ExportData) -> Result<String, ExportError> {
    Ok(match format {
        ExportFormat::GeoJson => serde_json::to_string_pretty(&to_geojson(data))?,
        ExportFormat::Csv => to_csv(data),
        ExportFormat::Json => to_json(data)?,
    })
}

pub fn write_export(target: ExportTarget, data: &ExportData, dest: &Path) -> Result<(), ExportError> {
    match target {
        ExportTarget::File(format) => fs::write(dest, render(format, data)?)?,
        ExportTarget::Bundle => write_bundle(data, dest)?,
    }
    Ok(())
}

/// Parse a GeoJSON `FeatureCollection` or a native JSON document
pub fn import_document(text: &str) -> Result<Vec<MeasurementResult>, ExportError> {
    let document: serde_json::Value = serde_json::from_str(text)?;

    if document.get("type").and_then(|t| t.as_str()) == Some("FeatureCollection") {
        from_geojson(&document)
    } else if document.get("measurements").is_some() {
        Ok(from_json(document)?)
    } else {
        Err(ExportError::InvalidDocument(
            "expected a FeatureCollection or a measurements list".into(),
        ))
    }
}

pub fn import_file(path: &Path) -> Result<Vec<MeasurementResult>, ExportError> {
    let text = fs::read_to_string(path)?;
    import_document(&text)
}

/// Suggested file name, e.g. `waymark-20260101-093000.geojson`
pub fn default_file_name(target: ExportTarget) -> String {
    format!(
        "waymark-{}.{}",
        Local::now().format("%Y%m%d-%H%M%S"),
        target.extension()
    )
}

/// Message to write the current results to a file
#[derive(Message)]
pub struct ExportRequest {
    pub target: ExportTarget,
    pub path: PathBuf,
}

/// Message to append results read from a file
#[derive(Message)]
pub struct ImportRequest {
    pub path: PathBuf,
}

fn notice(text: String) -> ToolEventMessage {
    ToolEventMessage(ToolEvent::Notice(text))
}

fn handle_export_requests(
    mut requests: MessageReader<ExportRequest>,
    controller: Res<ToolController>,
    favorites: Option<Res<Favorites>>,
    mut notices: MessageWriter<ToolEventMessage>,
    mut last_dir: MessageWriter<UpdateLastExportDirRequest>,
) {
    let saved: &[Favorite] = favorites.as_deref().map(|f| f.items()).unwrap_or(&[]);

    for request in requests.read() {
        let data = ExportData::new(controller.store().results(), saved);
        match write_export(request.target, &data, &request.path) {
            Ok(()) => {
                info!(
                    "Exported {} results as {} to {:?}",
                    data.results.len(),
                    request.target.label(),
                    request.path
                );
                if let Some(dir) = request.path.parent() {
                    last_dir.write(UpdateLastExportDirRequest {
                        dir: dir.to_path_buf(),
                    });
                }
                notices.write(notice(format!(
                    "Exported {} measurements",
                    data.results.len()
                )));
            }
            Err(e) => {
                error!("Export to {:?} failed: {}", request.path, e);
                notices.write(notice(format!("Export failed: {}", e)));
            }
        }
    }
}

fn handle_import_requests(
    mut requests: MessageReader<ImportRequest>,
    mut controller: ResMut<ToolController>,
    mut notices: MessageWriter<ToolEventMessage>,
) {
    for request in requests.read() {
        match import_file(&request.path) {
            Ok(results) => {
                let count = controller.import_results(results);
                notices.write(notice(format!("Imported {} measurements", count)));
            }
            Err(e) => {
                warn!("Import from {:?} failed: {}", request.path, e);
                notices.write(notice(format!("Import failed: {}", e)));
            }
        }
    }
}

pub struct ExportPlugin;

impl Plugin for ExportPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ExportRequest>()
            .add_message::<ImportRequest>()
            .add_systems(
                Update,
                (
                    handle_export_requests.run_if(on_message::<ExportRequest>),
                    handle_import_requests.run_if(on_message::<ImportRequest>),
                ),
            );
    }
}
