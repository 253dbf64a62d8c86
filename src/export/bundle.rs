//! One zip archive holding every export format.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{render, ExportData, ExportError, ExportFormat};

/// Write `waymark.geojson`, `waymark.csv` and `waymark.json` into a zip at `dest`
pub fn write_bundle(data: &ExportData, dest: &Path) -> Result<(), ExportError> {
    let file = File::create(dest)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for format in ExportFormat::ALL {
        zip.start_file(format!("waymark.{}", format.extension()), options)?;
        zip.write_all(render(format, data)?.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}
