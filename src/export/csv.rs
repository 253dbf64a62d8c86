//! Flat CSV export (one row per measurement or favorite).

use std::fmt::Write;

use chrono::SecondsFormat;

use super::ExportData;

pub const CSV_HEADER: &str = "Type,Value,Latitude,Longitude,Timestamp,Description,Coordinates";

/// Quote a field when it holds a separator, quote or line break
fn field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

pub fn to_csv(data: &ExportData) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for result in data.results {
        let Some(first) = result.coordinates.first() else {
            continue;
        };
        let path = result
            .coordinates
            .iter()
            .map(|p| format!("{} {}", p.lon, p.lat))
            .collect::<Vec<_>>()
            .join(";");
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{}",
            result.kind.label(),
            result.value,
            first.lat,
            first.lon,
            result.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            field(&result.text),
            field(&path),
        );
    }

    for favorite in data.favorites {
        let _ = writeln!(
            csv,
            "favorite,{},{},{},{},Favorite,{} {}",
            field(&favorite.name),
            favorite.location.lat,
            favorite.location.lon,
            favorite.added_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            favorite.location.lon,
            favorite.location.lat,
        );
    }

    csv
}
