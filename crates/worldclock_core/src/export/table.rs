//! CSV and JSON snapshot of the registry.

use super::{ExportError, ExportResult};
use crate::config::HostZone;
use crate::model::location::Location;
use crate::time::derive::{date_string, time_string, utc_offset_seconds};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const CSV_HEADER: [&str; 8] = [
    "City Name",
    "Original Name",
    "Time Zone",
    "Current Time",
    "Current Date",
    "Time Difference (hours)",
    "Is Favorite",
    "Exported At",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(value: &str) -> ExportResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ExportError::UnknownFormat(value.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// One exported location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub city_name: String,
    pub original_name: String,
    pub time_zone: String,
    pub current_time: String,
    pub current_date: String,
    /// Zone offset minus host offset, in hours (two decimals).
    pub time_difference_from_local: f64,
    pub is_favorite: bool,
    pub exported_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub exported_at: String,
    pub total_zones: usize,
    /// `24-hour` or `12-hour`.
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_info: ExportInfo,
    pub time_zones: Vec<ExportRow>,
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn exported_at_stamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn time_difference_hours(instant: DateTime<Utc>, location: &Location, host: &HostZone) -> f64 {
    let seconds = utc_offset_seconds(instant, location.time_zone) - host.offset_seconds(instant);
    (f64::from(seconds) / 3600.0 * 100.0).round() / 100.0
}

pub fn export_rows(
    locations: &[Location],
    instant: DateTime<Utc>,
    use_24_hour: bool,
    host: &HostZone,
) -> Vec<ExportRow> {
    let exported_at = exported_at_stamp(instant);
    locations
        .iter()
        .map(|location| ExportRow {
            city_name: location.display_name().to_string(),
            original_name: location.name.clone(),
            time_zone: location.time_zone.name().to_string(),
            current_time: time_string(instant, location.time_zone, use_24_hour),
            current_date: date_string(instant, location.time_zone),
            time_difference_from_local: time_difference_hours(instant, location, host),
            is_favorite: location.is_favorite,
            exported_at: exported_at.clone(),
        })
        .collect()
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Header plus one line per row, joined by `\n`. Text cells are quoted.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.join(","));
    for row in rows {
        let cells = [
            quote(&row.city_name),
            quote(&row.original_name),
            quote(&row.time_zone),
            quote(&row.current_time),
            quote(&row.current_date),
            row.time_difference_from_local.to_string(),
            row.is_favorite.to_string(),
            quote(&row.exported_at),
        ];
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

pub fn to_json(rows: &[ExportRow], instant: DateTime<Utc>, use_24_hour: bool) -> ExportResult<String> {
    let document = ExportDocument {
        export_info: ExportInfo {
            exported_at: exported_at_stamp(instant),
            total_zones: rows.len(),
            format: if use_24_hour { "24-hour" } else { "12-hour" }.to_string(),
        },
        time_zones: rows.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn parse_json(text: &str) -> ExportResult<ExportDocument> {
    Ok(serde_json::from_str(text)?)
}

/// `world-time-zones-YYYY-MM-DD.{csv,json}` (UTC date).
pub fn export_file_name(format: ExportFormat, instant: DateTime<Utc>) -> String {
    format!(
        "world-time-zones-{}.{}",
        instant.format("%Y-%m-%d"),
        format.extension()
    )
}
