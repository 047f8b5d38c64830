//! Two-city time converter.

use crate::catalog;
use crate::time::derive::{date_string, time_string, utc_offset_seconds};
use crate::time::travel::{resolve_local, TimeTravelError};
use crate::time::zone::ZoneId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub const DEFAULT_FROM_CITY: &str = "New York";
pub const DEFAULT_TO_CITY: &str = "London";

/// One side of a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedSide {
    pub city: String,
    pub zone: ZoneId,
    pub time_string: String,
    pub date_string: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub from: ConvertedSide,
    pub to: ConvertedSide,
    /// `to` offset minus `from` offset at the converted instant.
    pub offset_difference_seconds: i32,
    /// `+5h`, `-3h`, `+5.5h`, `0h`.
    pub offset_label: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    pub use_24_hour: bool,
}

impl Converter {
    pub fn new(use_24_hour: bool) -> Self {
        Self { use_24_hour }
    }

    /// Shows `instant` in both cities. Unknown cities fall back to
    /// New York (from) and London (to).
    pub fn convert(&self, instant: DateTime<Utc>, from_city: &str, to_city: &str) -> Conversion {
        let (from_name, from_zone) = resolve_city(from_city, DEFAULT_FROM_CITY);
        let (to_name, to_zone) = resolve_city(to_city, DEFAULT_TO_CITY);

        let difference =
            utc_offset_seconds(instant, to_zone) - utc_offset_seconds(instant, from_zone);
        Conversion {
            from: self.side(instant, from_name, from_zone),
            to: self.side(instant, to_name, to_zone),
            offset_difference_seconds: difference,
            offset_label: format_offset_difference(difference),
        }
    }

    /// Converts a wall-clock time entered for `from_city`.
    pub fn convert_local(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        from_city: &str,
        to_city: &str,
    ) -> Result<Conversion, TimeTravelError> {
        let (_, from_zone) = resolve_city(from_city, DEFAULT_FROM_CITY);
        let instant = resolve_local(date, time, from_zone)?;
        Ok(self.convert(instant, from_city, to_city))
    }

    fn side(&self, instant: DateTime<Utc>, city: &'static str, zone: ZoneId) -> ConvertedSide {
        ConvertedSide {
            city: city.to_string(),
            zone,
            time_string: time_string(instant, zone, self.use_24_hour),
            date_string: date_string(instant, zone),
        }
    }
}

fn resolve_city(city: &str, fallback: &'static str) -> (&'static str, ZoneId) {
    let entry = catalog::lookup(city).or_else(|| catalog::lookup(fallback));
    match entry.and_then(|entry| entry.zone().ok().map(|zone| (entry.city, zone))) {
        Some(resolved) => resolved,
        None => (fallback, ZoneId::UTC),
    }
}

/// Formats an offset difference in hours with an explicit sign.
///
/// Whole hours print without decimals; fractional offsets keep up to two
/// decimals (`+5.5h`, `+5.75h`).
pub fn format_offset_difference(seconds: i32) -> String {
    if seconds == 0 {
        return "0h".to_string();
    }
    let sign = if seconds > 0 { "+" } else { "-" };
    let hours = f64::from(seconds.abs()) / 3600.0;
    let mut text = format!("{hours:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{sign}{text}h")
}
