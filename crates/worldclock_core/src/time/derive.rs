//! Time derivation layer.
//!
//! # Responsibility
//! - Map `(instant, zone)` to every per-location display value.
//! - Be the only place that converts a UTC instant to local civil time.
//!
//! # Invariants
//! - Functions are pure: same inputs, same outputs, no side effects.
//! - Local time always comes from the zone's rules at that instant
//!   (DST and 30/45-minute offsets included), never a fixed offset.
//! - `day_progress_percent` is in `[0, 100)` and is `0` at local midnight.
//! - Night is the fixed window `[0, 6) ∪ [18, 24)` local hours.

use crate::model::settings::Theme;
use crate::time::zone::ZoneId;
use chrono::{DateTime, Offset, Timelike, Utc};
use chrono_tz::Tz;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const SUN_MOON_MIN_PERCENT: f64 = 10.0;
const SUN_MOON_MAX_PERCENT: f64 = 90.0;

/// Sky phase bucket of a local hour.
///
/// `[0,6)` night, `[6,8)` sunrise, `[8,16)` day, `[16,18)` sunset,
/// `[18,24)` night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyToken {
    Night,
    Sunrise,
    Day,
    Sunset,
}

/// Two-stop horizontal gradient, colours as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyGradient {
    pub from: &'static str,
    pub to: &'static str,
}

impl SkyToken {
    /// Buckets a local hour (`0..=23`).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::Night,
            6..=7 => Self::Sunrise,
            8..=15 => Self::Day,
            16..=17 => Self::Sunset,
            _ => Self::Night,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Sunrise => "sunrise",
            Self::Day => "day",
            Self::Sunset => "sunset",
        }
    }

    /// Background gradient for this phase.
    pub fn gradient(self, theme: Theme) -> SkyGradient {
        let (from, to) = match (theme, self) {
            (Theme::Light, Self::Night) => ("#1a237e", "#4a148c"),
            (Theme::Light, Self::Sunrise) => ("#f97316", "#fef7cd"),
            (Theme::Light, Self::Day) => ("#4fc3f7", "#81c784"),
            (Theme::Light, Self::Sunset) => ("#fef7cd", "#f97316"),
            (Theme::Dark, Self::Night) => ("#0a0a0a", "#1a1a2e"),
            (Theme::Dark, Self::Sunrise) => ("#2d1b69", "#11132a"),
            (Theme::Dark, Self::Day) => ("#1e3a8a", "#1e40af"),
            (Theme::Dark, Self::Sunset) => ("#2d1b69", "#11132a"),
        };
        SkyGradient { from, to }
    }

    /// Fill colour of the day-progress bar for this phase.
    pub fn progress_color(self, theme: Theme) -> &'static str {
        match (theme, self) {
            (Theme::Light, Self::Night) => "#4a148c",
            (Theme::Dark, Self::Night) => "#ca7df9",
            (_, Self::Sunrise) | (_, Self::Sunset) => "#f97316",
            (_, Self::Day) => "#81c784",
        }
    }
}

/// Everything a clock card needs for one location at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTimeView {
    pub time_string: String,
    pub date_string: String,
    pub day_progress_percent: f64,
    pub is_night: bool,
    pub sky: SkyToken,
    pub sun_moon_position_percent: f64,
}

/// Converts a UTC instant to the zone's local civil time.
pub fn zoned(instant: DateTime<Utc>, zone: ZoneId) -> DateTime<Tz> {
    instant.with_timezone(&zone.tz())
}

fn minute_of_day(instant: DateTime<Utc>, zone: ZoneId) -> u32 {
    let local = zoned(instant, zone);
    local.hour() * 60 + local.minute()
}

/// Local hour (`0..=23`) in the zone.
pub fn local_hour(instant: DateTime<Utc>, zone: ZoneId) -> u32 {
    zoned(instant, zone).hour()
}

/// Local wall-clock time: `21:00` or `9:00 PM`.
pub fn time_string(instant: DateTime<Utc>, zone: ZoneId, use_24_hour: bool) -> String {
    let local = zoned(instant, zone);
    if use_24_hour {
        local.format("%H:%M").to_string()
    } else {
        local.format("%-I:%M %p").to_string()
    }
}

/// Local wall-clock time including seconds: `21:00:05` or `9:00:05 PM`.
pub fn time_string_with_seconds(instant: DateTime<Utc>, zone: ZoneId, use_24_hour: bool) -> String {
    let local = zoned(instant, zone);
    if use_24_hour {
        local.format("%H:%M:%S").to_string()
    } else {
        local.format("%-I:%M:%S %p").to_string()
    }
}

/// Local calendar date: `Sat, Jun 15`.
pub fn date_string(instant: DateTime<Utc>, zone: ZoneId) -> String {
    zoned(instant, zone).format("%a, %b %-d").to_string()
}

/// Fraction of the local day elapsed, as a percentage in `[0, 100)`.
pub fn day_progress_percent(instant: DateTime<Utc>, zone: ZoneId) -> f64 {
    f64::from(minute_of_day(instant, zone)) / MINUTES_PER_DAY * 100.0
}

/// `true` when the local hour is in `[0, 6)` or `[18, 24)`.
pub fn is_night_time(instant: DateTime<Utc>, zone: ZoneId) -> bool {
    !(6..18).contains(&local_hour(instant, zone))
}

/// Sky phase of the zone at the instant.
pub fn sky_token(instant: DateTime<Utc>, zone: ZoneId) -> SkyToken {
    SkyToken::from_hour(local_hour(instant, zone))
}

/// Sky gradient for the zone at the instant.
pub fn sky_gradient_token(instant: DateTime<Utc>, zone: ZoneId, theme: Theme) -> SkyGradient {
    sky_token(instant, zone).gradient(theme)
}

/// Progress-bar fill colour for the zone at the instant.
pub fn progress_bar_color_token(instant: DateTime<Utc>, zone: ZoneId, theme: Theme) -> &'static str {
    sky_token(instant, zone).progress_color(theme)
}

/// Vertical position of the sun/moon icon, clamped to `[10, 90]`.
pub fn sun_moon_position_percent(instant: DateTime<Utc>, zone: ZoneId) -> f64 {
    day_progress_percent(instant, zone).clamp(SUN_MOON_MIN_PERCENT, SUN_MOON_MAX_PERCENT)
}

/// Total UTC offset of the zone at the instant, in seconds.
pub fn utc_offset_seconds(instant: DateTime<Utc>, zone: ZoneId) -> i32 {
    zoned(instant, zone).offset().fix().local_minus_utc()
}

/// Computes the full card projection in one pass.
pub fn derive_view(instant: DateTime<Utc>, zone: ZoneId, use_24_hour: bool) -> DerivedTimeView {
    DerivedTimeView {
        time_string: time_string(instant, zone, use_24_hour),
        date_string: date_string(instant, zone),
        day_progress_percent: day_progress_percent(instant, zone),
        is_night: is_night_time(instant, zone),
        sky: sky_token(instant, zone),
        sun_moon_position_percent: sun_moon_position_percent(instant, zone),
    }
}
