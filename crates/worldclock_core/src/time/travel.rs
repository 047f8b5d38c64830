//! Wall-clock input resolution for time travel, converters and meetings.
//!
//! # Responsibility
//! - Resolve a local date + `HH:MM` in a reference zone to a UTC instant.
//!
//! # Invariants
//! - Ambiguous local times (DST fall-back) resolve to the earlier instant.
//! - Skipped local times (DST spring-forward) resolve with the offset in
//!   force before the gap, landing after the transition.

use crate::time::zone::ZoneId;
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors for wall-clock input parsing and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeTravelError {
    /// Time text is not `HH:MM`.
    InvalidTime(String),
    /// Date text is not `YYYY-MM-DD`.
    InvalidDate(String),
    /// Local time cannot be mapped onto the zone's timeline.
    Unresolvable { local: NaiveDateTime, zone: ZoneId },
}

impl Display for TimeTravelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTime(value) => write!(f, "invalid time `{value}`; expected HH:MM"),
            Self::InvalidDate(value) => write!(f, "invalid date `{value}`; expected YYYY-MM-DD"),
            Self::Unresolvable { local, zone } => {
                write!(f, "local time {local} does not exist in {zone}")
            }
        }
    }
}

impl Error for TimeTravelError {}

/// Parses `HH:MM` (24-hour).
pub fn parse_hh_mm(value: &str) -> Result<NaiveTime, TimeTravelError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| TimeTravelError::InvalidTime(value.to_string()))
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate, TimeTravelError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TimeTravelError::InvalidDate(value.to_string()))
}

/// Resolves a local wall-clock reading in `zone` to a UTC instant.
pub fn resolve_local(
    date: NaiveDate,
    time: NaiveTime,
    zone: ZoneId,
) -> Result<DateTime<Utc>, TimeTravelError> {
    let local = date.and_time(time);
    let tz = zone.tz();
    match tz.from_local_datetime(&local) {
        LocalResult::Single(resolved) => Ok(resolved.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // Gaps never exceed a few hours; probe the offset before it.
            let before = tz
                .from_local_datetime(&(local - Duration::hours(3)))
                .earliest()
                .ok_or(TimeTravelError::Unresolvable { local, zone })?;
            let offset = chrono::Offset::fix(before.offset());
            Ok(Utc.from_utc_datetime(&(local - offset)))
        }
    }
}

/// Selected "what time would it be" instant for the travel slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTravel {
    date: NaiveDate,
    time: NaiveTime,
    zone: ZoneId,
}

impl TimeTravel {
    /// Starts at the current local date/minute of `zone`.
    pub fn starting_at(now: DateTime<Utc>, zone: ZoneId) -> Self {
        let local = now.with_timezone(&zone.tz()).naive_local();
        Self {
            date: local.date(),
            time: truncate_to_minute(local.time()),
            zone,
        }
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn set_time(&mut self, time: NaiveTime) {
        self.time = truncate_to_minute(time);
    }

    /// Returns to the present moment.
    pub fn reset_to(&mut self, now: DateTime<Utc>) {
        *self = Self::starting_at(now, self.zone);
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    /// Instant fed to every card while travelling.
    pub fn instant(&self) -> Result<DateTime<Utc>, TimeTravelError> {
        resolve_local(self.date, self.time, self.zone)
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str) -> ZoneId {
        ZoneId::parse(name).unwrap()
    }

    #[test]
    fn resolves_plain_local_time() {
        let date = parse_date("2024-06-15").unwrap();
        let time = parse_hh_mm("21:00").unwrap();
        let instant = resolve_local(date, time, zone("Asia/Tokyo")).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-06-15T12:00:00+00:00");
    }

    #[test]
    fn ambiguous_fall_back_picks_earlier_instant() {
        let date = parse_date("2024-11-03").unwrap();
        let time = parse_hh_mm("01:30").unwrap();
        let instant = resolve_local(date, time, zone("America/New_York")).unwrap();
        // 01:30 EDT (UTC-4), not 01:30 EST.
        assert_eq!(instant.to_rfc3339(), "2024-11-03T05:30:00+00:00");
    }

    #[test]
    fn spring_forward_gap_moves_past_transition() {
        let date = parse_date("2024-03-10").unwrap();
        let time = parse_hh_mm("02:30").unwrap();
        let instant = resolve_local(date, time, zone("America/New_York")).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-03-10T07:30:00+00:00");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(parse_hh_mm("25:99"), Err(TimeTravelError::InvalidTime(_))));
        assert!(matches!(parse_date("15/06/2024"), Err(TimeTravelError::InvalidDate(_))));
    }

    #[test]
    fn travel_tracks_selection_and_resets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 42).unwrap();
        let mut travel = TimeTravel::starting_at(now, zone("Europe/London"));
        assert_eq!(travel.time(), parse_hh_mm("13:00").unwrap());

        travel.set_time(parse_hh_mm("09:15").unwrap());
        travel.set_date(parse_date("2024-12-25").unwrap());
        assert_eq!(
            travel.instant().unwrap().to_rfc3339(),
            "2024-12-25T09:15:00+00:00"
        );

        travel.reset_to(now);
        assert_eq!(travel.date(), parse_date("2024-06-15").unwrap());
        assert_eq!(travel.zone(), zone("Europe/London"));
    }
}
