//! Meeting scheduling across zones: iCalendar file and calendar deep links.
//!
//! # Invariants
//! - All stamps are UTC `YYYYMMDDTHHMMSSZ`.
//! - ICS output uses CRLF line endings and escapes text values.
//! - ICS content lines are folded at 75 octets without splitting a UTF-8
//!   character.

use super::{ExportError, ExportResult};
use crate::model::location::Location;
use crate::time::derive::time_string;
use crate::time::travel::resolve_local;
use crate::time::zone::ZoneId;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;
use uuid::Uuid;

pub const DEFAULT_MEETING_LOCATION: &str = "Virtual Meeting";
pub const PRODID: &str = "-//World Time Windows//EN";
const UID_DOMAIN: &str = "worldtimewindows.com";
const GOOGLE_CALENDAR_URL: &str = "https://calendar.google.com/calendar/render";
const OUTLOOK_CALENDAR_URL: &str = "https://outlook.live.com/calendar/0/deeplink/compose";
const ICS_LINE_OCTETS: usize = 75;

static FILE_NAME_UNSAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("valid file name regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    pub title: String,
    pub start: DateTime<Utc>,
    pub duration: Duration,
    /// Free text, usually comma-separated emails.
    pub attendees: String,
    pub location: String,
}

impl MeetingRequest {
    /// One-hour virtual meeting starting at `start`.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start,
            duration: Duration::hours(1),
            attendees: String::new(),
            location: DEFAULT_MEETING_LOCATION.to_string(),
        }
    }

    /// Meeting whose start is a wall-clock time in the reference zone.
    pub fn start_from_local(
        title: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        zone: ZoneId,
    ) -> ExportResult<Self> {
        Ok(Self::new(title, resolve_local(date, time, zone)?))
    }

    pub fn with_attendees(mut self, attendees: impl Into<String>) -> Self {
        self.attendees = attendees.into();
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.duration
    }
}

/// Resolved event payload shared by every calendar target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub start_stamp: String,
    pub end_stamp: String,
    pub description: String,
    pub location: String,
}

pub fn utc_stamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Builds the event, listing the meeting's local start time per location.
pub fn build_event(request: &MeetingRequest, locations: &[Location]) -> ExportResult<CalendarEvent> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ExportError::MissingField("title"));
    }

    let breakdown: Vec<String> = locations
        .iter()
        .map(|location| {
            format!(
                "{}: {}",
                location.name,
                time_string(request.start, location.time_zone, true)
            )
        })
        .collect();
    let description = format!(
        "Meeting across time zones:\n\n{}\n\nAttendees: {}",
        breakdown.join("\n"),
        request.attendees.trim()
    );

    Ok(CalendarEvent {
        title: title.to_string(),
        start_stamp: utc_stamp(request.start),
        end_stamp: utc_stamp(request.end()),
        description,
        location: request.location.clone(),
    })
}

pub fn google_calendar_url(event: &CalendarEvent) -> ExportResult<Url> {
    let dates = format!("{}/{}", event.start_stamp, event.end_stamp);
    Ok(Url::parse_with_params(
        GOOGLE_CALENDAR_URL,
        &[
            ("action", "TEMPLATE"),
            ("text", event.title.as_str()),
            ("dates", dates.as_str()),
            ("details", event.description.as_str()),
            ("location", event.location.as_str()),
        ],
    )?)
}

pub fn outlook_calendar_url(event: &CalendarEvent) -> ExportResult<Url> {
    Ok(Url::parse_with_params(
        OUTLOOK_CALENDAR_URL,
        &[
            ("subject", event.title.as_str()),
            ("startdt", event.start_stamp.as_str()),
            ("enddt", event.end_stamp.as_str()),
            ("body", event.description.as_str()),
            ("location", event.location.as_str()),
        ],
    )?)
}

/// Escapes an iCalendar TEXT value.
pub fn escape_ics_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn to_ics(event: &CalendarEvent, uid: Uuid, now: DateTime<Utc>) -> String {
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{uid}@{UID_DOMAIN}"),
        format!("DTSTAMP:{}", utc_stamp(now)),
        format!("DTSTART:{}", event.start_stamp),
        format!("DTEND:{}", event.end_stamp),
        format!("SUMMARY:{}", escape_ics_text(&event.title)),
        format!("DESCRIPTION:{}", escape_ics_text(&event.description)),
        format!("LOCATION:{}", escape_ics_text(&event.location)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];
    let mut ics = String::new();
    for line in &lines {
        push_folded(&mut ics, line);
    }
    ics
}

/// Appends one content line, continuing past 75 octets on lines that
/// start with a single space.
fn push_folded(out: &mut String, line: &str) {
    let mut budget = ICS_LINE_OCTETS;
    let mut used = 0;
    for ch in line.chars() {
        if used + ch.len_utf8() > budget {
            out.push_str("\r\n ");
            budget = ICS_LINE_OCTETS - 1;
            used = 0;
        }
        out.push(ch);
        used += ch.len_utf8();
    }
    out.push_str("\r\n");
}

/// Title with every non-alphanumeric character replaced by `_`, plus `.ics`.
pub fn ics_file_name(title: &str) -> String {
    format!("{}.ics", FILE_NAME_UNSAFE_RE.replace_all(title, "_"))
}
