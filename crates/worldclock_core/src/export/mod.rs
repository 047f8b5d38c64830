//! Export and embed formats.
//!
//! # Responsibility
//! - Turn the registry plus one instant into CSV/JSON tables, calendar
//!   payloads and widget embed snippets.
//!
//! # Invariants
//! - Every format reads times through the time layer; no format computes
//!   offsets or local times on its own.
//! - Formatting is pure: callers pass the instant, host zone and ids.

use crate::time::travel::TimeTravelError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod calendar;
pub mod embed;
pub mod table;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Json(serde_json::Error),
    Url(url::ParseError),
    Time(TimeTravelError),
    /// A required input was blank.
    MissingField(&'static str),
    UnknownFormat(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "json export failed: {err}"),
            Self::Url(err) => write!(f, "invalid url: {err}"),
            Self::Time(err) => write!(f, "{err}"),
            Self::MissingField(field) => write!(f, "`{field}` must not be blank"),
            Self::UnknownFormat(value) => write!(f, "unknown export format `{value}`; expected csv|json"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Url(err) => Some(err),
            Self::Time(err) => Some(err),
            Self::MissingField(_) | Self::UnknownFormat(_) => None,
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<url::ParseError> for ExportError {
    fn from(value: url::ParseError) -> Self {
        Self::Url(value)
    }
}

impl From<TimeTravelError> for ExportError {
    fn from(value: TimeTravelError) -> Self {
        Self::Time(value)
    }
}
