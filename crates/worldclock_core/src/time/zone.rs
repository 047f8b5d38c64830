//! Validated IANA time-zone identifiers.
//!
//! # Responsibility
//! - Turn untrusted zone strings into a typed `ZoneId` exactly once.
//! - Keep the derivation layer free of fallible zone lookups.
//!
//! # Invariants
//! - A `ZoneId` always resolves to a zone in the bundled tz database.
//! - Serialized form is the canonical IANA name (e.g. `Asia/Tokyo`).

use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors raised when an identifier cannot be resolved to a tz database zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// Identifier is blank after trim.
    Empty,
    /// Identifier is not present in the tz database.
    Unknown(String),
}

impl Display for ZoneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "time zone id must not be blank"),
            Self::Unknown(value) => write!(f, "unknown time zone id: `{value}`"),
        }
    }
}

impl Error for ZoneError {}

/// IANA zone identifier that has already been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneId(Tz);

impl ZoneId {
    /// Coordinated Universal Time.
    pub const UTC: Self = Self(Tz::UTC);

    /// Parses an IANA identifier such as `America/New_York`.
    ///
    /// # Errors
    /// - `ZoneError::Empty` for blank input.
    /// - `ZoneError::Unknown` when the tz database has no such zone.
    pub fn parse(value: &str) -> Result<Self, ZoneError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ZoneError::Empty);
        }
        trimmed
            .parse::<Tz>()
            .map(Self)
            .map_err(|_| ZoneError::Unknown(trimmed.to_string()))
    }

    /// Wraps an already-typed chrono-tz zone.
    pub const fn from_tz(tz: Tz) -> Self {
        Self(tz)
    }

    /// Underlying chrono-tz zone.
    pub fn tz(self) -> Tz {
        self.0
    }

    /// Canonical IANA name.
    pub fn name(self) -> &'static str {
        self.0.name()
    }
}

impl Display for ZoneId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ZoneId {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ZoneId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ZoneId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{ZoneError, ZoneId};

    #[test]
    fn parse_accepts_canonical_names_and_trims() {
        let zone = ZoneId::parse("  Asia/Kathmandu ").expect("valid zone");
        assert_eq!(zone.name(), "Asia/Kathmandu");
        assert_eq!(zone.to_string(), "Asia/Kathmandu");
    }

    #[test]
    fn parse_rejects_blank_and_unknown() {
        assert_eq!(ZoneId::parse("   "), Err(ZoneError::Empty));
        assert_eq!(
            ZoneId::parse("Mars/Olympus_Mons"),
            Err(ZoneError::Unknown("Mars/Olympus_Mons".to_string()))
        );
    }

    #[test]
    fn serde_uses_iana_name() {
        let zone = ZoneId::parse("Europe/London").unwrap();
        let json = serde_json::to_string(&zone).unwrap();
        assert_eq!(json, "\"Europe/London\"");

        let back: ZoneId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, zone);

        let err = serde_json::from_str::<ZoneId>("\"Nowhere/City\"").unwrap_err();
        assert!(err.to_string().contains("unknown time zone id"));
    }
}
