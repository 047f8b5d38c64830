//! Scheduled time-alert rule.
//!
//! # Invariants
//! - `target_time` is a local wall-clock minute in `time_zone`.
//! - Rules are persisted as camelCase JSON with `HH:MM` target times.
//! - `last_fired` is a local date in `time_zone`; older stored rules
//!   without it load as never fired.

use crate::time::zone::ZoneId;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

pub type AlertRuleId = Uuid;

/// "Remind me at HH:MM local time in this location."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub id: AlertRuleId,
    /// Display name of the location the rule was created for.
    pub location: String,
    pub time_zone: ZoneId,
    #[serde(with = "hh_mm")]
    pub target_time: NaiveTime,
    pub message: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fired: Option<NaiveDate>,
}

impl AlertRule {
    /// Creates an enabled rule with a fresh id.
    pub fn new(
        location: impl Into<String>,
        time_zone: ZoneId,
        target_time: NaiveTime,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            location: location.into(),
            time_zone,
            target_time,
            message: message.into(),
            enabled: true,
            last_fired: None,
        }
    }
}

mod hh_mm {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}
