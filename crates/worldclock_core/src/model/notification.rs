//! Notification record.
//!
//! # Invariants
//! - `read` only moves from `false` to `true`.
//! - Serialized form is camelCase JSON; `isRead` is accepted on input so
//!   older snapshots keep loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NotificationId = Uuid;

/// Severity used to pick an icon and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Entry in the notification log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "isRead")]
    pub read: bool,
    #[serde(default)]
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Caller-supplied part of a notification; id and timestamp are assigned
/// on add.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewNotification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
    pub icon: Option<String>,
}

impl NewNotification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: NotificationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Materializes an unread record.
    pub fn into_record(self, timestamp: DateTime<Utc>) -> NotificationRecord {
        NotificationRecord {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            timestamp,
            read: false,
            kind: self.kind,
            icon: self.icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewNotification, NotificationKind, NotificationRecord};
    use chrono::{TimeZone, Utc};

    #[test]
    fn serializes_camel_case_and_skips_missing_icon() {
        let record = NewNotification::new("Saved", "Locations saved")
            .with_kind(NotificationKind::Success)
            .into_record(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["read"], false);
        assert_eq!(json["timestamp"], "2024-06-15T12:00:00Z");
        assert!(json.get("icon").is_none());
    }

    #[test]
    fn accepts_is_read_alias() {
        let json = r#"{
            "id": "5f0c6a1e-1d2b-4c3d-8e9f-0a1b2c3d4e5f",
            "title": "Meeting",
            "description": "",
            "timestamp": "2024-06-15T12:00:00Z",
            "isRead": true
        }"#;
        let record: NotificationRecord = serde_json::from_str(json).unwrap();
        assert!(record.read);
        assert_eq!(record.kind, NotificationKind::Info);
    }
}
