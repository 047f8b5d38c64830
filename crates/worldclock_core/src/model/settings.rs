//! User display settings.
//!
//! # Invariants
//! - Defaults match a first launch: 24-hour clock, light theme, weather on.
//! - Unknown fields in persisted JSON are ignored; missing fields default.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Colour scheme used to pick visual tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parses `light|dark` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// `true` renders `21:00`, `false` renders `9:00 PM`.
    pub use_24_hour: bool,
    pub theme: Theme,
    pub show_weather: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_24_hour: true,
            theme: Theme::Light,
            show_weather: true,
        }
    }
}

impl Settings {
    /// Human label for the active clock format (`24-hour` / `12-hour`).
    pub fn format_label(&self) -> &'static str {
        if self.use_24_hour {
            "24-hour"
        } else {
            "12-hour"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, Theme};

    #[test]
    fn theme_parse_is_case_insensitive() {
        assert_eq!(Theme::parse(" DARK "), Some(Theme::Dark));
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.use_24_hour);
        assert!(settings.show_weather);
        assert_eq!(settings.format_label(), "24-hour");
    }
}
