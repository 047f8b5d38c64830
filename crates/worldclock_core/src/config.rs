//! Runtime configuration.
//!
//! # Responsibility
//! - Build `AppConfig` from `WORLDCLOCK_*` environment variables.
//! - Load and save user `Settings` through the durable store.
//!
//! # Invariants
//! - Unset variables take defaults; set-but-invalid variables are errors.
//! - Missing or corrupt persisted settings load as `Settings::default()`.

use crate::logging::default_log_level;
use crate::model::settings::{Settings, Theme};
use crate::repo::kv_store::{read_json_or_default, write_json, DurableStore, StoreResult, SETTINGS_KEY};
use crate::time::zone::{ZoneError, ZoneId};
use chrono::{DateTime, Local, Offset, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB: &str = "WORLDCLOCK_DB";
pub const ENV_LOG_LEVEL: &str = "WORLDCLOCK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "WORLDCLOCK_LOG_DIR";
pub const ENV_HOST_TZ: &str = "WORLDCLOCK_HOST_TZ";
pub const ENV_FORMAT: &str = "WORLDCLOCK_FORMAT";
pub const ENV_THEME: &str = "WORLDCLOCK_THEME";

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidHostZone(ZoneError),
    InvalidLogLevel(String),
    InvalidFormat(String),
    InvalidTheme(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHostZone(err) => write!(f, "{ENV_HOST_TZ}: {err}"),
            Self::InvalidLogLevel(value) => write!(
                f,
                "{ENV_LOG_LEVEL}: unsupported level `{value}`; expected one of {}",
                LOG_LEVELS.join("|")
            ),
            Self::InvalidFormat(value) => {
                write!(f, "{ENV_FORMAT}: unsupported format `{value}`; expected 12|24")
            }
            Self::InvalidTheme(value) => {
                write!(f, "{ENV_THEME}: unsupported theme `{value}`; expected light|dark")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidHostZone(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ZoneError> for ConfigError {
    fn from(value: ZoneError) -> Self {
        Self::InvalidHostZone(value)
    }
}

/// Zone the "time difference from local" columns are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostZone {
    /// The operating system's local zone.
    #[default]
    System,
    Fixed(ZoneId),
}

impl HostZone {
    /// Host offset from UTC at `instant`, in seconds.
    pub fn offset_seconds(&self, instant: DateTime<Utc>) -> i32 {
        match self {
            Self::System => instant.with_timezone(&Local).offset().fix().local_minus_utc(),
            Self::Fixed(zone) => crate::time::derive::utc_offset_seconds(instant, *zone),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub host_zone: HostZone,
    /// Environment overrides applied on top of persisted settings.
    pub format_override: Option<bool>,
    pub theme_override: Option<Theme>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            host_zone: HostZone::System,
            format_override: None,
            theme_override: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        config.db_path = read(ENV_DB).map(PathBuf::from);
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);

        if let Some(level) = read(ENV_LOG_LEVEL) {
            let normalized = level.to_ascii_lowercase();
            if !LOG_LEVELS.contains(&normalized.as_str()) {
                return Err(ConfigError::InvalidLogLevel(level));
            }
            config.log_level = normalized;
        }

        if let Some(zone) = read(ENV_HOST_TZ) {
            config.host_zone = HostZone::Fixed(ZoneId::parse(&zone)?);
        }

        if let Some(format) = read(ENV_FORMAT) {
            config.format_override = Some(match format.as_str() {
                "24" => true,
                "12" => false,
                _ => return Err(ConfigError::InvalidFormat(format.clone())),
            });
        }

        if let Some(theme) = read(ENV_THEME) {
            config.theme_override =
                Some(Theme::parse(&theme).ok_or(ConfigError::InvalidTheme(theme))?);
        }

        Ok(config)
    }

    /// Persisted settings with environment overrides applied.
    pub fn effective_settings(&self, stored: Settings) -> Settings {
        Settings {
            use_24_hour: self.format_override.unwrap_or(stored.use_24_hour),
            theme: self.theme_override.unwrap_or(stored.theme),
            ..stored
        }
    }
}

pub fn load_settings<S: DurableStore + ?Sized>(store: &S) -> Settings {
    read_json_or_default(store, SETTINGS_KEY, "config")
}

pub fn save_settings<S: DurableStore + ?Sized>(store: &S, settings: &Settings) -> StoreResult<()> {
    write_json(store, SETTINGS_KEY, settings)
}

#[cfg(test)]
mod tests {
    use super::{load_settings, save_settings, AppConfig, ConfigError, HostZone};
    use crate::db::open_db_in_memory;
    use crate::model::settings::{Settings, Theme};
    use crate::repo::kv_store::SqliteKvStore;
    use crate::time::zone::ZoneId;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn parses_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("WORLDCLOCK_DB", "/tmp/clock.db"),
            ("WORLDCLOCK_LOG_LEVEL", "WARN"),
            ("WORLDCLOCK_HOST_TZ", "Asia/Tokyo"),
            ("WORLDCLOCK_FORMAT", "12"),
            ("WORLDCLOCK_THEME", "dark"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(
            config.host_zone,
            HostZone::Fixed(ZoneId::parse("Asia/Tokyo").unwrap())
        );

        let settings = config.effective_settings(Settings::default());
        assert!(!settings.use_24_hour);
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.show_weather);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("WORLDCLOCK_HOST_TZ", "Mars/Base")])),
            Err(ConfigError::InvalidHostZone(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("WORLDCLOCK_FORMAT", "36")])),
            Err(ConfigError::InvalidFormat(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("WORLDCLOCK_LOG_LEVEL", "loud")])),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn fixed_host_zone_offset_follows_dst() {
        let host = HostZone::Fixed(ZoneId::parse("Europe/London").unwrap());
        let summer = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(host.offset_seconds(summer), 3600);
        assert_eq!(host.offset_seconds(winter), 0);
    }

    #[test]
    fn settings_round_trip_through_store() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKvStore::new(&conn);
        assert_eq!(load_settings(&store), Settings::default());

        let settings = Settings {
            use_24_hour: false,
            theme: Theme::Dark,
            show_weather: false,
        };
        save_settings(&store, &settings).unwrap();
        assert_eq!(load_settings(&store), settings);
    }
}
