//! Core domain logic for the world clock.
//! This crate is the single source of truth for time derivation, the
//! location registry, notifications and export formats.

pub mod catalog;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod time;
pub mod view;

pub use config::{AppConfig, ConfigError, HostZone};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::location::{Location, LocationId};
pub use model::notification::{NewNotification, NotificationKind, NotificationRecord};
pub use model::settings::{Settings, Theme};
pub use repo::kv_store::{DurableStore, SqliteKvStore, StoreError, StoreResult};
pub use repo::location_repo::{LocationRepository, SqliteLocationRepository};
pub use service::notification_bus::NotificationBus;
pub use service::notification_center::NotificationCenter;
pub use service::registry::LocationRegistry;
pub use time::clock::{Clock, SystemClock, Ticker};
pub use time::derive::{derive_view, DerivedTimeView};
pub use time::zone::{ZoneError, ZoneId};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
