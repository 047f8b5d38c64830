//! One SQLite file shared by every world clock instance on the machine.
//!
//! Two tables live in it: `locations` holds the ordered registry, and
//! `kv_store` holds JSON documents keyed by name (`world-time-notifications`,
//! `time-alert-rules`, `cached-times`, `settings`). Instances notice each
//! other's commits through `PRAGMA data_version`.
//!
//! # Invariants
//! - `open_db` returns only after every pending migration has run;
//!   the schema version lives in `PRAGMA user_version`.
//! - A file written by a newer build is refused with
//!   `DbError::UnsupportedSchemaVersion` instead of being downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
