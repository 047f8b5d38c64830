//! Location repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the ordered registry so it can be restored on the next start.
//!
//! # Invariants
//! - `save_all` replaces the stored list atomically; `sort_order` mirrors
//!   the slice position.
//! - `load_all` never fails on a single bad row: rows whose zone no longer
//!   parses are skipped and logged.

use crate::db::DbError;
use crate::model::location::Location;
use crate::time::zone::ZoneId;
use log::warn;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type LocationRepoResult<T> = Result<T, LocationRepoError>;

#[derive(Debug)]
pub enum LocationRepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for LocationRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted location data: {message}"),
        }
    }
}

impl Error for LocationRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for LocationRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LocationRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub trait LocationRepository {
    fn save_all(&self, locations: &[Location]) -> LocationRepoResult<()>;
    fn load_all(&self) -> LocationRepoResult<Vec<Location>>;
}

pub struct SqliteLocationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLocationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LocationRepository for SqliteLocationRepository<'_> {
    fn save_all(&self, locations: &[Location]) -> LocationRepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM locations;", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO locations (uuid, name, time_zone, custom_name, is_favorite, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            )?;
            for (position, location) in locations.iter().enumerate() {
                stmt.execute(params![
                    location.id.to_string(),
                    location.name,
                    location.time_zone.name(),
                    location.custom_name,
                    location.is_favorite,
                    position as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_all(&self) -> LocationRepoResult<Vec<Location>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, time_zone, custom_name, is_favorite
             FROM locations
             ORDER BY sort_order ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut locations = Vec::new();

        while let Some(row) = rows.next()? {
            match parse_location_row(row) {
                Ok(location) => locations.push(location),
                Err(LocationRepoError::InvalidData(message)) => {
                    warn!(
                        "event=location_load module=repo status=skip error_code=invalid_row error={message}"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(locations)
    }
}

fn parse_location_row(row: &Row<'_>) -> LocationRepoResult<Location> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        LocationRepoError::InvalidData(format!("invalid uuid `{uuid_text}` in locations.uuid"))
    })?;

    let zone_text: String = row.get("time_zone")?;
    let time_zone = ZoneId::parse(&zone_text).map_err(|err| {
        LocationRepoError::InvalidData(format!("{err} in locations.time_zone"))
    })?;

    Ok(Location {
        id,
        name: row.get("name")?,
        time_zone,
        custom_name: row.get("custom_name")?,
        is_favorite: row.get("is_favorite")?,
    })
}
