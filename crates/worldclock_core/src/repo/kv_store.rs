//! Key-value durable store.
//!
//! # Responsibility
//! - Persist small JSON documents (notifications, alert rules, cached times,
//!   settings) under well-known keys.
//! - Expose a change token so another instance sharing the database file can
//!   detect writes it did not make.
//!
//! # Invariants
//! - `put` replaces the whole value for a key; there are no partial writes.
//! - `change_token` only moves when a *different* connection commits.
//! - Corrupt JSON is never surfaced to callers of `read_json_or_default`;
//!   it degrades to the default value with a warning.

use crate::db::DbError;
use log::{error, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NOTIFICATIONS_KEY: &str = "world-time-notifications";
pub const CACHED_TIMES_KEY: &str = "cached-times";
pub const ALERT_RULES_KEY: &str = "time-alert-rules";
pub const SETTINGS_KEY: &str = "settings";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Json(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid stored json: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Durable string store keyed by name.
pub trait DurableStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
    /// Opaque value that changes after another connection commits.
    fn change_token(&self) -> StoreResult<i64>;
}

impl<S: DurableStore + ?Sized> DurableStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn change_token(&self) -> StoreResult<i64> {
        (**self).change_token()
    }
}

/// SQLite-backed store over the `kv_store` table.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DurableStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn change_token(&self) -> StoreResult<i64> {
        let token = self
            .conn
            .query_row("PRAGMA data_version;", [], |row| row.get::<_, i64>(0))?;
        Ok(token)
    }
}

/// Reads and decodes a JSON document.
///
/// Missing keys yield `Ok(None)`; undecodable values are errors.
pub fn read_json<T, S>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: DurableStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encodes and writes a JSON document.
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: DurableStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw)
}

/// Reads a JSON document, falling back to `T::default()` on absence,
/// corruption or storage failure.
pub fn read_json_or_default<T, S>(store: &S, key: &str, module: &str) -> T
where
    T: DeserializeOwned + Default,
    S: DurableStore + ?Sized,
{
    match read_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(StoreError::Json(err)) => {
            warn!(
                "event=store_load module={module} status=error key={key} error_code=corrupt_json error={err}"
            );
            T::default()
        }
        Err(err) => {
            warn!(
                "event=store_load module={module} status=error key={key} error_code=store_read_failed error={err}"
            );
            T::default()
        }
    }
}

/// Fire-and-forget write: failures are logged, never returned.
pub fn write_json_logged<T, S>(store: &S, key: &str, value: &T, module: &str)
where
    T: Serialize + ?Sized,
    S: DurableStore + ?Sized,
{
    if let Err(err) = write_json(store, key, value) {
        error!(
            "event=store_save module={module} status=error key={key} error_code=store_write_failed error={err}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{read_json_or_default, write_json, DurableStore, SqliteKvStore};
    use crate::db::open_db_in_memory;

    #[test]
    fn put_overwrites_and_remove_clears() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKvStore::new(&conn);

        assert_eq!(store.get("k").unwrap(), None);
        store.put("k", "one").unwrap();
        store.put("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn corrupt_json_reads_as_default() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKvStore::new(&conn);
        store.put("list", "{not json").unwrap();

        let values: Vec<u32> = read_json_or_default(&store, "list", "test");
        assert!(values.is_empty());

        write_json(&store, "list", &vec![1_u32, 2]).unwrap();
        let values: Vec<u32> = read_json_or_default(&store, "list", "test");
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn own_writes_do_not_move_change_token() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKvStore::new(&conn);
        let before = store.change_token().unwrap();
        store.put("k", "v").unwrap();
        assert_eq!(store.change_token().unwrap(), before);
    }
}
