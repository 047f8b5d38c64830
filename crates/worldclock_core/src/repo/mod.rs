//! Storage contracts and their SQLite implementations.
//!
//! # Responsibility
//! - `kv_store`: string-keyed JSON values shared by every instance that
//!   opens the same database file.
//! - `location_repo`: the ordered location list.
//!
//! # Invariants
//! - SQL stays inside this layer; services only see the traits.
//! - Corrupt rows surface as semantic errors (`InvalidData`, `Json`),
//!   never as panics.

pub mod kv_store;
pub mod location_repo;
