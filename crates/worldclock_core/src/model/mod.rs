//! Domain records shared by services, repositories and views.
//!
//! # Responsibility
//! - Define the canonical shapes for locations, notifications, alert rules
//!   and display settings.
//!
//! # Invariants
//! - Every location and notification is identified by a stable uuid that
//!   is never reused.
//! - Zone fields hold validated `ZoneId`s, never raw strings.

pub mod alert;
pub mod location;
pub mod notification;
pub mod settings;
