//! Use-case services over the registry, notification log and stores.
//!
//! # Responsibility
//! - Orchestrate domain records, repositories and the time layer into the
//!   operations callers use.
//! - Keep callers decoupled from storage details.

pub mod alert_scheduler;
pub mod converter;
pub mod notification_bus;
pub mod notification_center;
pub mod notifier;
pub mod offline_cache;
pub mod registry;
pub mod weather;
