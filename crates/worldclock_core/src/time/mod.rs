//! Time-zone-aware time derivation.
//!
//! # Responsibility
//! - Validate zone identifiers (`zone`).
//! - Derive per-location display values from one shared instant (`derive`).
//! - Resolve wall-clock input to instants (`travel`) and hand out the
//!   shared instant (`clock`).
//!
//! # Invariants
//! - Derivation functions only accept validated `ZoneId`s, so formatting
//!   cannot fail past this module boundary.

pub mod clock;
pub mod derive;
pub mod travel;
pub mod zone;
