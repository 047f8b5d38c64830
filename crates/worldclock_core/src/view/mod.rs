//! Presentation view models.
//!
//! Views are plain data built from the time layer for one instant; any
//! front end (the CLI included) only formats them.

pub mod card;
pub mod widget;
