//! Location record.
//!
//! # Invariants
//! - `time_zone` is validated at creation and never changes afterwards.
//! - `name` is the catalog label and the join key back to the city table;
//!   renames only touch `custom_name`.

use crate::time::zone::ZoneId;
use uuid::Uuid;

/// Stable identifier assigned when a location is created.
pub type LocationId = Uuid;

/// One clock card in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    /// Canonical city label.
    pub name: String,
    pub time_zone: ZoneId,
    pub custom_name: Option<String>,
    pub is_favorite: bool,
}

impl Location {
    /// Creates a location with a fresh id, no custom name and not favorite.
    pub fn new(name: impl Into<String>, time_zone: ZoneId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            time_zone,
            custom_name: None,
            is_favorite: false,
        }
    }

    /// Custom name when set and non-blank, otherwise the catalog name.
    pub fn display_name(&self) -> &str {
        match self.custom_name.as_deref() {
            Some(custom) if !custom.trim().is_empty() => custom,
            _ => &self.name,
        }
    }
}
