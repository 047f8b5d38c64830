//! City → time-zone catalog.
//!
//! # Responsibility
//! - Own the static table of selectable cities.
//! - Provide exact-spelling lookup (registry add) and ranked search.
//!
//! # Invariants
//! - Every entry carries a zone id that `ZoneId::parse` accepts.
//! - `lookup` is case-sensitive; `search` is not.

mod cities;

use crate::time::zone::{ZoneError, ZoneId};
use cities::CITIES;

/// One selectable city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct City {
    pub city: &'static str,
    pub country: &'static str,
    pub timezone: &'static str,
}

impl City {
    /// Validated zone of this city.
    pub fn zone(&self) -> Result<ZoneId, ZoneError> {
        ZoneId::parse(self.timezone)
    }
}

/// Full table in declaration order.
pub fn all() -> &'static [City] {
    CITIES
}

/// Exact-spelling match on the city label.
pub fn lookup(city: &str) -> Option<&'static City> {
    CITIES.iter().find(|entry| entry.city == city)
}

/// Case-insensitive substring search over city, country and zone id.
///
/// Entries whose city or country equals the query come first; the rest are
/// ordered alphabetically by city. A blank query returns nothing.
pub fn search(query: &str) -> Vec<&'static City> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<&'static City> = CITIES
        .iter()
        .filter(|entry| {
            entry.city.to_lowercase().contains(&needle)
                || entry.country.to_lowercase().contains(&needle)
                || entry.timezone.to_lowercase().contains(&needle)
        })
        .collect();

    let is_exact = |entry: &City| {
        entry.city.to_lowercase() == needle || entry.country.to_lowercase() == needle
    };
    hits.sort_by(|a, b| {
        is_exact(b)
            .cmp(&is_exact(a))
            .then_with(|| a.city.cmp(b.city))
    });
    hits
}
