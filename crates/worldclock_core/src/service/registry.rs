//! Location registry.
//!
//! # Responsibility
//! - Own the ordered list of user-selected locations.
//! - Apply add/remove/reorder/rename/favorite edits by position.
//!
//! # Invariants
//! - Insertion order is display order; only `move_up`/`move_down` reorder.
//! - Every entry's zone came from the catalog and is valid.
//! - Stale or out-of-range positions are silent no-ops.

use crate::catalog;
use crate::model::location::{Location, LocationId};
use crate::repo::location_repo::{LocationRepoResult, LocationRepository};
use log::{debug, info};

/// Cities shown on first launch.
pub const DEFAULT_CITIES: [&str; 4] = ["New York", "London", "Tokyo", "Auckland"];

/// Ordered, single-owner list of locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationRegistry {
    locations: Vec<Location>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with [`DEFAULT_CITIES`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for city in DEFAULT_CITIES {
            registry.add(city);
        }
        registry
    }

    /// Restores a previously saved registry.
    pub fn restore<R: LocationRepository>(repo: &R) -> LocationRepoResult<Self> {
        let locations = repo.load_all()?;
        info!(
            "event=registry_restore module=registry status=ok count={}",
            locations.len()
        );
        Ok(Self { locations })
    }

    /// Persists the current order.
    pub fn save<R: LocationRepository>(&self, repo: &R) -> LocationRepoResult<()> {
        repo.save_all(&self.locations)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Adds a catalog city by exact spelling.
    ///
    /// # Contract
    /// - Unknown city: no-op, returns `None`.
    /// - Known city: appended with a fresh id, no custom name, not favorite.
    pub fn add(&mut self, city: &str) -> Option<LocationId> {
        let Some(entry) = catalog::lookup(city) else {
            debug!("event=registry_add module=registry status=skip reason=unknown_city");
            return None;
        };
        let zone = match entry.zone() {
            Ok(zone) => zone,
            Err(err) => {
                debug!("event=registry_add module=registry status=skip reason=invalid_zone error={err}");
                return None;
            }
        };

        let location = Location::new(entry.city, zone);
        let id = location.id;
        self.locations.push(location);
        Some(id)
    }

    /// Removes the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Location> {
        if index < self.locations.len() {
            Some(self.locations.remove(index))
        } else {
            None
        }
    }

    /// Swaps with the previous entry; no-op at the top.
    pub fn move_up(&mut self, index: usize) {
        if index > 0 && index < self.locations.len() {
            self.locations.swap(index - 1, index);
        }
    }

    /// Swaps with the next entry; no-op at the bottom.
    pub fn move_down(&mut self, index: usize) {
        if index + 1 < self.locations.len() {
            self.locations.swap(index, index + 1);
        }
    }

    /// Sets the custom name; a blank name clears it.
    pub fn rename(&mut self, index: usize, new_name: &str) {
        if let Some(location) = self.locations.get_mut(index) {
            let trimmed = new_name.trim();
            location.custom_name = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
    }

    pub fn toggle_favorite(&mut self, index: usize) {
        if let Some(location) = self.locations.get_mut(index) {
            location.is_favorite = !location.is_favorite;
        }
    }

    /// Current position of a stable id.
    pub fn index_of(&self, id: LocationId) -> Option<usize> {
        self.locations.iter().position(|location| location.id == id)
    }

    /// Entry whose catalog name or display name matches `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Location> {
        self.locations
            .iter()
            .find(|location| location.name == name || location.display_name() == name)
    }
}
