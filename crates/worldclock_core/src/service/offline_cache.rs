//! Offline time cache.
//!
//! When the host reports no connectivity, cards keep ticking from the last
//! snapshot: `cached_instant + (live_now - cached_at)`.

use crate::model::location::Location;
use crate::repo::kv_store::{read_json_or_default, write_json_logged, DurableStore, CACHED_TIMES_KEY};
use crate::time::zone::ZoneId;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

const MODULE: &str = "offline_cache";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedTime {
    pub location: String,
    pub time_zone: ZoneId,
    pub cached_at: DateTime<Utc>,
    pub cached_instant: DateTime<Utc>,
}

pub struct OfflineCache<S: DurableStore> {
    store: S,
    online: bool,
    entries: Vec<CachedTime>,
}

impl<S: DurableStore> OfflineCache<S> {
    /// Loads the last snapshot; starts online.
    pub fn open(store: S) -> Self {
        let entries = read_json_or_default(&store, CACHED_TIMES_KEY, MODULE);
        Self {
            store,
            online: true,
            entries,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn set_online(&mut self, online: bool) {
        if self.online != online {
            info!("event=connectivity_change module={MODULE} status=ok online={online}");
        }
        self.online = online;
    }

    pub fn entries(&self) -> &[CachedTime] {
        &self.entries
    }

    /// Replaces the snapshot with one entry per location.
    pub fn cache_times(&mut self, locations: &[Location], now: DateTime<Utc>) {
        self.entries = locations
            .iter()
            .map(|location| CachedTime {
                location: location.name.clone(),
                time_zone: location.time_zone,
                cached_at: now,
                cached_instant: now,
            })
            .collect();
        write_json_logged(&self.store, CACHED_TIMES_KEY, &self.entries, MODULE);
    }

    /// Instant to render `location` with.
    pub fn resolve_instant(&self, location: &str, live_now: DateTime<Utc>) -> DateTime<Utc> {
        if self.online {
            return live_now;
        }
        match self.entries.iter().find(|entry| entry.location == location) {
            Some(entry) => entry.cached_instant + (live_now - entry.cached_at),
            None => live_now,
        }
    }
}
