//! Notification center: the per-instance event log.
//!
//! # Responsibility
//! - Hold notification records newest-first and apply local mutations.
//! - Persist after every change (fire-and-forget) and publish each local
//!   mutation on the attached bus.
//! - Merge remote mutations, falling back to store polling when the bus is
//!   missing, lagging or closed.
//! - Catch up with the store before every local write so another
//!   instance's records are not overwritten.
//!
//! # Invariants
//! - `read` is one-way; dismissed records are removed, not hidden.
//! - Unread count is always derived from the records.
//! - Applying a remote `Added` whose id already exists is a no-op.
//! - Storage and desktop-notifier failures are logged and never returned.

use crate::model::notification::{NewNotification, NotificationId, NotificationRecord};
use crate::repo::kv_store::{read_json_or_default, write_json_logged, DurableStore, NOTIFICATIONS_KEY};
use crate::service::notification_bus::{
    BusEnvelope, BusPoll, BusSubscription, InstanceId, NotificationBus, NotificationEvent,
};
use crate::service::notifier::{
    DesktopNotifier, NoopNotifier, NotificationPermission, DEFAULT_ICON,
};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use uuid::Uuid;

const MODULE: &str = "notifications";

/// What one `sync` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Remote events applied from the bus.
    pub applied: usize,
    /// Whether the list was reloaded from the store.
    pub reloaded: bool,
}

struct BusLink {
    bus: NotificationBus,
    subscription: Option<BusSubscription>,
}

pub struct NotificationCenter<S: DurableStore> {
    store: S,
    origin: InstanceId,
    records: Vec<NotificationRecord>,
    notifier: Box<dyn DesktopNotifier>,
    link: Option<BusLink>,
    change_token: Option<i64>,
}

impl<S: DurableStore> NotificationCenter<S> {
    /// Loads persisted records; corrupt or missing data starts empty.
    pub fn open(store: S) -> Self {
        let records: Vec<NotificationRecord> =
            read_json_or_default(&store, NOTIFICATIONS_KEY, MODULE);
        let change_token = store.change_token().ok();
        info!(
            "event=notifications_load module={MODULE} status=ok count={}",
            records.len()
        );
        Self {
            store,
            origin: Uuid::new_v4(),
            records,
            notifier: Box::new(NoopNotifier),
            link: None,
            change_token,
        }
    }

    pub fn with_notifier(mut self, notifier: impl DesktopNotifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Joins a bus: local mutations are published, remote ones merged by
    /// `sync`.
    pub fn attach_bus(&mut self, bus: &NotificationBus) {
        self.link = Some(BusLink {
            bus: bus.clone(),
            subscription: Some(bus.subscribe()),
        });
    }

    pub fn origin(&self) -> InstanceId {
        self.origin
    }

    /// Records newest-first.
    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|record| !record.read).count()
    }

    pub fn get(&self, id: NotificationId) -> Option<&NotificationRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Prepends a new unread record.
    ///
    /// # Side effects
    /// - Persists, publishes `Added`, and mirrors to the desktop notifier
    ///   when permission is granted.
    pub fn add(&mut self, notification: NewNotification, now: DateTime<Utc>) -> NotificationId {
        self.catch_up();
        let record = notification.into_record(now);
        let id = record.id;
        self.records.insert(0, record.clone());
        self.persist();
        self.mirror_to_desktop(&record);
        self.publish(NotificationEvent::Added(record));
        debug!(
            "event=notification_add module={MODULE} status=ok unread={}",
            self.unread_count()
        );
        id
    }

    /// Marks one record read; returns `false` for unknown ids.
    pub fn mark_read(&mut self, id: NotificationId) -> bool {
        self.catch_up();
        if !apply_mark_read(&mut self.records, id) {
            return false;
        }
        self.persist();
        self.publish(NotificationEvent::MarkedRead(id));
        true
    }

    pub fn mark_all_read(&mut self) {
        self.catch_up();
        apply_mark_all_read(&mut self.records);
        self.persist();
        self.publish(NotificationEvent::MarkedAllRead);
    }

    /// Removes one record; returns `false` for unknown ids.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        self.catch_up();
        if !apply_dismiss(&mut self.records, id) {
            return false;
        }
        self.persist();
        self.publish(NotificationEvent::Dismissed(id));
        true
    }

    pub fn clear_all(&mut self) {
        self.catch_up();
        self.records.clear();
        self.persist();
        self.publish(NotificationEvent::Cleared);
    }

    /// Merges changes made by other instances.
    ///
    /// # Contract
    /// - Drains the bus without blocking; own echoes are skipped.
    /// - Lag forces a reload from the store.
    /// - With no bus (or a closed one), polls the store's change token and
    ///   reloads when it moved.
    pub fn sync(&mut self) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();
        let mut force_reload = false;
        let mut bus_open = false;

        if let Some(subscription) = self
            .link
            .as_mut()
            .and_then(|link| link.subscription.as_mut())
        {
            bus_open = true;
            loop {
                match subscription.poll() {
                    BusPoll::Message(envelope) => {
                        if envelope.origin == self.origin {
                            continue;
                        }
                        if apply_remote(&mut self.records, envelope.event) {
                            outcome.applied += 1;
                        }
                    }
                    BusPoll::Empty => break,
                    BusPoll::Lagged(skipped) => {
                        warn!(
                            "event=notifications_sync module={MODULE} status=error error_code=bus_lagged skipped={skipped}"
                        );
                        force_reload = true;
                    }
                    BusPoll::Closed => {
                        warn!(
                            "event=notifications_sync module={MODULE} status=error error_code=bus_closed fallback=poll_store"
                        );
                        bus_open = false;
                        break;
                    }
                }
            }
        }

        if !bus_open {
            if let Some(link) = self.link.as_mut() {
                link.subscription = None;
            }
        }

        if force_reload || (!bus_open && self.store_changed()) {
            self.reload();
            outcome.reloaded = true;
        } else if outcome.applied > 0 {
            self.persist();
        }

        if outcome.applied > 0 || outcome.reloaded {
            debug!(
                "event=notifications_sync module={MODULE} status=ok applied={} reloaded={}",
                outcome.applied, outcome.reloaded
            );
        }
        outcome
    }

    fn store_changed(&mut self) -> bool {
        match self.store.change_token() {
            Ok(token) => {
                let changed = self.change_token != Some(token);
                self.change_token = Some(token);
                changed
            }
            Err(err) => {
                warn!(
                    "event=notifications_sync module={MODULE} status=error error_code=change_token_failed error={err}"
                );
                false
            }
        }
    }

    /// Adopts the stored list when another connection wrote since we last
    /// looked.
    ///
    /// # Contract
    /// - Every instance writes its full list after each mutation, so a moved
    ///   store already holds this instance's earlier changes plus the other
    ///   side's; records missing from it were dismissed or cleared remotely.
    /// - Bus events for the same changes apply as no-ops afterwards.
    fn catch_up(&mut self) {
        if self.store_changed() {
            self.reload();
            debug!(
                "event=notifications_catch_up module={MODULE} status=ok count={}",
                self.records.len()
            );
        }
    }

    fn reload(&mut self) {
        self.records = read_json_or_default(&self.store, NOTIFICATIONS_KEY, MODULE);
        self.change_token = self.store.change_token().ok();
    }

    fn persist(&self) {
        write_json_logged(&self.store, NOTIFICATIONS_KEY, &self.records, MODULE);
    }

    fn publish(&self, event: NotificationEvent) {
        if let Some(link) = &self.link {
            link.bus.publish(BusEnvelope {
                origin: self.origin,
                event,
            });
        }
    }

    fn mirror_to_desktop(&self, record: &NotificationRecord) {
        let permission = self.notifier.permission();
        if permission != NotificationPermission::Granted {
            debug!(
                "event=desktop_notify module={MODULE} status=skip permission={}",
                permission.as_str()
            );
            return;
        }
        let icon = record.icon.as_deref().unwrap_or(DEFAULT_ICON);
        if let Err(err) = self.notifier.notify(&record.title, &record.description, icon) {
            warn!("event=desktop_notify module={MODULE} status=error error={err}");
        }
    }
}

fn apply_mark_read(records: &mut [NotificationRecord], id: NotificationId) -> bool {
    match records.iter_mut().find(|record| record.id == id) {
        Some(record) => {
            record.read = true;
            true
        }
        None => false,
    }
}

fn apply_mark_all_read(records: &mut [NotificationRecord]) {
    for record in records.iter_mut() {
        record.read = true;
    }
}

fn apply_dismiss(records: &mut Vec<NotificationRecord>, id: NotificationId) -> bool {
    let before = records.len();
    records.retain(|record| record.id != id);
    records.len() != before
}

/// Applies a remote event; returns whether anything changed.
fn apply_remote(records: &mut Vec<NotificationRecord>, event: NotificationEvent) -> bool {
    match event {
        NotificationEvent::Added(record) => {
            if records.iter().any(|existing| existing.id == record.id) {
                return false;
            }
            records.insert(0, record);
            true
        }
        NotificationEvent::MarkedRead(id) => match records.iter_mut().find(|r| r.id == id) {
            Some(record) if !record.read => {
                record.read = true;
                true
            }
            _ => false,
        },
        NotificationEvent::MarkedAllRead => {
            let any_unread = records.iter().any(|record| !record.read);
            apply_mark_all_read(records);
            any_unread
        }
        NotificationEvent::Dismissed(id) => apply_dismiss(records, id),
        NotificationEvent::Cleared => {
            let had_records = !records.is_empty();
            records.clear();
            had_records
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationCenter;
    use crate::db::open_db_in_memory;
    use crate::model::notification::NewNotification;
    use crate::repo::kv_store::{DurableStore, SqliteKvStore, NOTIFICATIONS_KEY};
    use crate::service::notification_bus::{BusEnvelope, NotificationBus, NotificationEvent};
    use crate::service::notifier::{DesktopNotifier, NotificationPermission, NotifierError};
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::rc::Rc;
    use uuid::Uuid;

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        permission: Option<NotificationPermission>,
        shown: Rc<RefCell<Vec<(String, String)>>>,
    }

    impl DesktopNotifier for RecordingNotifier {
        fn permission(&self) -> NotificationPermission {
            self.permission.unwrap_or(NotificationPermission::Granted)
        }

        fn notify(&self, title: &str, _body: &str, icon: &str) -> Result<(), NotifierError> {
            self.shown
                .borrow_mut()
                .push((title.to_string(), icon.to_string()));
            Ok(())
        }
    }

    #[test]
    fn add_prepends_and_unread_is_derived() {
        let conn = open_db_in_memory().unwrap();
        let mut center = NotificationCenter::open(SqliteKvStore::new(&conn));

        let first = center.add(NewNotification::new("One", ""), now());
        let second = center.add(NewNotification::new("Two", ""), now());
        assert_eq!(center.records()[0].id, second);
        assert_eq!(center.unread_count(), 2);

        assert!(center.mark_read(first));
        assert!(center.mark_read(first));
        assert_eq!(center.unread_count(), 1);

        assert!(center.dismiss(second));
        assert!(!center.dismiss(second));
        assert_eq!(center.unread_count(), 0);
        assert_eq!(center.records().len(), 1);
    }

    #[test]
    fn mutations_persist_across_reopen() {
        let conn = open_db_in_memory().unwrap();
        {
            let mut center = NotificationCenter::open(SqliteKvStore::new(&conn));
            center.add(NewNotification::new("Persisted", "body"), now());
            center.mark_all_read();
        }
        let center = NotificationCenter::open(SqliteKvStore::new(&conn));
        assert_eq!(center.records().len(), 1);
        assert_eq!(center.unread_count(), 0);
    }

    #[test]
    fn corrupt_snapshot_starts_empty() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKvStore::new(&conn);
        store.put(NOTIFICATIONS_KEY, "[{\"broken\"").unwrap();

        let mut center = NotificationCenter::open(store);
        assert!(center.records().is_empty());
        center.add(NewNotification::new("Fresh", ""), now());
        assert_eq!(center.records().len(), 1);
    }

    #[test]
    fn desktop_mirror_only_when_granted() {
        let conn = open_db_in_memory().unwrap();
        let granted = RecordingNotifier::default();
        let mut center =
            NotificationCenter::open(SqliteKvStore::new(&conn)).with_notifier(granted.clone());
        center.add(NewNotification::new("Shown", "").with_icon("/clock.png"), now());
        center.add(NewNotification::new("Default icon", ""), now());
        assert_eq!(
            *granted.shown.borrow(),
            vec![
                ("Shown".to_string(), "/clock.png".to_string()),
                ("Default icon".to_string(), "/favicon.ico".to_string()),
            ]
        );

        let denied = RecordingNotifier {
            permission: Some(NotificationPermission::Denied),
            ..RecordingNotifier::default()
        };
        let mut center =
            NotificationCenter::open(SqliteKvStore::new(&conn)).with_notifier(denied.clone());
        center.add(NewNotification::new("Hidden", ""), now());
        assert!(denied.shown.borrow().is_empty());
    }

    #[test]
    fn remote_add_of_existing_id_is_merged_once() {
        let conn_a = open_db_in_memory().unwrap();
        let conn_b = open_db_in_memory().unwrap();
        let bus = NotificationBus::default();

        let mut a = NotificationCenter::open(SqliteKvStore::new(&conn_a));
        let mut b = NotificationCenter::open(SqliteKvStore::new(&conn_b));
        a.attach_bus(&bus);
        b.attach_bus(&bus);

        let id = a.add(NewNotification::new("Shared", ""), now());
        let record = a.get(id).unwrap().clone();
        bus.publish(BusEnvelope {
            origin: Uuid::new_v4(),
            event: NotificationEvent::Added(record),
        });

        let outcome = b.sync();
        assert_eq!(outcome.applied, 1);
        assert_eq!(b.records().len(), 1);

        // Own echoes are ignored.
        assert_eq!(a.sync().applied, 0);
        assert_eq!(a.records().len(), 1);

        b.mark_read(id);
        a.sync();
        assert_eq!(a.unread_count(), 0);

        a.clear_all();
        b.sync();
        assert!(b.records().is_empty());
    }

    #[test]
    fn lagging_subscriber_reloads_from_store() {
        let conn = open_db_in_memory().unwrap();
        let bus = NotificationBus::new(1);

        let mut a = NotificationCenter::open(SqliteKvStore::new(&conn));
        let mut b = NotificationCenter::open(SqliteKvStore::new(&conn));
        a.attach_bus(&bus);
        b.attach_bus(&bus);

        for title in ["one", "two", "three"] {
            a.add(NewNotification::new(title, ""), now());
        }

        let outcome = b.sync();
        assert!(outcome.reloaded);
        assert_eq!(b.records().len(), 3);
        assert_eq!(b.records()[0].title, "three");
    }
}
