//! Scheduled time alerts.
//!
//! # Responsibility
//! - Own the persisted alert rules.
//! - Turn matching rules into notifications on each evaluation.
//!
//! # Invariants
//! - A rule fires at most once per local calendar day of its zone, across
//!   restarts: the fired date is stored on the rule.
//! - Rules can only be created for locations present in the registry.

use crate::model::alert::{AlertRule, AlertRuleId};
use crate::model::notification::{NewNotification, NotificationKind};
use crate::repo::kv_store::{read_json_or_default, write_json_logged, DurableStore, ALERT_RULES_KEY};
use crate::service::notification_center::NotificationCenter;
use crate::service::registry::LocationRegistry;
use crate::time::derive::zoned;
use chrono::{DateTime, NaiveTime, Timelike, Utc};
use log::{debug, info};

const MODULE: &str = "alerts";
const ALERT_ICON: &str = "/placeholder.svg";

pub struct AlertScheduler<S: DurableStore> {
    store: S,
    rules: Vec<AlertRule>,
}

impl<S: DurableStore> AlertScheduler<S> {
    pub fn open(store: S) -> Self {
        let rules = read_json_or_default(&store, ALERT_RULES_KEY, MODULE);
        Self { store, rules }
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Adds an enabled rule for a registry location (matched by catalog or
    /// display name). Returns `None` when the location is not registered.
    pub fn add_rule(
        &mut self,
        registry: &LocationRegistry,
        location: &str,
        target_time: NaiveTime,
        message: impl Into<String>,
    ) -> Option<AlertRuleId> {
        let Some(entry) = registry.find_by_name(location) else {
            debug!("event=alert_add module={MODULE} status=skip reason=unknown_location");
            return None;
        };
        let rule = AlertRule::new(entry.name.clone(), entry.time_zone, target_time, message);
        let id = rule.id;
        self.rules.push(rule);
        self.persist();
        info!("event=alert_add module={MODULE} status=ok count={}", self.rules.len());
        Some(id)
    }

    pub fn toggle(&mut self, id: AlertRuleId) -> bool {
        let Some(rule) = self.rules.iter_mut().find(|rule| rule.id == id) else {
            return false;
        };
        rule.enabled = !rule.enabled;
        self.persist();
        true
    }

    pub fn delete(&mut self, id: AlertRuleId) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id != id);
        if self.rules.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Fires every enabled rule whose local `HH:MM` is now.
    ///
    /// Returns how many notifications were added.
    pub fn evaluate<T: DurableStore>(
        &mut self,
        now: DateTime<Utc>,
        center: &mut NotificationCenter<T>,
    ) -> usize {
        let mut fired = 0;
        for rule in self.rules.iter_mut().filter(|rule| rule.enabled) {
            let local = zoned(now, rule.time_zone);
            if local.hour() != rule.target_time.hour() || local.minute() != rule.target_time.minute() {
                continue;
            }
            let today = local.date_naive();
            if rule.last_fired == Some(today) {
                continue;
            }
            rule.last_fired = Some(today);

            center.add(
                NewNotification::new(format!("Time Alert: {}", rule.location), rule.message.clone())
                    .with_kind(NotificationKind::Info)
                    .with_icon(ALERT_ICON),
                now,
            );
            fired += 1;
        }

        if fired > 0 {
            self.persist();
            info!("event=alert_fire module={MODULE} status=ok fired={fired}");
        }
        fired
    }

    fn persist(&self) {
        write_json_logged(&self.store, ALERT_RULES_KEY, &self.rules, MODULE);
    }
}
