//! Alarm Store - canonical, persisted alarm list
//!
//! Newest rules come first. Every mutation writes the complete list back to
//! the key-value store; there is no debouncing and no partial write, so the
//! persisted value is always a full snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use watertime_domain::constants::ALARMS_KEY;
use watertime_domain::{decode_alarm_list, AlarmId, AlarmRule, Result, WaterTimeError};

use super::ports::AlarmScheduler;
use crate::storage_ports::KeyValueStore;

/// Where the in-memory list came from at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// A persisted list existed and was used verbatim.
    Persisted,
    /// Nothing was persisted; the built-in rules were written.
    Seeded,
    /// Nothing was persisted and there were no built-in rules.
    Empty,
}

/// Single source of truth for the alarm list.
pub struct AlarmStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    rules: Vec<AlarmRule>,
}

impl AlarmStore {
    /// Create an empty store persisting under the default alarm key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, ALARMS_KEY)
    }

    /// Create an empty store persisting under a custom key.
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into(), rules: Vec::new() }
    }

    /// Current list, newest first.
    pub fn rules(&self) -> &[AlarmRule] {
        &self.rules
    }

    /// Rule with `id`, if any.
    pub fn get(&self, id: &AlarmId) -> Option<&AlarmRule> {
        self.rules.iter().find(|rule| &rule.id == id)
    }

    /// Whether any rule renders as `label`.
    pub fn contains_label(&self, label: &str) -> bool {
        self.rules.iter().any(|rule| rule.label() == label)
    }

    /// Read the persisted list, or fall back to `defaults` when there is none.
    ///
    /// A read failure, a missing key and an undecodable value are all treated
    /// as "no prior state". Seeded defaults are persisted immediately.
    pub async fn load_or_initialize(&mut self, defaults: Vec<AlarmRule>) -> Result<LoadOrigin> {
        if let Some(rules) = self.read_persisted().await {
            info!(count = rules.len(), "Loaded persisted alarm list");
            self.rules = rules;
            return Ok(LoadOrigin::Persisted);
        }

        if defaults.is_empty() {
            self.rules = Vec::new();
            return Ok(LoadOrigin::Empty);
        }

        info!(count = defaults.len(), "Seeding built-in alarm rules");
        self.rules = dedupe(defaults);
        self.persist().await?;
        Ok(LoadOrigin::Seeded)
    }

    /// Prepend a rule and persist.
    ///
    /// # Errors
    /// `InvalidInput` when the id is already in the list.
    pub async fn add(&mut self, rule: AlarmRule) -> Result<()> {
        if self.get(&rule.id).is_some() {
            return Err(WaterTimeError::InvalidInput(format!("duplicate alarm id {}", rule.id)));
        }
        debug!(id = %rule.id, label = %rule.label(), "Adding alarm");
        self.rules.insert(0, rule);
        self.persist().await
    }

    /// Remove a rule and persist.
    ///
    /// An active rule's schedule is revoked through `scheduler` before the
    /// record leaves the list, so no schedule can outlive its record.
    pub async fn remove(
        &mut self,
        id: &AlarmId,
        scheduler: &dyn AlarmScheduler,
    ) -> Result<Option<AlarmRule>> {
        let Some(position) = self.rules.iter().position(|rule| &rule.id == id) else {
            return Ok(None);
        };

        if self.rules[position].active {
            scheduler.cancel(id).await;
        }

        let removed = self.rules.remove(position);
        debug!(id = %removed.id, "Removed alarm");
        self.persist().await?;
        Ok(Some(removed))
    }

    /// Update `active` and optionally replace the id, then persist.
    ///
    /// Returns the updated rule, or `None` when `id` is unknown.
    ///
    /// # Errors
    /// `InvalidInput` when `new_id` already belongs to another rule.
    pub async fn set_active(
        &mut self,
        id: &AlarmId,
        active: bool,
        new_id: Option<AlarmId>,
    ) -> Result<Option<AlarmRule>> {
        if let Some(new_id) = new_id.as_ref().filter(|new_id| *new_id != id) {
            if self.get(new_id).is_some() {
                return Err(WaterTimeError::InvalidInput(format!("duplicate alarm id {new_id}")));
            }
        }

        let Some(rule) = self.rules.iter_mut().find(|rule| &rule.id == id) else {
            return Ok(None);
        };

        rule.active = active;
        if let Some(new_id) = new_id {
            rule.id = new_id;
        }
        let updated = rule.clone();
        debug!(id = %updated.id, active, "Updated alarm state");

        self.persist().await?;
        Ok(Some(updated))
    }

    /// Replace the whole list and persist.
    pub async fn replace_all(&mut self, rules: Vec<AlarmRule>) -> Result<()> {
        self.rules = dedupe(rules);
        self.persist().await
    }

    async fn read_persisted(&self) -> Option<Vec<AlarmRule>> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, key = %self.key, "Failed to read alarm list; starting fresh");
                return None;
            }
        };

        match decode_alarm_list(&raw) {
            Ok((rules, dropped)) => {
                if dropped > 0 {
                    warn!(dropped, "Dropped persisted alarms without a usable schedule");
                }
                Some(dedupe(rules))
            }
            Err(err) => {
                warn!(error = %err, key = %self.key, "Persisted alarm list is not valid JSON");
                None
            }
        }
    }

    async fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.rules)
            .map_err(|err| WaterTimeError::Internal(format!("encode alarm list: {err}")))?;
        self.store.set(&self.key, json).await
    }
}

/// Keep the first occurrence of every id.
fn dedupe(rules: Vec<AlarmRule>) -> Vec<AlarmRule> {
    let mut seen = HashSet::new();
    let before = rules.len();
    let unique: Vec<AlarmRule> = rules.into_iter().filter(|rule| seen.insert(rule.id.clone())).collect();
    if unique.len() != before {
        warn!(dropped = before - unique.len(), "Dropped alarms with duplicate ids");
    }
    unique
}

#[cfg(test)]
mod tests {
    use watertime_domain::{fixed_hourly_rules, parse_time_of_day, AlarmSchedule};

    use super::*;
    use crate::testing::{InMemoryTimers, Journal, MemoryStore};

    fn interval_rule(id: &str, minutes: u32) -> AlarmRule {
        AlarmRule::new(AlarmId::new(id), AlarmSchedule::every(minutes).unwrap())
    }

    #[tokio::test]
    async fn add_prepends_and_persists_every_time() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = AlarmStore::new(kv.clone());

        store.add(interval_rule("a", 60)).await.unwrap();
        store.add(interval_rule("b", 30)).await.unwrap();

        let ids: Vec<&str> = store.rules().iter().map(|rule| rule.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(kv.write_count(ALARMS_KEY), 2);

        let (persisted, _) = decode_alarm_list(&kv.value(ALARMS_KEY).unwrap()).unwrap();
        assert_eq!(persisted, store.rules());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let mut store = AlarmStore::new(Arc::new(MemoryStore::new()));
        store.add(interval_rule("a", 60)).await.unwrap();

        let err = store.add(interval_rule("a", 15)).await.unwrap_err();
        assert!(matches!(err, WaterTimeError::InvalidInput(_)));
        assert_eq!(store.rules().len(), 1);
    }

    #[tokio::test]
    async fn load_round_trips_persisted_list() {
        let kv = Arc::new(MemoryStore::new());
        let mut writer = AlarmStore::new(kv.clone());
        writer.add(interval_rule("a", 60)).await.unwrap();
        let daily = AlarmRule::new(
            AlarmId::new("b"),
            AlarmSchedule::daily_at(parse_time_of_day("21:45").unwrap()),
        );
        writer.add(daily).await.unwrap();
        writer.set_active(&AlarmId::new("a"), false, None).await.unwrap();

        let mut reader = AlarmStore::new(kv);
        let origin = reader.load_or_initialize(fixed_hourly_rules(8, 20)).await.unwrap();

        assert_eq!(origin, LoadOrigin::Persisted);
        assert_eq!(reader.rules(), writer.rules());
    }

    #[tokio::test]
    async fn absent_list_seeds_defaults() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = AlarmStore::new(kv.clone());

        let origin = store.load_or_initialize(fixed_hourly_rules(8, 20)).await.unwrap();

        assert_eq!(origin, LoadOrigin::Seeded);
        assert_eq!(store.rules().len(), 13);
        assert!(kv.value(ALARMS_KEY).is_some());
    }

    #[tokio::test]
    async fn absent_list_without_defaults_stays_empty() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = AlarmStore::new(kv.clone());

        let origin = store.load_or_initialize(Vec::new()).await.unwrap();

        assert_eq!(origin, LoadOrigin::Empty);
        assert!(store.rules().is_empty());
        assert_eq!(kv.write_count(ALARMS_KEY), 0);
    }

    #[tokio::test]
    async fn read_failure_is_treated_as_absent() {
        let kv = Arc::new(MemoryStore::new());
        kv.insert(ALARMS_KEY, "[]");
        kv.fail_reads(true);
        let mut store = AlarmStore::new(kv);

        let origin = store.load_or_initialize(fixed_hourly_rules(9, 10)).await.unwrap();

        assert_eq!(origin, LoadOrigin::Seeded);
        assert_eq!(store.rules().len(), 2);
    }

    #[tokio::test]
    async fn corrupt_list_is_treated_as_absent() {
        let kv = Arc::new(MemoryStore::new());
        kv.insert(ALARMS_KEY, "{not json");
        let mut store = AlarmStore::new(kv);

        let origin = store.load_or_initialize(Vec::new()).await.unwrap();
        assert_eq!(origin, LoadOrigin::Empty);
    }

    #[tokio::test]
    async fn remove_revokes_before_persisting() {
        let journal = Journal::new();
        let kv = Arc::new(MemoryStore::with_journal(journal.clone()));
        let timers = InMemoryTimers::with_journal(journal.clone());
        let mut store = AlarmStore::new(kv);
        store.add(interval_rule("a", 60)).await.unwrap();
        journal.clear();

        let removed = store.remove(&AlarmId::new("a"), &timers).await.unwrap();

        assert!(removed.is_some());
        assert_eq!(journal.entries(), vec!["cancel a".to_string(), format!("set {ALARMS_KEY}")]);
    }

    #[tokio::test]
    async fn remove_inactive_rule_skips_revocation() {
        let journal = Journal::new();
        let timers = InMemoryTimers::with_journal(journal.clone());
        let mut store = AlarmStore::new(Arc::new(MemoryStore::new()));
        store.add(interval_rule("a", 60)).await.unwrap();
        store.set_active(&AlarmId::new("a"), false, None).await.unwrap();

        store.remove(&AlarmId::new("a"), &timers).await.unwrap();

        assert!(journal.entries().is_empty());
        assert!(store.rules().is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_id_is_a_noop() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = AlarmStore::new(kv.clone());

        let removed = store.remove(&AlarmId::new("ghost"), &InMemoryTimers::new()).await.unwrap();

        assert!(removed.is_none());
        assert_eq!(kv.write_count(ALARMS_KEY), 0);
    }

    #[tokio::test]
    async fn set_active_can_replace_id() {
        let mut store = AlarmStore::new(Arc::new(MemoryStore::new()));
        store.add(interval_rule("a", 60)).await.unwrap();
        store.add(interval_rule("b", 30)).await.unwrap();

        let updated = store
            .set_active(&AlarmId::new("a"), true, Some(AlarmId::new("a2")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, AlarmId::new("a2"));
        assert!(store.get(&AlarmId::new("a")).is_none());

        let clash = store.set_active(&AlarmId::new("a2"), true, Some(AlarmId::new("b"))).await;
        assert!(clash.is_err());
    }

    #[tokio::test]
    async fn write_failure_propagates() {
        let kv = Arc::new(MemoryStore::new());
        kv.fail_writes(true);
        let mut store = AlarmStore::new(kv);

        let result = store.add(interval_rule("a", 60)).await;
        assert!(matches!(result, Err(WaterTimeError::Storage(_))));
    }
}
