use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use watertime_domain::{AlarmId, AlarmRule, Result};

use super::Journal;
use crate::alarms::ports::{AlarmScheduler, LiveTimers};

/// Reconciled scheduler whose "timers" are just a set of ids.
///
/// Journals `arm <id>`, `disarm <id>`, `cancel <id>` and `teardown`.
#[derive(Debug, Default)]
pub struct InMemoryTimers {
    live: Mutex<HashSet<AlarmId>>,
    calls: AtomicUsize,
    journal: Journal,
}

impl InMemoryTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self { journal, ..Self::default() }
    }

    /// Number of arm/disarm calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_live(&self, id: &AlarmId) -> bool {
        self.live.lock().contains(id)
    }
}

impl LiveTimers for InMemoryTimers {
    fn live_ids(&self) -> HashSet<AlarmId> {
        self.live.lock().clone()
    }

    fn arm(&self, rule: &AlarmRule) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.record(format!("arm {}", rule.id));
        self.live.lock().insert(rule.id.clone());
    }

    fn disarm(&self, id: &AlarmId) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.record(format!("disarm {id}"));
        self.live.lock().remove(id)
    }
}

#[async_trait]
impl AlarmScheduler for InMemoryTimers {
    async fn schedule(&self, rule: &AlarmRule) -> Result<Option<AlarmId>> {
        self.arm(rule);
        Ok(Some(rule.id.clone()))
    }

    async fn cancel(&self, id: &AlarmId) {
        self.journal.record(format!("cancel {id}"));
        self.live.lock().remove(id);
    }

    fn live_timers(&self) -> Option<&dyn LiveTimers> {
        Some(self)
    }

    fn teardown(&self) {
        self.journal.record("teardown");
        self.live.lock().clear();
    }
}
