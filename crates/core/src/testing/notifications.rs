use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use watertime_domain::{Result, WaterTimeError};

use super::Journal;
use crate::alarms::ports::{NotificationContent, NotificationService};

/// Trigger a notification was scheduled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedTrigger {
    Interval { seconds: u64, repeats: bool },
    Daily { hour: u8, minute: u8, repeats: bool },
}

/// Notification service double with scriptable permission and failures.
///
/// Issues ids `notif-1`, `notif-2`, ... and journals `permission`,
/// `schedule <id>`, `schedule failed` and `cancel <id>`.
#[derive(Debug)]
pub struct ScriptedNotificationService {
    granted: AtomicBool,
    fail_cancel: AtomicBool,
    fail_schedule_from: AtomicUsize,
    schedule_calls: AtomicUsize,
    next_id: AtomicUsize,
    pending: Mutex<HashMap<String, (NotificationContent, ScriptedTrigger)>>,
    journal: Journal,
}

impl Default for ScriptedNotificationService {
    fn default() -> Self {
        Self {
            granted: AtomicBool::new(true),
            fail_cancel: AtomicBool::new(false),
            fail_schedule_from: AtomicUsize::new(0),
            schedule_calls: AtomicUsize::new(0),
            next_id: AtomicUsize::new(0),
            pending: Mutex::new(HashMap::new()),
            journal: Journal::new(),
        }
    }
}

impl ScriptedNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self { journal, ..Self::default() }
    }

    pub fn grant(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    /// Make every `cancel` return an error.
    pub fn fail_cancel(&self, fail: bool) {
        self.fail_cancel.store(fail, Ordering::SeqCst);
    }

    /// Make the `call`-th schedule request (counting from 1) and every later
    /// one fail. Zero turns failures off.
    pub fn fail_schedule_from(&self, call: usize) {
        self.fail_schedule_from.store(call, Ordering::SeqCst);
    }

    /// Ids of notifications scheduled and not yet cancelled.
    pub fn pending_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.pending.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn pending(&self, id: &str) -> Option<(NotificationContent, ScriptedTrigger)> {
        self.pending.lock().get(id).cloned()
    }

    fn issue(&self, content: NotificationContent, trigger: ScriptedTrigger) -> Result<String> {
        let call = self.schedule_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let fail_from = self.fail_schedule_from.load(Ordering::SeqCst);
        if fail_from != 0 && call >= fail_from {
            self.journal.record("schedule failed");
            return Err(WaterTimeError::Platform(format!("schedule request {call} failed")));
        }

        let id = format!("notif-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.journal.record(format!("schedule {id}"));
        self.pending.lock().insert(id.clone(), (content, trigger));
        Ok(id)
    }
}

#[async_trait]
impl NotificationService for ScriptedNotificationService {
    async fn request_permission(&self) -> Result<bool> {
        self.journal.record("permission");
        Ok(self.granted.load(Ordering::SeqCst))
    }

    async fn schedule_interval(
        &self,
        content: NotificationContent,
        seconds: u64,
        repeats: bool,
    ) -> Result<String> {
        self.issue(content, ScriptedTrigger::Interval { seconds, repeats })
    }

    async fn schedule_daily_at(
        &self,
        content: NotificationContent,
        hour: u8,
        minute: u8,
        repeats: bool,
    ) -> Result<String> {
        self.issue(content, ScriptedTrigger::Daily { hour, minute, repeats })
    }

    async fn cancel(&self, id: &str) -> Result<()> {
        self.journal.record(format!("cancel {id}"));
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(WaterTimeError::Platform(format!("cannot cancel {id}")));
        }
        self.pending.lock().remove(id);
        Ok(())
    }
}
