//! Port interfaces for alarm scheduling
//!
//! These traits define the boundaries between the alarm core and the host
//! platform. The Alarm Store and the Reconciler only ever see
//! [`AlarmScheduler`] and [`LiveTimers`].

use std::collections::HashSet;

use async_trait::async_trait;
use watertime_domain::constants::REMINDER_TITLE;
use watertime_domain::{AlarmId, AlarmRule, AlarmSchedule, Result};

/// Title and body of a reminder, both for OS notifications and for rings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    /// Reminder title and the body for `schedule`.
    pub fn for_schedule(schedule: &AlarmSchedule) -> Self {
        Self { title: REMINDER_TITLE.to_string(), body: schedule.notification_body() }
    }
}

/// OS-level notification service supplied by a native host.
///
/// Identifiers are issued by the service and are opaque to the core.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Ask the user for permission to post notifications.
    async fn request_permission(&self) -> Result<bool>;

    /// Schedule a notification every `seconds` seconds.
    async fn schedule_interval(
        &self,
        content: NotificationContent,
        seconds: u64,
        repeats: bool,
    ) -> Result<String>;

    /// Schedule a notification daily at a local wall-clock time.
    async fn schedule_daily_at(
        &self,
        content: NotificationContent,
        hour: u8,
        minute: u8,
        repeats: bool,
    ) -> Result<String>;

    /// Cancel a scheduled notification. Unknown ids must be accepted.
    async fn cancel(&self, id: &str) -> Result<()>;
}

/// Sink for fired reminders. The core never waits on it.
pub trait RingPresenter: Send + Sync {
    fn on_fire(&self, title: &str, body: &str);
}

/// Process-local timer set kept by schedulers that cannot rely on the OS.
///
/// All operations are synchronous; arming a timer never suspends.
pub trait LiveTimers: Send + Sync {
    /// Ids that currently have a running timer.
    fn live_ids(&self) -> HashSet<AlarmId>;

    /// Start a timer for `rule`, replacing any timer already keyed by its id.
    fn arm(&self, rule: &AlarmRule);

    /// Stop the timer keyed by `id`. Returns whether one was running.
    fn disarm(&self, id: &AlarmId) -> bool;
}

/// Platform scheduling capability.
#[async_trait]
pub trait AlarmScheduler: Send + Sync {
    /// Schedule `rule` and return the identifier it is now known by.
    ///
    /// `Ok(None)` means the platform refused (permission denied); the caller
    /// must not mark the rule active.
    async fn schedule(&self, rule: &AlarmRule) -> Result<Option<AlarmId>>;

    /// Best-effort cancellation. Unknown or already-fired ids are a no-op.
    async fn cancel(&self, id: &AlarmId);

    /// Live timer set for schedulers that need a reconciliation pass after
    /// every alarm list change. `None` when the platform already holds the
    /// schedule.
    fn live_timers(&self) -> Option<&dyn LiveTimers> {
        None
    }

    /// Release everything the scheduler holds in-process. Idempotent.
    fn teardown(&self) {}
}
