//! Scheduling delegated to the host's notification service.
//!
//! The OS holds the schedule, so reminders fire even while the process is
//! suspended. Every successful schedule yields a fresh service identifier,
//! which becomes the rule's id.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use watertime_core::{AlarmScheduler, NotificationContent, NotificationService};
use watertime_domain::{AlarmId, AlarmRule, AlarmSchedule, Result};

use crate::scheduling::error::SchedulerError;

/// Scheduler backed by an OS-level [`NotificationService`].
pub struct NativeScheduler {
    notifications: Arc<dyn NotificationService>,
}

impl NativeScheduler {
    /// Wrap the host notification service.
    pub fn new(notifications: Arc<dyn NotificationService>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl AlarmScheduler for NativeScheduler {
    #[instrument(skip(self, rule), fields(id = %rule.id, label = %rule.label()))]
    async fn schedule(&self, rule: &AlarmRule) -> Result<Option<AlarmId>> {
        if !self.notifications.request_permission().await? {
            info!("Notification permission denied");
            return Ok(None);
        }

        let content = NotificationContent::for_schedule(&rule.schedule);
        let issued = match rule.schedule {
            AlarmSchedule::Interval { minutes } => {
                let seconds = u64::from(minutes.get()) * 60;
                self.notifications.schedule_interval(content, seconds, true).await?
            }
            AlarmSchedule::SpecificTime(time) => {
                self.notifications
                    .schedule_daily_at(content, time.hour(), time.minute(), true)
                    .await?
            }
        };

        if issued.trim().is_empty() {
            return Err(SchedulerError::Notification(
                "service returned an empty identifier".to_string(),
            )
            .into());
        }

        debug!(service_id = %issued, "Scheduled notification");
        Ok(Some(AlarmId::new(issued)))
    }

    async fn cancel(&self, id: &AlarmId) {
        if let Err(err) = self.notifications.cancel(id.as_str()).await {
            warn!(%id, error = %err, "Failed to cancel notification; ignoring");
        }
    }
}
