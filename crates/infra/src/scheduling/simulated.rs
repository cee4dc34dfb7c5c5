//! In-process alarm timers for hosts without a notification service.
//!
//! Every active rule is backed by one tokio task keyed by its [`AlarmId`].
//! Interval rules tick on a fixed period; daily rules run a small state
//! machine that sleeps until the next occurrence, rings, and computes a fresh
//! delay from the [`Clock`]. Timers only exist while the process runs and are
//! rebuilt from the persisted list by the reconciler after a restart.
//!
//! The timer map never leaves this type; callers reach it only through
//! [`LiveTimers`], [`AlarmScheduler::cancel`] and [`AlarmScheduler::teardown`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use watertime_core::{AlarmScheduler, Clock, LiveTimers, NotificationContent, RingPresenter};
use watertime_domain::{AlarmId, AlarmRule, AlarmSchedule, Result, TimeOfDay};

use crate::scheduling::error::SchedulerResult;

/// How a live timer re-arms itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fixed-period repetition.
    Repeating,
    /// One-shot sleep that is recomputed after every ring.
    Rearming,
}

struct LiveTimer {
    kind: TimerKind,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl LiveTimer {
    fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Daily timer state.
enum DailyState {
    Armed(Duration),
    Firing,
}

/// Scheduler that keeps timers inside the current process.
pub struct SimulatedScheduler {
    runtime: Handle,
    clock: Arc<dyn Clock>,
    presenter: Arc<dyn RingPresenter>,
    timers: Mutex<HashMap<AlarmId, LiveTimer>>,
}

impl SimulatedScheduler {
    /// Bind to the tokio runtime the caller is running on.
    ///
    /// # Errors
    /// `SchedulerError::NoRuntime` when called outside a runtime.
    pub fn new(clock: Arc<dyn Clock>, presenter: Arc<dyn RingPresenter>) -> SchedulerResult<Self> {
        Ok(Self::with_runtime(Handle::try_current()?, clock, presenter))
    }

    /// Spawn timers on an explicit runtime.
    pub fn with_runtime(
        runtime: Handle,
        clock: Arc<dyn Clock>,
        presenter: Arc<dyn RingPresenter>,
    ) -> Self {
        Self { runtime, clock, presenter, timers: Mutex::new(HashMap::new()) }
    }

    /// Kind of the live timer for `id`, if any.
    pub fn timer_kind(&self, id: &AlarmId) -> Option<TimerKind> {
        self.timers.lock().get(id).map(|timer| timer.kind)
    }

    /// Number of running timers.
    pub fn live_count(&self) -> usize {
        self.timers.lock().len()
    }

    fn spawn(&self, rule: &AlarmRule) -> LiveTimer {
        let cancel = CancellationToken::new();
        let content = NotificationContent::for_schedule(&rule.schedule);
        let presenter = self.presenter.clone();
        let id = rule.id.clone();

        match rule.schedule {
            AlarmSchedule::Interval { minutes } => {
                let period = Duration::from_secs(u64::from(minutes.get()) * 60);
                let task = self.runtime.spawn(run_repeating(
                    id,
                    period,
                    content,
                    presenter,
                    cancel.clone(),
                ));
                LiveTimer { kind: TimerKind::Repeating, cancel, task }
            }
            AlarmSchedule::SpecificTime(time) => {
                let first = time.delay_until_next(self.clock.now());
                let task = self.runtime.spawn(run_daily(
                    id,
                    time,
                    first,
                    self.clock.clone(),
                    content,
                    presenter,
                    cancel.clone(),
                ));
                LiveTimer { kind: TimerKind::Rearming, cancel, task }
            }
        }
    }
}

impl LiveTimers for SimulatedScheduler {
    fn live_ids(&self) -> HashSet<AlarmId> {
        self.timers.lock().keys().cloned().collect()
    }

    fn arm(&self, rule: &AlarmRule) {
        let timer = self.spawn(rule);
        debug!(id = %rule.id, kind = ?timer.kind, "Armed live timer");
        if let Some(previous) = self.timers.lock().insert(rule.id.clone(), timer) {
            previous.stop();
        }
    }

    fn disarm(&self, id: &AlarmId) -> bool {
        let removed = self.timers.lock().remove(id);
        match removed {
            Some(timer) => {
                timer.stop();
                debug!(%id, "Disarmed live timer");
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AlarmScheduler for SimulatedScheduler {
    async fn schedule(&self, rule: &AlarmRule) -> Result<Option<AlarmId>> {
        self.arm(rule);
        Ok(Some(rule.id.clone()))
    }

    async fn cancel(&self, id: &AlarmId) {
        self.disarm(id);
    }

    fn live_timers(&self) -> Option<&dyn LiveTimers> {
        Some(self)
    }

    #[instrument(skip(self))]
    fn teardown(&self) {
        let drained: Vec<LiveTimer> = self.timers.lock().drain().map(|(_, timer)| timer).collect();
        if !drained.is_empty() {
            info!(count = drained.len(), "Stopped all live timers");
        }
        drained.into_iter().for_each(LiveTimer::stop);
    }
}

impl Drop for SimulatedScheduler {
    fn drop(&mut self) {
        for (_, timer) in self.timers.get_mut().drain() {
            timer.stop();
        }
    }
}

async fn run_repeating(
    id: AlarmId,
    period: Duration,
    content: NotificationContent,
    presenter: Arc<dyn RingPresenter>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => ring(&id, &content, presenter.as_ref()),
        }
    }
}

/// `first` is measured from the moment the rule was armed, not from the
/// task's first poll.
async fn run_daily(
    id: AlarmId,
    time: TimeOfDay,
    first: Duration,
    clock: Arc<dyn Clock>,
    content: NotificationContent,
    presenter: Arc<dyn RingPresenter>,
    cancel: CancellationToken,
) {
    let mut state = DailyState::Armed(first);

    loop {
        state = match state {
            DailyState::Armed(delay) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(delay) => DailyState::Firing,
                }
            }
            DailyState::Firing => {
                ring(&id, &content, presenter.as_ref());
                DailyState::Armed(time.delay_until_next(clock.now()))
            }
        };
    }
}

fn ring(id: &AlarmId, content: &NotificationContent, presenter: &dyn RingPresenter) {
    info!(%id, body = %content.body, "Alarm fired");
    presenter.on_fire(&content.title, &content.body);
}
