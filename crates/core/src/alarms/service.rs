//! Alarm service - user-facing alarm operations
//!
//! Owns the [`AlarmStore`] exclusively and is driven from a single logical
//! thread. Suspension only happens at the scheduler and key-value boundaries,
//! and each of those is awaited before the next state change.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use watertime_domain::constants::{AUTO_HOURLY_FLAG_KEY, AUTO_HOURLY_INTERVAL_MINUTES};
use watertime_domain::{
    fixed_hourly_rules, parse_interval, parse_time_of_day, AlarmConfig, AlarmId, AlarmRule,
    AlarmSchedule, Result, TimeRuleError, WaterTimeError,
};

use super::ports::AlarmScheduler;
use super::reconciler::{reconcile, ReconcileReport};
use super::store::{AlarmStore, LoadOrigin};
use crate::storage_ports::KeyValueStore;

/// Result of a user-initiated alarm mutation.
///
/// Only infrastructure failures surface as `Err`; everything the user can
/// correct is reported here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The change was applied; carries the rule as it now stands.
    Applied(AlarmRule),
    /// The rule was removed.
    Removed(AlarmRule),
    /// Input text failed validation; nothing changed.
    Invalid(TimeRuleError),
    /// A daily rule with this label already exists; nothing changed.
    Duplicate(String),
    /// The platform refused to schedule; the rule was not created or stays
    /// inactive.
    PermissionDenied,
    /// No rule has this id.
    NotFound(AlarmId),
}

/// Alarm operations over one store and one platform scheduler.
pub struct AlarmService {
    store: AlarmStore,
    scheduler: Arc<dyn AlarmScheduler>,
    flags: Arc<dyn KeyValueStore>,
    config: AlarmConfig,
}

impl AlarmService {
    /// Service over `store`, which also holds the one-time flags.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        scheduler: Arc<dyn AlarmScheduler>,
        config: AlarmConfig,
    ) -> Self {
        Self { store: AlarmStore::new(store.clone()), scheduler, flags: store, config }
    }

    /// Current list, newest first.
    pub fn rules(&self) -> &[AlarmRule] {
        self.store.rules()
    }

    /// Rule with `id`, if any.
    pub fn get(&self, id: &AlarmId) -> Option<&AlarmRule> {
        self.store.get(id)
    }

    /// Load (or seed) the alarm list and bring the platform in line with it.
    ///
    /// Runs once at startup.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<LoadOrigin> {
        let defaults = if self.config.seed_fixed_hourly {
            fixed_hourly_rules(self.config.fixed_start_hour, self.config.fixed_end_hour)
        } else {
            Vec::new()
        };

        let origin = self.store.load_or_initialize(defaults).await?;
        if origin == LoadOrigin::Seeded && !self.is_reconciled() {
            self.schedule_seeded().await?;
        }

        if self.config.auto_hourly_reminder {
            self.ensure_auto_hourly_reminder().await?;
        }

        self.reconcile();
        info!(?origin, count = self.rules().len(), "Alarm service started");
        Ok(origin)
    }

    /// Add an interval reminder from raw minutes text.
    pub async fn add_interval(&mut self, text: &str) -> Result<MutationOutcome> {
        let schedule = match parse_interval(text).and_then(AlarmSchedule::every) {
            Ok(schedule) => schedule,
            Err(err) => {
                debug!(input = text, error = %err, "Rejected interval input");
                return Ok(MutationOutcome::Invalid(err));
            }
        };
        self.create(schedule).await
    }

    /// Add a daily reminder from raw `HH:MM` text.
    pub async fn add_specific_time(&mut self, text: &str) -> Result<MutationOutcome> {
        let time = match parse_time_of_day(text) {
            Ok(time) => time,
            Err(err) => {
                debug!(input = text, error = %err, "Rejected time-of-day input");
                return Ok(MutationOutcome::Invalid(err));
            }
        };

        let label = time.label();
        if self.store.contains_label(&label) {
            debug!(%label, "Daily alarm already exists");
            return Ok(MutationOutcome::Duplicate(label));
        }
        self.create(AlarmSchedule::daily_at(time)).await
    }

    /// Flip a rule between active and inactive.
    pub async fn toggle(&mut self, id: &AlarmId) -> Result<MutationOutcome> {
        match self.store.get(id) {
            Some(rule) => {
                let target = !rule.active;
                self.set_active(id, target).await
            }
            None => Ok(MutationOutcome::NotFound(id.clone())),
        }
    }

    /// Make a rule active or inactive.
    ///
    /// Turning off revokes the schedule before the new state is persisted.
    /// Turning on schedules first; on a native platform the rule takes the
    /// identifier the service issues.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn set_active(&mut self, id: &AlarmId, active: bool) -> Result<MutationOutcome> {
        let Some(rule) = self.store.get(id).cloned() else {
            return Ok(MutationOutcome::NotFound(id.clone()));
        };
        if rule.active == active {
            return Ok(MutationOutcome::Applied(rule));
        }

        let updated = if active {
            let Some(new_id) = self.activate(&rule).await? else {
                info!("Scheduling refused; alarm stays inactive");
                return Ok(MutationOutcome::PermissionDenied);
            };
            let replacement = (new_id != rule.id).then_some(new_id);
            match self.store.set_active(id, true, replacement.clone()).await {
                Err(err) if is_rejection(&err) => {
                    if let Some(new_id) = &replacement {
                        self.scheduler.cancel(new_id).await;
                    }
                    return Err(err);
                }
                result => result?,
            }
        } else {
            self.scheduler.cancel(id).await;
            self.store.set_active(id, false, None).await?
        };

        self.reconcile();
        Ok(updated.map_or_else(|| MutationOutcome::NotFound(id.clone()), MutationOutcome::Applied))
    }

    /// Remove a rule, revoking its schedule first when it is active.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove(&mut self, id: &AlarmId) -> Result<MutationOutcome> {
        let removed = self.store.remove(id, self.scheduler.as_ref()).await?;
        self.reconcile();
        Ok(match removed {
            Some(rule) => MutationOutcome::Removed(rule),
            None => MutationOutcome::NotFound(id.clone()),
        })
    }

    /// Replace the whole list with the fixed hourly rules.
    ///
    /// Every active schedule is revoked first. If the platform fails partway
    /// through scheduling the defaults, the schedules issued so far are
    /// revoked too and the old list is kept with every rule inactive.
    pub async fn restore_defaults(&mut self) -> Result<()> {
        let active: Vec<AlarmId> =
            self.rules().iter().filter(|rule| rule.active).map(|rule| rule.id.clone()).collect();
        for id in &active {
            self.scheduler.cancel(id).await;
        }

        let mut defaults =
            fixed_hourly_rules(self.config.fixed_start_hour, self.config.fixed_end_hour);
        if !self.is_reconciled() {
            if let Err(err) = self.schedule_all(&mut defaults).await {
                self.deactivate_all().await;
                return Err(err);
            }
        }

        self.store.replace_all(defaults).await?;
        self.reconcile();
        info!(revoked = active.len(), count = self.rules().len(), "Restored default alarms");
        Ok(())
    }

    /// Create the automatic 60-minute reminder, at most once ever.
    ///
    /// Returns whether a rule was created. A permission denial leaves the
    /// one-time flag unset so the next start tries again.
    pub async fn ensure_auto_hourly_reminder(&mut self) -> Result<bool> {
        match self.flags.get(AUTO_HOURLY_FLAG_KEY).await {
            Ok(Some(flag)) if flag == "true" => return Ok(false),
            Ok(_) => {}
            Err(err) => warn!(error = %err, "Failed to read auto reminder flag; treating as unset"),
        }

        let schedule = AlarmSchedule::every(AUTO_HOURLY_INTERVAL_MINUTES)
            .map_err(|err| WaterTimeError::Internal(err.to_string()))?;
        match self.create(schedule).await? {
            MutationOutcome::Applied(rule) => {
                self.flags.set(AUTO_HOURLY_FLAG_KEY, "true".to_string()).await?;
                info!(id = %rule.id, "Created automatic hourly reminder");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Cancel every in-process timer. Safe to call repeatedly.
    pub fn teardown(&self) {
        self.scheduler.teardown();
    }

    /// Run a reconciliation pass when the scheduler keeps live timers.
    pub fn reconcile(&self) -> Option<ReconcileReport> {
        self.scheduler.live_timers().map(|timers| reconcile(timers, self.store.rules()))
    }

    async fn create(&mut self, schedule: AlarmSchedule) -> Result<MutationOutcome> {
        let draft = AlarmRule::new(AlarmId::generate(), schedule);
        let Some(id) = self.activate(&draft).await? else {
            info!(label = %draft.label(), "Scheduling refused; alarm not created");
            return Ok(MutationOutcome::PermissionDenied);
        };

        let rule = AlarmRule { id, ..draft };
        if let Err(err) = self.store.add(rule.clone()).await {
            if is_rejection(&err) && !self.is_reconciled() {
                self.scheduler.cancel(&rule.id).await;
            }
            return Err(err);
        }

        self.reconcile();
        info!(id = %rule.id, label = %rule.label(), "Alarm created");
        Ok(MutationOutcome::Applied(rule))
    }

    /// Identifier an activated rule will carry, or `None` when refused.
    ///
    /// Reconciled schedulers keep the local id and get their timer from the
    /// next reconciliation pass; delegated schedulers are asked directly.
    async fn activate(&self, rule: &AlarmRule) -> Result<Option<AlarmId>> {
        if self.is_reconciled() {
            Ok(Some(rule.id.clone()))
        } else {
            self.scheduler.schedule(rule).await
        }
    }

    async fn schedule_seeded(&mut self) -> Result<()> {
        let mut seeded = self.rules().to_vec();
        if let Err(err) = self.schedule_all(&mut seeded).await {
            self.deactivate_all().await;
            return Err(err);
        }
        self.store.replace_all(seeded).await
    }

    /// Schedule every active rule in place, taking the issued ids.
    ///
    /// Refused rules are marked inactive. On the first failure, everything
    /// this call scheduled is revoked before the error is returned.
    async fn schedule_all(&self, rules: &mut [AlarmRule]) -> Result<()> {
        let mut issued: Vec<AlarmId> = Vec::new();
        for rule in rules.iter_mut().filter(|rule| rule.active) {
            match self.scheduler.schedule(rule).await {
                Ok(Some(id)) => {
                    issued.push(id.clone());
                    rule.id = id;
                }
                Ok(None) => {
                    warn!(label = %rule.label(), "Scheduling refused; alarm left inactive");
                    rule.active = false;
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        issued = issued.len(),
                        "Scheduling failed; revoking issued schedules"
                    );
                    for id in &issued {
                        self.scheduler.cancel(id).await;
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Persist the current list with every rule inactive.
    ///
    /// Used after the platform schedules were revoked on a failure path; a
    /// write error here is logged so the original failure is what surfaces.
    async fn deactivate_all(&mut self) {
        let rules: Vec<AlarmRule> = self
            .rules()
            .iter()
            .cloned()
            .map(|rule| AlarmRule { active: false, ..rule })
            .collect();
        if let Err(err) = self.store.replace_all(rules).await {
            warn!(error = %err, "Failed to persist deactivated alarm list");
        }
    }

    fn is_reconciled(&self) -> bool {
        self.scheduler.live_timers().is_some()
    }
}

/// The store refused the change itself, as opposed to failing to persist it.
fn is_rejection(err: &WaterTimeError) -> bool {
    matches!(err, WaterTimeError::InvalidInput(_))
}
