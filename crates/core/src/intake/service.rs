//! Intake service - daily goal and drink history
//!
//! History belongs to one calendar day. The first load (or log) on a new day
//! clears it; the day marker is what tells the two apart across restarts.

use std::sync::Arc;

use chrono::{NaiveDate, Timelike};
use tracing::{debug, info, warn};
use uuid::Uuid;
use watertime_domain::constants::{DAY_TOKEN_FORMAT, GOAL_KEY, HISTORY_KEY, LAST_DAY_KEY};
use watertime_domain::{parse_positive, IntakeEntry, IntakeProgress, Result, WaterTimeError};

use crate::clock_ports::Clock;
use crate::storage_ports::KeyValueStore;

/// A drink that was just recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedIntake {
    pub entry: IntakeEntry,
    pub progress: IntakeProgress,
    /// True exactly once per day, on the drink that first meets the goal.
    pub goal_just_reached: bool,
}

/// Daily goal and consumption log for the current day.
pub struct IntakeService {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    goal_ml: Option<u32>,
    history: Vec<IntakeEntry>,
    day: Option<NaiveDate>,
    goal_latched: bool,
}

impl IntakeService {
    /// Empty service; call `load_and_reset_if_needed` before use.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock, goal_ml: None, history: Vec::new(), day: None, goal_latched: false }
    }

    /// Newest first.
    pub fn history(&self) -> &[IntakeEntry] {
        &self.history
    }

    /// Daily goal in ml, if set.
    pub fn goal(&self) -> Option<u32> {
        self.goal_ml
    }

    /// Total logged today.
    pub fn consumed_ml(&self) -> u32 {
        self.history.iter().map(|entry| entry.amount_ml).fold(0, u32::saturating_add)
    }

    /// Today's total against the goal.
    pub fn progress(&self) -> IntakeProgress {
        IntakeProgress::new(self.consumed_ml(), self.goal_ml)
    }

    /// Load goal and history, clearing the history when the stored day marker
    /// belongs to an earlier day. Returns whether a reset happened.
    pub async fn load_and_reset_if_needed(&mut self) -> Result<bool> {
        self.goal_ml = self.read(GOAL_KEY).await.and_then(|raw| parse_positive(&raw).ok());
        self.history = match self.read(HISTORY_KEY).await {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "Persisted intake history is not valid; starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let today = self.clock.today();
        let marker = self.read(LAST_DAY_KEY).await;
        let reset = marker.is_some_and(|day| day != day_token(today));
        if reset {
            info!(%today, "New day; clearing intake history");
            self.history.clear();
            self.persist_history().await?;
        }

        self.day = Some(today);
        self.store.set(LAST_DAY_KEY, day_token(today)).await?;
        self.goal_latched = self.progress().goal_reached();
        Ok(reset)
    }

    /// Set the daily goal from raw text. `Ok(None)` when the text is not a
    /// positive whole number.
    pub async fn set_goal(&mut self, text: &str) -> Result<Option<u32>> {
        let goal = match parse_positive(text) {
            Ok(goal) => goal,
            Err(err) => {
                debug!(input = text, error = %err, "Rejected goal input");
                return Ok(None);
            }
        };

        self.store.set(GOAL_KEY, goal.to_string()).await?;
        self.goal_ml = Some(goal);
        self.goal_latched = self.progress().goal_reached();
        info!(goal_ml = goal, "Daily goal set");
        Ok(Some(goal))
    }

    /// Clear the daily goal.
    pub async fn reset_goal(&mut self) -> Result<()> {
        self.store.remove(GOAL_KEY).await?;
        self.goal_ml = None;
        self.goal_latched = false;
        Ok(())
    }

    /// Record a drink. `Ok(None)` for a zero amount.
    pub async fn log_intake(&mut self, amount_ml: u32) -> Result<Option<LoggedIntake>> {
        if amount_ml == 0 {
            return Ok(None);
        }
        self.roll_over_if_needed().await?;

        let now = self.clock.now();
        let entry = IntakeEntry {
            id: Uuid::now_v7().to_string(),
            amount_ml,
            time: format!("{}:{:02}", now.hour(), now.minute()),
        };
        self.history.insert(0, entry.clone());
        self.persist_history().await?;

        let progress = self.progress();
        let goal_just_reached = progress.goal_reached() && !self.goal_latched;
        if goal_just_reached {
            self.goal_latched = true;
            info!(consumed_ml = progress.consumed_ml, "Daily goal reached");
        }
        Ok(Some(LoggedIntake { entry, progress, goal_just_reached }))
    }

    async fn roll_over_if_needed(&mut self) -> Result<()> {
        let today = self.clock.today();
        if self.day == Some(today) {
            return Ok(());
        }
        if self.day.is_some() {
            info!(%today, "Day changed; clearing intake history");
            self.history.clear();
            self.goal_latched = false;
            self.persist_history().await?;
        }
        self.day = Some(today);
        self.store.set(LAST_DAY_KEY, day_token(today)).await
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, key, "Failed to read intake state; treating as absent");
                None
            }
        }
    }

    async fn persist_history(&self) -> Result<()> {
        let json = serde_json::to_string(&self.history)
            .map_err(|err| WaterTimeError::Internal(format!("encode intake history: {err}")))?;
        self.store.set(HISTORY_KEY, json).await
    }
}

fn day_token(day: NaiveDate) -> String {
    day.format(DAY_TOKEN_FORMAT).to_string()
}
