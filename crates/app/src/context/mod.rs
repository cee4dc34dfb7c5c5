//! Application context - dependency injection container

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use watertime_core::{AlarmScheduler, AlarmService, Clock, IntakeService, KeyValueStore};
use watertime_domain::{Config, Result};
use watertime_infra::{select_scheduler, JsonFileStore, PlatformCapability, SystemClock};

use crate::presenter::{ChannelRingPresenter, Ring};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub alarms: AlarmService,
    pub intake: IntakeService,
    scheduler: Arc<dyn AlarmScheduler>,
}

impl AppContext {
    /// Build the production context: JSON file store, local clock, and the
    /// scheduler the host platform supports.
    ///
    /// A desktop terminal has no OS notification service, so reminders run
    /// on in-process timers. Returns the receiver fired reminders arrive on.
    ///
    /// # Errors
    /// Fails when called outside a tokio runtime.
    pub fn new_with_config(config: Config) -> Result<(Self, UnboundedReceiver<Ring>)> {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&config.storage.path));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let (presenter, rings) = ChannelRingPresenter::new();

        let scheduler =
            select_scheduler(PlatformCapability::InProcess, clock.clone(), Arc::new(presenter))?;

        info!(path = %config.storage.path, "Application context created");
        Ok((Self::with_parts(config, store, clock, scheduler), rings))
    }

    /// Assemble a context from explicit collaborators.
    pub fn with_parts(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn AlarmScheduler>,
    ) -> Self {
        let alarms = AlarmService::new(store.clone(), scheduler.clone(), config.alarms.clone());
        let intake = IntakeService::new(store, clock);
        Self { config, alarms, intake, scheduler }
    }

    /// Load persisted state and arm reminders.
    pub async fn start(&mut self) -> Result<()> {
        let origin = self.alarms.start().await?;
        let reset = self.intake.load_and_reset_if_needed().await?;
        info!(?origin, intake_reset = reset, "Application started");
        Ok(())
    }

    /// Stop every in-process timer. Safe to call more than once.
    pub fn shutdown(&self) {
        self.scheduler.teardown();
        info!("Application shut down");
    }
}
