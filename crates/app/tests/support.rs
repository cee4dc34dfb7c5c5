//! Shared fixtures for command tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use watertime_core::testing::{FixedClock, InMemoryTimers, MemoryStore};
use watertime_domain::{AlarmConfig, Config};
use watertime_lib::{execute, AppContext, Command, Reply};

/// Context over in-memory collaborators, with handles for assertions.
pub struct TestApp {
    pub ctx: AppContext,
    pub store: Arc<MemoryStore>,
    pub timers: Arc<InMemoryTimers>,
    pub clock: FixedClock,
}

impl TestApp {
    /// Started context without seeded alarms, at 2024-03-01 09:00.
    pub async fn started() -> Self {
        let config = Config {
            alarms: AlarmConfig { seed_fixed_hourly: false, ..AlarmConfig::default() },
            ..Config::default()
        };
        Self::started_with(config).await
    }

    pub async fn started_with(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let timers = Arc::new(InMemoryTimers::new());
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid test date");
        let clock = FixedClock::at(date, 9, 0);

        let mut ctx =
            AppContext::with_parts(config, store.clone(), Arc::new(clock.clone()), timers.clone());
        ctx.start().await.expect("context should start");
        Self { ctx, store, timers, clock }
    }

    /// Parse and run one line, returning the rendered text.
    pub async fn run(&mut self, line: &str) -> String {
        let command = Command::parse(line).expect("line should parse").expect("line is not blank");
        match execute(&mut self.ctx, command).await.expect("command should not fail") {
            Reply::Text(text) => text,
            Reply::Quit => "<quit>".to_string(),
        }
    }
}
