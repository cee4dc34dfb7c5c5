//! Shared fixtures for infra integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use watertime_core::testing::{FixedClock, RecordingPresenter};
use watertime_infra::SimulatedScheduler;

/// Simulated scheduler wired to a fixed clock and a recording presenter.
pub struct SimulatedHarness {
    pub scheduler: Arc<SimulatedScheduler>,
    pub clock: FixedClock,
    pub presenter: RecordingPresenter,
}

impl SimulatedHarness {
    /// Must be called from inside a tokio runtime.
    pub fn at(hour: u32, minute: u32) -> Self {
        let clock = FixedClock::at(day(1), hour, minute);
        let presenter = RecordingPresenter::new();
        let scheduler = SimulatedScheduler::new(Arc::new(clock.clone()), Arc::new(presenter.clone()))
            .expect("tests run inside a tokio runtime");
        Self { scheduler: Arc::new(scheduler), clock, presenter }
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).expect("valid test date")
}

pub const fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

pub const fn hours(n: u64) -> Duration {
    Duration::from_secs(n * 3600)
}
