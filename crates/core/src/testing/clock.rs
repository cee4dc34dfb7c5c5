use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

use crate::clock_ports::Clock;

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    /// Clock set to `date` at `hour:minute:00`. Out-of-range components fall
    /// back to midnight.
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        Self::new(date.and_hms_opt(hour, minute, 0).unwrap_or_default())
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}
