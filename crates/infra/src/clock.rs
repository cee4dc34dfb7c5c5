//! Local wall clock

use chrono::{Local, NaiveDateTime};
use watertime_core::Clock;

/// [`Clock`] reading the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
