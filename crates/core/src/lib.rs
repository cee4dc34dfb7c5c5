//! # WaterTime Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for persistence, the clock, notifications and timers
//! - The alarm store, the reconciler and the alarm service
//! - Daily intake tracking
//!
//! ## Architecture Principles
//! - Only depends on `watertime-domain`
//! - No file system, runtime or platform code
//! - All external dependencies via traits

pub mod alarms;
pub mod intake;

// Infrastructure ports
pub mod clock_ports;
pub mod storage_ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use alarms::ports::{
    AlarmScheduler, LiveTimers, NotificationContent, NotificationService, RingPresenter,
};
pub use alarms::{reconcile, AlarmService, AlarmStore, LoadOrigin, MutationOutcome, ReconcileReport};
pub use clock_ports::Clock;
pub use intake::{IntakeService, LoggedIntake};
pub use storage_ports::KeyValueStore;
