//! Alarm scheduling core
//!
//! The [`store::AlarmStore`] owns the alarm list, [`reconciler`] keeps
//! in-process timers in line with it, and [`service::AlarmService`] is the
//! entry point hosts call.

pub mod ports;
pub mod reconciler;
pub mod service;
pub mod store;

pub use ports::{AlarmScheduler, LiveTimers, NotificationContent, NotificationService, RingPresenter};
pub use reconciler::{reconcile, ReconcileReport};
pub use service::{AlarmService, MutationOutcome};
pub use store::{AlarmStore, LoadOrigin};
