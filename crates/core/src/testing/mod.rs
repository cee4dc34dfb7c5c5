//! Test doubles for every core port
//!
//! Compiled for this crate's own tests and, behind the `test-utils` feature,
//! for the tests of downstream crates. Each double can share a [`Journal`] so
//! a test can assert the relative order of calls across collaborators.

mod clock;
mod journal;
mod notifications;
mod presenter;
mod store;
mod timers;

pub use clock::FixedClock;
pub use journal::Journal;
pub use notifications::{ScriptedNotificationService, ScriptedTrigger};
pub use presenter::RecordingPresenter;
pub use store::MemoryStore;
pub use timers::InMemoryTimers;
