//! # WaterTime Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Platform scheduler adapters (native notifications, in-process timers)
//! - JSON file key-value storage
//! - The local system clock
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `watertime-core`
//! - Contains all "impure" code (file I/O, timers, environment)

pub mod clock;
pub mod config;
pub mod errors;
pub mod observability;
pub mod scheduling;
pub mod storage;

// Re-export commonly used items
pub use clock::SystemClock;
pub use errors::InfraError;
pub use scheduling::{
    select_scheduler, NativeScheduler, PlatformCapability, SchedulerError, SimulatedScheduler,
};
pub use storage::JsonFileStore;
