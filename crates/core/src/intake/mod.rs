//! Daily water intake tracking

pub mod service;

pub use service::{IntakeService, LoggedIntake};
