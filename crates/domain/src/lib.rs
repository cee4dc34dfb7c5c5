//! # WaterTime Domain
//!
//! Business domain types and models for WaterTime.
//!
//! This crate contains:
//! - Alarm rules, schedules and identifiers
//! - Daily intake entries and progress
//! - The time rule parser (interval minutes, `HH:MM`)
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other WaterTime crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::time_rule::{
    interval_minutes_from_label, parse_interval, parse_positive, parse_time_of_day, TimeOfDay,
    TimeRuleError,
};
