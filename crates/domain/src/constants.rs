//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Persisted key-value store keys
pub const ALARMS_KEY: &str = "alarms";
pub const AUTO_HOURLY_FLAG_KEY: &str = "autoHourlyEnabled";
pub const GOAL_KEY: &str = "goal";
pub const HISTORY_KEY: &str = "history";
pub const LAST_DAY_KEY: &str = "lastDayKey";

// Calendar day token written under `LAST_DAY_KEY`
pub const DAY_TOKEN_FORMAT: &str = "%Y-%m-%d";

// Notification / ring content
pub const REMINDER_TITLE: &str = "Time to drink water 💧";

// Rule labels
pub const INTERVAL_LABEL_SUFFIX: &str = "min";
pub const AUTO_LABEL_ANNOTATION: &str = " (auto)";
pub const FIXED_RULE_ID_PREFIX: &str = "fixed-";

// Defaults
pub const DEFAULT_FIXED_START_HOUR: u8 = 8;
pub const DEFAULT_FIXED_END_HOUR: u8 = 20;
pub const AUTO_HOURLY_INTERVAL_MINUTES: u32 = 60;
