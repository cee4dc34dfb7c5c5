//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FIXED_END_HOUR, DEFAULT_FIXED_START_HOUR};
use crate::errors::{Result, WaterTimeError};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub alarms: AlarmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Key-value persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding every persisted key.
    pub path: String,
}

/// Alarm startup behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// Seed the fixed hourly rules when no alarm list is persisted.
    #[serde(default = "default_true")]
    pub seed_fixed_hourly: bool,
    #[serde(default = "default_start_hour")]
    pub fixed_start_hour: u8,
    #[serde(default = "default_end_hour")]
    pub fixed_end_hour: u8,
    /// Create a single 60-minute reminder the first time the app starts.
    #[serde(default)]
    pub auto_hourly_reminder: bool,
}

/// Tracing output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: "watertime.json".to_string() }
    }
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            seed_fixed_hourly: true,
            fixed_start_hour: DEFAULT_FIXED_START_HOUR,
            fixed_end_hour: DEFAULT_FIXED_END_HOUR,
            auto_hourly_reminder: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

impl Config {
    /// Reject settings that cannot describe a valid schedule.
    ///
    /// # Errors
    /// Returns `WaterTimeError::Config` when the fixed hour range is empty or
    /// extends past 23, or when the storage path is blank.
    pub fn validate(&self) -> Result<()> {
        if self.storage.path.trim().is_empty() {
            return Err(WaterTimeError::Config("storage.path must not be empty".into()));
        }
        let AlarmConfig { fixed_start_hour: start, fixed_end_hour: end, .. } = self.alarms;
        if end > 23 || start > end {
            return Err(WaterTimeError::Config(format!(
                "fixed hour range {start}..={end} must satisfy start <= end <= 23"
            )));
        }
        Ok(())
    }
}

const fn default_true() -> bool {
    true
}

const fn default_start_hour() -> u8 {
    DEFAULT_FIXED_START_HOUR
}

const fn default_end_hour() -> u8 {
    DEFAULT_FIXED_END_HOUR
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alarms.fixed_start_hour, 8);
        assert_eq!(config.alarms.fixed_end_hour, 20);
        assert!(config.alarms.seed_fixed_hourly);
    }

    #[test]
    fn inverted_hour_range_is_rejected() {
        let mut config = Config::default();
        config.alarms.fixed_start_hour = 21;
        assert!(matches!(config.validate(), Err(WaterTimeError::Config(_))));

        config.alarms.fixed_start_hour = 8;
        config.alarms.fixed_end_hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_sections_take_defaults() {
        let config: Config = serde_json::from_str(r#"{"storage": {"path": "x.json"}}"#).unwrap();
        assert_eq!(config.storage.path, "x.json");
        assert_eq!(config.alarms, AlarmConfig::default());
        assert_eq!(config.logging.level, "info");
    }
}
