//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `WATERTIME_STORAGE_PATH` is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every successfully loaded configuration is validated before it is
//! returned.
//!
//! ## Environment Variables
//! - `WATERTIME_STORAGE_PATH`: JSON store file path (required)
//! - `WATERTIME_SEED_FIXED_HOURLY`: Seed the fixed hourly rules (true/false)
//! - `WATERTIME_FIXED_START_HOUR`: First fixed hourly rule (0-23)
//! - `WATERTIME_FIXED_END_HOUR`: Last fixed hourly rule (0-23)
//! - `WATERTIME_AUTO_HOURLY_REMINDER`: Create the one-time 60 minute reminder
//! - `WATERTIME_LOG_LEVEL`: Default tracing level
//! - `WATERTIME_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./watertime.json` or `./watertime.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use watertime_domain::constants::{DEFAULT_FIXED_END_HOUR, DEFAULT_FIXED_START_HOUR};
use watertime_domain::{AlarmConfig, Config, LoggingConfig, Result, StorageConfig, WaterTimeError};

use crate::errors::InfraError;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the storage path
/// is not set there, falls back to loading from a config file.
///
/// # Errors
/// Returns `WaterTimeError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Values fail validation
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `WATERTIME_STORAGE_PATH` is required; everything else falls back to
/// the defaults.
///
/// # Errors
/// Returns `WaterTimeError::Config` if the storage path is missing or a
/// value cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let path = env_var("WATERTIME_STORAGE_PATH")?;

    let fixed_start_hour =
        env_parse("WATERTIME_FIXED_START_HOUR", DEFAULT_FIXED_START_HOUR, "start hour")?;
    let fixed_end_hour = env_parse("WATERTIME_FIXED_END_HOUR", DEFAULT_FIXED_END_HOUR, "end hour")?;

    let defaults = LoggingConfig::default();
    let config = Config {
        storage: StorageConfig { path },
        alarms: AlarmConfig {
            seed_fixed_hourly: env_bool("WATERTIME_SEED_FIXED_HOURLY", true),
            fixed_start_hour,
            fixed_end_hour,
            auto_hourly_reminder: env_bool("WATERTIME_AUTO_HOURLY_REMINDER", false),
        },
        logging: LoggingConfig {
            level: std::env::var("WATERTIME_LOG_LEVEL").unwrap_or(defaults.level),
            json: env_bool("WATERTIME_LOG_JSON", defaults.json),
        },
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `WaterTimeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Values fail validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WaterTimeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WaterTimeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WaterTimeError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WaterTimeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(WaterTimeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
        candidates.push(cwd.join("../config.json"));
        candidates.push(cwd.join("../config.toml"));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> [PathBuf; 4] {
    [
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("watertime.json"),
        dir.join("watertime.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `WaterTimeError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        WaterTimeError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, using `default` when unset.
fn env_parse<T: FromStr>(key: &str, default: T, what: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| WaterTimeError::Config(format!("Invalid {what}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
