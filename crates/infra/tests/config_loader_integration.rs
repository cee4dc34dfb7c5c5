//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use tempfile::NamedTempFile;
use watertime_domain::WaterTimeError;
use watertime_infra::config;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "storage": { "path": "/tmp/watertime-integration.json" },
            "alarms": {
                "seed_fixed_hourly": false,
                "fixed_start_hour": 7,
                "fixed_end_hour": 21,
                "auto_hourly_reminder": true
            },
            "logging": { "level": "debug", "json": true }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("JSON config should load");

    assert_eq!(config.storage.path, "/tmp/watertime-integration.json");
    assert!(!config.alarms.seed_fixed_hourly);
    assert_eq!(config.alarms.fixed_start_hour, 7);
    assert_eq!(config.alarms.fixed_end_hour, 21);
    assert!(config.alarms.auto_hourly_reminder);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file_with_defaults() {
    let path = write_config(
        r#"
[storage]
path = "/tmp/watertime-integration.toml.json"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("TOML config should load");

    assert_eq!(config.storage.path, "/tmp/watertime-integration.toml.json");
    assert!(config.alarms.seed_fixed_hourly);
    assert_eq!(config.alarms.fixed_start_hour, 8);
    assert_eq!(config.alarms.fixed_end_hour, 20);
    assert!(!config.alarms.auto_hourly_reminder);
    assert_eq!(config.logging.level, "info");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_hour_range_is_rejected() {
    let path = write_config(
        r#"{ "storage": { "path": "x.json" }, "alarms": { "fixed_start_hour": 20, "fixed_end_hour": 8 } }"#,
        "json",
    );

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(WaterTimeError::Config(_))));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_file_is_a_config_error() {
    let result = config::load_from_file(Some("/nonexistent/watertime.toml".into()));
    assert!(matches!(result, Err(WaterTimeError::Config(_))));
}
