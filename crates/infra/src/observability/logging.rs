//! Tracing subscriber setup

use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use watertime_domain::{LoggingConfig, Result, WaterTimeError};

/// Build the event filter: `RUST_LOG` when set, otherwise the configured
/// level applied to every crate.
///
/// # Errors
/// Returns the parse error when the configured level is not a valid
/// directive.
pub fn build_filter(config: &LoggingConfig) -> std::result::Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level),
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
/// Returns `WaterTimeError::Config` when the level is invalid or a
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)
        .map_err(|e| WaterTimeError::Config(format!("Invalid log level '{}': {e}", config.level)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true).with_writer(std::io::stderr)).try_init()
    };

    installed.map_err(|e| WaterTimeError::Config(format!("Failed to install tracing: {e}")))
}
