//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use serde_json::Error as JsonError;
use tokio::runtime::TryCurrentError;
use watertime_domain::WaterTimeError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WaterTimeError);

impl From<InfraError> for WaterTimeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WaterTimeError> for InfraError {
    fn from(value: WaterTimeError) -> Self {
        InfraError(value)
    }
}

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoWaterTimeError {
    fn into_watertime(self) -> WaterTimeError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → WaterTimeError */
/* -------------------------------------------------------------------------- */

impl IntoWaterTimeError for IoError {
    fn into_watertime(self) -> WaterTimeError {
        match self.kind() {
            ErrorKind::NotFound => WaterTimeError::NotFound(self.to_string()),
            ErrorKind::PermissionDenied => {
                WaterTimeError::Storage(format!("permission denied: {self}"))
            }
            ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
                WaterTimeError::Storage(format!("corrupt data: {self}"))
            }
            _ => WaterTimeError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_watertime())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → WaterTimeError */
/* -------------------------------------------------------------------------- */

impl IntoWaterTimeError for JsonError {
    fn into_watertime(self) -> WaterTimeError {
        if self.is_io() {
            WaterTimeError::Storage(self.to_string())
        } else {
            WaterTimeError::Storage(format!(
                "invalid JSON at line {} column {}: {self}",
                self.line(),
                self.column()
            ))
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_watertime())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → WaterTimeError */
/* -------------------------------------------------------------------------- */

impl IntoWaterTimeError for toml::de::Error {
    fn into_watertime(self) -> WaterTimeError {
        WaterTimeError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_watertime())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::runtime::TryCurrentError → WaterTimeError */
/* -------------------------------------------------------------------------- */

impl IntoWaterTimeError for TryCurrentError {
    fn into_watertime(self) -> WaterTimeError {
        WaterTimeError::Platform(format!("no async runtime available: {self}"))
    }
}

impl From<TryCurrentError> for InfraError {
    fn from(value: TryCurrentError) -> Self {
        InfraError(value.into_watertime())
    }
}
