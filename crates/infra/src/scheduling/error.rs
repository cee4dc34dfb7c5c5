//! Scheduler error types

use thiserror::Error;
use watertime_domain::WaterTimeError;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// No tokio runtime to spawn in-process timers on
    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    /// The platform notification service failed
    #[error("Notification service failed: {0}")]
    Notification(String),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let water_err = match err {
            SchedulerError::NoRuntime(_) => WaterTimeError::Platform(err.to_string()),
            SchedulerError::Notification(_) => WaterTimeError::Scheduling(err.to_string()),
        };
        InfraError(water_err)
    }
}

impl From<SchedulerError> for WaterTimeError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

impl From<tokio::runtime::TryCurrentError> for SchedulerError {
    fn from(err: tokio::runtime::TryCurrentError) -> Self {
        Self::NoRuntime(err.to_string())
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
