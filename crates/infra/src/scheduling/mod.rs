//! Platform scheduler adapters
//!
//! Two implementations of [`AlarmScheduler`], chosen once at startup:
//! - [`NativeScheduler`] hands every rule to the host notification service
//! - [`SimulatedScheduler`] keeps in-process timers and relies on the
//!   reconciler after every alarm list change

pub mod error;
pub mod native;
pub mod simulated;

use std::sync::Arc;

use tracing::info;
use watertime_core::{AlarmScheduler, Clock, NotificationService, RingPresenter};

pub use error::{SchedulerError, SchedulerResult};
pub use native::NativeScheduler;
pub use simulated::{SimulatedScheduler, TimerKind};

/// What the host platform can offer for scheduling.
pub enum PlatformCapability {
    /// An OS notification service is available.
    Notifications(Arc<dyn NotificationService>),
    /// No scheduling service; timers must live in this process.
    InProcess,
}

/// Pick the scheduler for the host platform.
///
/// # Errors
/// `SchedulerError::NoRuntime` when in-process timers are required but no
/// tokio runtime is running.
pub fn select_scheduler(
    capability: PlatformCapability,
    clock: Arc<dyn Clock>,
    presenter: Arc<dyn RingPresenter>,
) -> SchedulerResult<Arc<dyn AlarmScheduler>> {
    match capability {
        PlatformCapability::Notifications(service) => {
            info!("Using native notification scheduler");
            Ok(Arc::new(NativeScheduler::new(service)))
        }
        PlatformCapability::InProcess => {
            info!("Using simulated in-process scheduler");
            Ok(Arc::new(SimulatedScheduler::new(clock, presenter)?))
        }
    }
}
