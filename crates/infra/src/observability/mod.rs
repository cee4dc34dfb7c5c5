//! Observability infrastructure
//!
//! Structured logging through `tracing`. Library crates only emit events;
//! the binary installs the subscriber once via [`logging::init_tracing`].

pub mod logging;

pub use logging::{build_filter, init_tracing};
