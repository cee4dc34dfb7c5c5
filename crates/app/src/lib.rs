//! # WaterTime App
//!
//! Host application layer - line commands and the main entry point.
//!
//! This crate contains:
//! - Text commands (terminal → services bridge)
//! - Application context (dependency injection)
//! - The ring presenter that surfaces fired reminders
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod presenter;
pub mod utils;

// Re-export for convenience
pub use commands::{execute, Command, CommandError, Reply};
pub use context::AppContext;
pub use presenter::{ChannelRingPresenter, Ring};
