//! Helpers shared by commands

pub mod logging;
