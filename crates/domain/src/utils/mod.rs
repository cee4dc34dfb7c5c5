//! Pure parsing helpers

pub mod time_rule;
