//! Key-value persistence adapters

pub mod json_file;

pub use json_file::JsonFileStore;
