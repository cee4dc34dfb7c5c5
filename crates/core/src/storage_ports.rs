//! Key-value persistence port
//!
//! The persisted state is a handful of string keys holding JSON documents.
//! Every implementation is asynchronous and may suspend the caller.

use async_trait::async_trait;
use watertime_domain::Result;

/// Opaque asynchronous string-keyed store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a key. `Ok(None)` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a key, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Delete a key. Deleting an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
