use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use watertime_domain::{Result, WaterTimeError};

use super::Journal;
use crate::storage_ports::KeyValueStore;

/// In-memory key-value store with write counting and failure injection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<HashMap<String, usize>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    journal: Journal,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that records `set <key>` / `remove <key>` into `journal`.
    pub fn with_journal(journal: Journal) -> Self {
        Self { journal, ..Self::default() }
    }

    /// Seed a value without counting it as a write.
    pub fn insert(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn write_count(&self, key: &str) -> usize {
        self.writes.lock().get(key).copied().unwrap_or_default()
    }

    /// Make every `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `set` and `remove` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WaterTimeError::Storage("injected write failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(WaterTimeError::Storage("injected read failure".into()));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check_write()?;
        self.values.lock().insert(key.to_string(), value);
        *self.writes.lock().entry(key.to_string()).or_default() += 1;
        self.journal.record(format!("set {key}"));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_write()?;
        self.values.lock().remove(key);
        self.journal.record(format!("remove {key}"));
        Ok(())
    }
}
