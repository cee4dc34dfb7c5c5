use std::sync::Arc;

use parking_lot::Mutex;

/// Shared, ordered log of calls made on test doubles.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Entries starting with `prefix`, in order.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.entries.lock().iter().filter(|entry| entry.starts_with(prefix)).cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
