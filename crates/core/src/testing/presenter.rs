use std::sync::Arc;

use parking_lot::Mutex;

use crate::alarms::ports::RingPresenter;

/// Presenter that remembers every ring.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    rings: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rings(&self) -> Vec<(String, String)> {
        self.rings.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.rings.lock().len()
    }
}

impl RingPresenter for RecordingPresenter {
    fn on_fire(&self, title: &str, body: &str) {
        self.rings.lock().push((title.to_string(), body.to_string()));
    }
}
