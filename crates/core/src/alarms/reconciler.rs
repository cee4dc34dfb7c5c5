//! Live timer reconciliation
//!
//! Brings a [`LiveTimers`] set in line with the declared alarm list. Every
//! step is a set difference against the ids that are live right now, so a
//! second pass over the same list does nothing.

use std::collections::HashSet;

use tracing::debug;
use watertime_domain::{AlarmId, AlarmRule};

use super::ports::LiveTimers;

/// What a reconciliation pass changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub armed: usize,
    pub disarmed: usize,
}

impl ReconcileReport {
    /// True when the pass changed nothing.
    pub const fn is_noop(&self) -> bool {
        self.armed == 0 && self.disarmed == 0
    }
}

/// Align `timers` with `rules`.
///
/// 1. Disarm every live timer whose id is no longer declared (covers removal
///    and id replacement in one step).
/// 2. Arm active rules without a timer; disarm inactive rules that have one.
pub fn reconcile(timers: &dyn LiveTimers, rules: &[AlarmRule]) -> ReconcileReport {
    let declared: HashSet<&AlarmId> = rules.iter().map(|rule| &rule.id).collect();
    let mut live = timers.live_ids();
    let mut report = ReconcileReport::default();

    let orphaned: Vec<AlarmId> = live.iter().filter(|id| !declared.contains(id)).cloned().collect();
    for id in orphaned {
        timers.disarm(&id);
        live.remove(&id);
        report.disarmed += 1;
    }

    for rule in rules {
        let running = live.contains(&rule.id);
        if rule.active && !running {
            timers.arm(rule);
            live.insert(rule.id.clone());
            report.armed += 1;
        } else if !rule.active && running {
            timers.disarm(&rule.id);
            live.remove(&rule.id);
            report.disarmed += 1;
        }
    }

    if !report.is_noop() {
        debug!(armed = report.armed, disarmed = report.disarmed, "Reconciled live timers");
    }
    report
}
