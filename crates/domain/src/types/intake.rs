//! Daily water intake types

use serde::{Deserialize, Serialize};

/// One logged drink. Persisted newest first under the history key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeEntry {
    pub id: String,
    #[serde(rename = "amount")]
    pub amount_ml: u32,
    /// Local wall-clock time of the drink, `H:MM`.
    pub time: String,
}

/// Snapshot of today's progress toward the goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakeProgress {
    pub consumed_ml: u32,
    pub goal_ml: Option<u32>,
    /// `consumed / goal`, clamped to `1.0`; zero when no goal is set.
    pub fraction: f64,
}

impl IntakeProgress {
    /// Progress towards an optional goal; the fraction is clamped to 1.0.
    pub fn new(consumed_ml: u32, goal_ml: Option<u32>) -> Self {
        let fraction = match goal_ml {
            Some(goal) if goal > 0 => (f64::from(consumed_ml) / f64::from(goal)).min(1.0),
            _ => 0.0,
        };
        Self { consumed_ml, goal_ml, fraction }
    }

    /// Whether a goal is set and met.
    pub fn goal_reached(&self) -> bool {
        self.goal_ml.is_some_and(|goal| self.consumed_ml >= goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        let progress = IntakeProgress::new(3000, Some(2000));
        assert!((progress.fraction - 1.0).abs() < f64::EPSILON);
        assert!(progress.goal_reached());
    }

    #[test]
    fn progress_without_goal_is_zero() {
        let progress = IntakeProgress::new(500, None);
        assert!(progress.fraction.abs() < f64::EPSILON);
        assert!(!progress.goal_reached());
    }

    #[test]
    fn entry_uses_amount_on_the_wire() {
        let entry = IntakeEntry { id: "1".into(), amount_ml: 250, time: "9:05".into() };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"id": "1", "amount": 250, "time": "9:05"}));
    }
}
