//! Alarm rule types
//!
//! An [`AlarmRule`] is one user-declared reminder. Its schedule payload is the
//! single source of truth; the label is always a render of it.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{FIXED_RULE_ID_PREFIX, INTERVAL_LABEL_SUFFIX};
use crate::impl_domain_kind_conversions;
use crate::utils::time_rule::{interval_minutes_from_label, TimeOfDay, TimeRuleError};

/// Opaque, list-unique alarm identifier.
///
/// On native targets this is whatever the notification service handed back
/// (and changes on every reschedule). On the simulated target it is a locally
/// generated token that stays stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmId(String);

impl AlarmId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh locally generated identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Raw identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlarmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlarmId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Discriminator of an alarm schedule. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmKind {
    Interval,
    SpecificTime,
}

impl_domain_kind_conversions!(AlarmKind {
    Interval => "interval",
    SpecificTime => "specific" | "specific_time" | "fixed",
});

/// When an alarm fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmSchedule {
    /// Repeats every `minutes` minutes.
    Interval { minutes: NonZeroU32 },
    /// Repeats daily at a local wall-clock time.
    SpecificTime(TimeOfDay),
}

impl AlarmSchedule {
    /// Interval schedule, rejecting zero minutes.
    pub fn every(minutes: u32) -> Result<Self, TimeRuleError> {
        NonZeroU32::new(minutes)
            .map(|minutes| Self::Interval { minutes })
            .ok_or(TimeRuleError::NonPositive(0))
    }

    /// Daily schedule at `time`.
    pub const fn daily_at(time: TimeOfDay) -> Self {
        Self::SpecificTime(time)
    }

    /// Persisted kind of this schedule.
    pub const fn kind(&self) -> AlarmKind {
        match self {
            Self::Interval { .. } => AlarmKind::Interval,
            Self::SpecificTime(_) => AlarmKind::SpecificTime,
        }
    }

    /// Display label: `"60 min"` or `"07:30"`.
    pub fn label(&self) -> String {
        match self {
            Self::Interval { minutes } => format!("{minutes} {INTERVAL_LABEL_SUFFIX}"),
            Self::SpecificTime(time) => time.label(),
        }
    }

    /// Body text shown when the reminder fires.
    pub fn notification_body(&self) -> String {
        match self {
            Self::Interval { minutes } => format!("Reminder every {minutes} minutes"),
            Self::SpecificTime(time) => format!("Reminder at {}", time.label()),
        }
    }

    /// Repeat period for interval schedules.
    pub fn period(&self) -> Option<std::time::Duration> {
        match self {
            Self::Interval { minutes } => {
                Some(std::time::Duration::from_secs(u64::from(minutes.get()) * 60))
            }
            Self::SpecificTime(_) => None,
        }
    }
}

/// One user-declared reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AlarmRecord", into = "AlarmRecord")]
pub struct AlarmRule {
    pub id: AlarmId,
    pub schedule: AlarmSchedule,
    pub active: bool,
}

impl AlarmRule {
    /// A newly declared rule starts active.
    pub fn new(id: AlarmId, schedule: AlarmSchedule) -> Self {
        Self { id, schedule, active: true }
    }

    /// Kind of the rule's schedule.
    pub const fn kind(&self) -> AlarmKind {
        self.schedule.kind()
    }

    /// Display label, rendered from the schedule.
    pub fn label(&self) -> String {
        self.schedule.label()
    }
}

/// Built-in daily rules, one per full hour in `start_hour..=end_hour`, all
/// active, with ids of the form `fixed-HH:00`.
pub fn fixed_hourly_rules(start_hour: u8, end_hour: u8) -> Vec<AlarmRule> {
    (start_hour..=end_hour.min(23))
        .filter_map(|hour| TimeOfDay::new(i64::from(hour), 0).ok())
        .map(|time| {
            AlarmRule::new(
                AlarmId::new(format!("{FIXED_RULE_ID_PREFIX}{}", time.label())),
                AlarmSchedule::daily_at(time),
            )
        })
        .collect()
}

/// Persisted shape of an alarm rule.
///
/// Flat and lenient on read: older records used `type` instead of `kind`,
/// `key` instead of `id`, and interval records written by the automatic
/// reminder carried only a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRecord {
    #[serde(alias = "key")]
    pub id: AlarmId,
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<i64>,
}

impl From<AlarmRule> for AlarmRecord {
    fn from(rule: AlarmRule) -> Self {
        let label = rule.label();
        let (minutes, hour, minute) = match rule.schedule {
            AlarmSchedule::Interval { minutes } => (Some(i64::from(minutes.get())), None, None),
            AlarmSchedule::SpecificTime(time) => {
                (None, Some(i64::from(time.hour())), Some(i64::from(time.minute())))
            }
        };
        Self {
            id: rule.id,
            kind: rule.schedule.kind().to_string(),
            label,
            active: rule.active,
            minutes,
            hour,
            minute,
        }
    }
}

impl TryFrom<AlarmRecord> for AlarmRule {
    type Error = String;

    fn try_from(record: AlarmRecord) -> Result<Self, Self::Error> {
        let kind: AlarmKind = record.kind.parse()?;
        let schedule = match kind {
            AlarmKind::Interval => {
                let minutes = match record.minutes {
                    Some(minutes) => u32::try_from(minutes).ok(),
                    None => interval_minutes_from_label(&record.label),
                };
                minutes
                    .and_then(|m| AlarmSchedule::every(m).ok())
                    .ok_or_else(|| format!("alarm {} has no usable interval", record.id))?
            }
            AlarmKind::SpecificTime => {
                let time = match (record.hour, record.minute) {
                    (Some(hour), Some(minute)) => TimeOfDay::new(hour, minute),
                    _ => crate::utils::time_rule::parse_time_of_day(&record.label),
                }
                .map_err(|err| format!("alarm {} has no usable time: {err}", record.id))?;
                AlarmSchedule::daily_at(time)
            }
        };

        Ok(Self { id: record.id, schedule, active: record.active })
    }
}

/// Decode a persisted alarm list, keeping every record that converts and
/// counting the ones that don't.
pub fn decode_alarm_list(json: &str) -> serde_json::Result<(Vec<AlarmRule>, usize)> {
    let records: Vec<AlarmRecord> = serde_json::from_str(json)?;
    let total = records.len();
    let rules: Vec<AlarmRule> =
        records.into_iter().filter_map(|record| AlarmRule::try_from(record).ok()).collect();
    let dropped = total - rules.len();
    Ok((rules, dropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_rule::parse_time_of_day;

    fn interval(minutes: u32) -> AlarmSchedule {
        AlarmSchedule::every(minutes).unwrap()
    }

    #[test]
    fn labels_render_from_payload() {
        assert_eq!(interval(60).label(), "60 min");
        let time = parse_time_of_day("7:5").unwrap();
        assert_eq!(AlarmSchedule::daily_at(time).label(), "07:05");
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(AlarmSchedule::every(0), Err(TimeRuleError::NonPositive(0)));
    }

    #[test]
    fn interval_period_is_minutes_times_sixty() {
        assert_eq!(interval(15).period(), Some(std::time::Duration::from_secs(900)));
        let time = parse_time_of_day("10:00").unwrap();
        assert_eq!(AlarmSchedule::daily_at(time).period(), None);
    }

    #[test]
    fn persisted_shape_is_flat() {
        let rule = AlarmRule::new(AlarmId::new("abc"), interval(60));
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc",
                "kind": "interval",
                "label": "60 min",
                "active": true,
                "minutes": 60
            })
        );
    }

    #[test]
    fn list_round_trips_in_order() {
        let mut off = AlarmRule::new(
            AlarmId::new("b"),
            AlarmSchedule::daily_at(parse_time_of_day("07:30").unwrap()),
        );
        off.active = false;
        let list = vec![AlarmRule::new(AlarmId::new("a"), interval(45)), off];

        let json = serde_json::to_string(&list).unwrap();
        let (decoded, dropped) = decode_alarm_list(&json).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(decoded, list);
    }

    #[test]
    fn legacy_records_are_recovered() {
        let json = r#"[
            {"id": "n-1", "type": "interval", "label": "60 min (auto)", "active": true},
            {"key": "fixed-08:00", "notifId": null, "type": "fixed", "label": "08:00",
             "active": true, "hour": 8, "minute": 0},
            {"id": "n-2", "type": "specific", "label": "21:15", "active": false}
        ]"#;
        let (rules, dropped) = decode_alarm_list(json).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(rules[0].schedule, interval(60));
        assert_eq!(rules[0].label(), "60 min");
        assert_eq!(rules[1].id, AlarmId::new("fixed-08:00"));
        assert_eq!(rules[1].label(), "08:00");
        assert_eq!(rules[2].label(), "21:15");
        assert!(!rules[2].active);
    }

    #[test]
    fn structured_payload_wins_over_label() {
        let json = r#"[{"id": "x", "kind": "interval", "label": "5 min", "active": true, "minutes": 30}]"#;
        let (rules, _) = decode_alarm_list(json).unwrap();
        assert_eq!(rules[0].schedule, interval(30));
    }

    #[test]
    fn unrecoverable_records_are_dropped() {
        let json = r#"[
            {"id": "ok", "kind": "interval", "active": true, "minutes": 10},
            {"id": "bad-interval", "kind": "interval", "label": "soon", "active": true},
            {"id": "bad-time", "kind": "specific", "active": true, "hour": 30, "minute": 0},
            {"id": "bad-kind", "kind": "weekly", "active": true}
        ]"#;
        let (rules, dropped) = decode_alarm_list(json).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(dropped, 3);
    }

    #[test]
    fn fixed_hourly_rules_cover_inclusive_range() {
        let rules = fixed_hourly_rules(8, 20);
        assert_eq!(rules.len(), 13);
        assert_eq!(rules[0].id, AlarmId::new("fixed-08:00"));
        assert_eq!(rules[12].label(), "20:00");
        assert!(rules.iter().all(|rule| rule.active));
        assert!(fixed_hourly_rules(21, 20).is_empty());
    }
}
