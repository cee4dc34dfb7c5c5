//! Time rule parsing
//!
//! Validates raw reminder input (interval minutes, `HH:MM` strings) and
//! normalizes it into structured values. All times are local wall-clock; no
//! timezone handling happens here.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{AUTO_LABEL_ANNOTATION, INTERVAL_LABEL_SUFFIX};

/// Why a piece of reminder input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRuleError {
    #[error("input is empty")]
    Empty,

    #[error("'{0}' is not an integer")]
    NotAnInteger(String),

    #[error("value must be greater than zero, got {0}")]
    NonPositive(i64),

    #[error("'{0}' is not in HH:MM form")]
    MalformedTime(String),

    #[error("hour {0} is outside 0..=23")]
    HourOutOfRange(i64),

    #[error("minute {0} is outside 0..=59")]
    MinuteOutOfRange(i64),
}

/// A local wall-clock time of day with minute precision.
///
/// Only constructible through [`TimeOfDay::new`] or [`parse_time_of_day`], so
/// `hour <= 23` and `minute <= 59` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTimeOfDay")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Deserialize)]
struct RawTimeOfDay {
    hour: i64,
    minute: i64,
}

impl TryFrom<RawTimeOfDay> for TimeOfDay {
    type Error = TimeRuleError;

    fn try_from(raw: RawTimeOfDay) -> Result<Self, Self::Error> {
        Self::new(raw.hour, raw.minute)
    }
}

impl TimeOfDay {
    /// Build a time of day, rejecting out-of-range components.
    pub fn new(hour: i64, minute: i64) -> Result<Self, TimeRuleError> {
        let hour = u8::try_from(hour)
            .ok()
            .filter(|h| *h <= 23)
            .ok_or(TimeRuleError::HourOutOfRange(hour))?;
        let minute = u8::try_from(minute)
            .ok()
            .filter(|m| *m <= 59)
            .ok_or(TimeRuleError::MinuteOutOfRange(minute))?;
        Ok(Self { hour, minute })
    }

    /// Hour, `0..=23`.
    pub fn hour(self) -> u8 {
        self.hour
    }

    /// Minute, `0..=59`.
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Zero-padded `HH:MM` rendering.
    pub fn label(self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// Next local datetime at which this time of day occurs, strictly after
    /// `now`. A target equal to `now` rolls over to tomorrow.
    pub fn next_occurrence_after(self, now: NaiveDateTime) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or_default();
        let today = now.date().and_time(time);
        if today <= now {
            today + Duration::days(1)
        } else {
            today
        }
    }

    /// Delay from `now` until the next occurrence.
    pub fn delay_until_next(self, now: NaiveDateTime) -> std::time::Duration {
        (self.next_occurrence_after(now) - now).to_std().unwrap_or_default()
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parse fresh interval input. The whole (trimmed) text must be a positive
/// integer number of minutes.
pub fn parse_interval(text: &str) -> Result<u32, TimeRuleError> {
    parse_positive(text)
}

/// Parse a positive integer amount. Shared by interval input and the daily
/// intake goal.
pub fn parse_positive(text: &str) -> Result<u32, TimeRuleError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimeRuleError::Empty);
    }

    let value: i64 =
        trimmed.parse().map_err(|_| TimeRuleError::NotAnInteger(trimmed.to_string()))?;
    if value <= 0 {
        return Err(TimeRuleError::NonPositive(value));
    }
    u32::try_from(value).map_err(|_| TimeRuleError::NotAnInteger(trimmed.to_string()))
}

/// Parse `HH:MM` input into a [`TimeOfDay`].
///
/// The text must split into exactly two colon-separated integer fields.
/// Single-digit fields (`7:5`) are accepted; rendering is always padded.
pub fn parse_time_of_day(text: &str) -> Result<TimeOfDay, TimeRuleError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TimeRuleError::Empty);
    }

    let fields: Vec<&str> = trimmed.split(':').collect();
    let [hour, minute] = fields.as_slice() else {
        return Err(TimeRuleError::MalformedTime(trimmed.to_string()));
    };

    let parse_field = |field: &str| -> Result<i64, TimeRuleError> {
        field.trim().parse().map_err(|_| TimeRuleError::MalformedTime(trimmed.to_string()))
    };

    TimeOfDay::new(parse_field(hour)?, parse_field(minute)?)
}

/// Best-effort recovery of interval minutes from a rendered label such as
/// `"60 min"` or `"60 min (auto)"`.
///
/// Only used for persisted records that predate the structured payload;
/// fresh input goes through [`parse_interval`].
pub fn interval_minutes_from_label(label: &str) -> Option<u32> {
    let cleaned = label.replace(AUTO_LABEL_ANNOTATION, "").replace(INTERVAL_LABEL_SUFFIX, "");
    parse_interval(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn parses_positive_intervals() {
        assert_eq!(parse_interval("60"), Ok(60));
        assert_eq!(parse_interval(" 15 "), Ok(15));
        assert_eq!(parse_interval("1"), Ok(1));
    }

    #[test]
    fn rejects_bad_intervals() {
        assert_eq!(parse_interval(""), Err(TimeRuleError::Empty));
        assert_eq!(parse_interval("   "), Err(TimeRuleError::Empty));
        assert_eq!(parse_interval("0"), Err(TimeRuleError::NonPositive(0)));
        assert_eq!(parse_interval("-5"), Err(TimeRuleError::NonPositive(-5)));
        assert!(matches!(parse_interval("abc"), Err(TimeRuleError::NotAnInteger(_))));
        assert!(matches!(parse_interval("60min"), Err(TimeRuleError::NotAnInteger(_))));
        assert!(matches!(parse_interval("1.5"), Err(TimeRuleError::NotAnInteger(_))));
        assert!(matches!(parse_interval("99999999999"), Err(TimeRuleError::NotAnInteger(_))));
    }

    #[test]
    fn parses_every_valid_time_of_day() {
        for hour in 0..24 {
            for minute in 0..60 {
                let text = format!("{hour:02}:{minute:02}");
                let parsed = parse_time_of_day(&text).unwrap();
                assert_eq!((i64::from(parsed.hour()), i64::from(parsed.minute())), (hour, minute));
                assert_eq!(parsed.label(), text);
            }
        }
    }

    #[test]
    fn pads_labels() {
        assert_eq!(parse_time_of_day("7:5").unwrap().label(), "07:05");
        assert_eq!(parse_time_of_day("07:30").unwrap().to_string(), "07:30");
    }

    #[test]
    fn rejects_bad_times() {
        assert_eq!(parse_time_of_day("24:00"), Err(TimeRuleError::HourOutOfRange(24)));
        assert_eq!(parse_time_of_day("-1:00"), Err(TimeRuleError::HourOutOfRange(-1)));
        assert_eq!(parse_time_of_day("12:60"), Err(TimeRuleError::MinuteOutOfRange(60)));
        assert_eq!(parse_time_of_day(""), Err(TimeRuleError::Empty));
        for text in ["1230", "12:30:00", "ab:cd", "12:", ":30", "12-30"] {
            assert!(
                matches!(parse_time_of_day(text), Err(TimeRuleError::MalformedTime(_))),
                "{text} should be malformed"
            );
        }
    }

    #[test]
    fn recovers_minutes_from_labels() {
        assert_eq!(interval_minutes_from_label("60 min"), Some(60));
        assert_eq!(interval_minutes_from_label("60 min (auto)"), Some(60));
        assert_eq!(interval_minutes_from_label("45min"), Some(45));
        assert_eq!(interval_minutes_from_label("07:30"), None);
        assert_eq!(interval_minutes_from_label("0 min"), None);
    }

    #[test]
    fn next_occurrence_is_tomorrow_once_passed() {
        let rule = TimeOfDay::new(7, 30).unwrap();
        let now = at(8, 0);
        assert_eq!(rule.next_occurrence_after(now), at(7, 30) + Duration::days(1));
        assert_eq!(rule.delay_until_next(now), std::time::Duration::from_secs(23 * 3600 + 1800));
    }

    #[test]
    fn next_occurrence_is_today_when_ahead() {
        let rule = TimeOfDay::new(9, 15).unwrap();
        assert_eq!(rule.delay_until_next(at(8, 0)), std::time::Duration::from_secs(75 * 60));
    }

    #[test]
    fn exact_boundary_rolls_to_tomorrow() {
        let rule = TimeOfDay::new(8, 0).unwrap();
        assert_eq!(rule.delay_until_next(at(8, 0)), std::time::Duration::from_secs(24 * 3600));
    }

    #[test]
    fn deserialization_validates_range() {
        assert!(serde_json::from_str::<TimeOfDay>(r#"{"hour":7,"minute":30}"#).is_ok());
        assert!(serde_json::from_str::<TimeOfDay>(r#"{"hour":25,"minute":0}"#).is_err());
    }
}
