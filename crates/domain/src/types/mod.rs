//! Domain types and models

pub mod alarm;
pub mod intake;

pub use alarm::{
    decode_alarm_list, fixed_hourly_rules, AlarmId, AlarmKind, AlarmRecord, AlarmRule,
    AlarmSchedule,
};
pub use intake::{IntakeEntry, IntakeProgress};
