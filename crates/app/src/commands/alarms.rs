//! Alarm commands

use std::fmt::Write;

use watertime_core::MutationOutcome;
use watertime_domain::{AlarmId, Result};

use crate::AppContext;

pub(super) async fn add_interval(ctx: &mut AppContext, text: &str) -> Result<String> {
    let outcome = ctx.alarms.add_interval(text).await?;
    Ok(render(outcome, "added"))
}

pub(super) async fn add_time(ctx: &mut AppContext, text: &str) -> Result<String> {
    let outcome = ctx.alarms.add_specific_time(text).await?;
    Ok(render(outcome, "added"))
}

pub(super) async fn toggle(ctx: &mut AppContext, id: &AlarmId) -> Result<String> {
    let outcome = ctx.alarms.toggle(id).await?;
    Ok(render(outcome, "updated"))
}

pub(super) async fn remove(ctx: &mut AppContext, id: &AlarmId) -> Result<String> {
    let outcome = ctx.alarms.remove(id).await?;
    Ok(render(outcome, "removed"))
}

pub(super) async fn restore_defaults(ctx: &mut AppContext) -> Result<String> {
    ctx.alarms.restore_defaults().await?;
    Ok(format!("restored {} default alarms", ctx.alarms.rules().len()))
}

pub(super) fn list(ctx: &AppContext) -> String {
    let rules = ctx.alarms.rules();
    if rules.is_empty() {
        return "no alarms".to_string();
    }

    let mut out = String::new();
    for rule in rules {
        let state = if rule.active { "on" } else { "off" };
        let _ = writeln!(out, "{:<8} {:<4} {}", rule.label(), state, rule.id);
    }
    out.trim_end().to_string()
}

fn render(outcome: MutationOutcome, verb: &str) -> String {
    match outcome {
        MutationOutcome::Applied(rule) => {
            let state = if rule.active { "on" } else { "off" };
            format!("{verb} {} ({state}) id={}", rule.label(), rule.id)
        }
        MutationOutcome::Removed(rule) => format!("{verb} {} id={}", rule.label(), rule.id),
        MutationOutcome::Invalid(err) => format!("invalid input: {err}"),
        MutationOutcome::Duplicate(label) => format!("an alarm at {label} already exists"),
        MutationOutcome::PermissionDenied => {
            "notification permission denied; alarm not scheduled".to_string()
        }
        MutationOutcome::NotFound(id) => format!("no alarm with id {id}"),
    }
}
