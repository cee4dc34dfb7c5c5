//! Intake commands

use watertime_domain::{parse_positive, Result};

use crate::AppContext;

pub(super) async fn set_goal(ctx: &mut AppContext, text: &str) -> Result<String> {
    Ok(match ctx.intake.set_goal(text).await? {
        Some(goal) => format!("daily goal set to {goal} ml"),
        None => format!("invalid goal '{text}': enter a positive number of ml"),
    })
}

pub(super) async fn reset_goal(ctx: &mut AppContext) -> Result<String> {
    ctx.intake.reset_goal().await?;
    Ok("daily goal cleared".to_string())
}

pub(super) async fn drink(ctx: &mut AppContext, text: &str) -> Result<String> {
    let amount = match parse_positive(text) {
        Ok(amount) => amount,
        Err(err) => return Ok(format!("invalid amount: {err}")),
    };

    let Some(logged) = ctx.intake.log_intake(amount).await? else {
        return Ok("nothing logged".to_string());
    };

    let mut reply =
        format!("logged {} ml at {}; {}", logged.entry.amount_ml, logged.entry.time, summary(ctx));
    if logged.goal_just_reached {
        reply.push_str("\ngoal reached, well done!");
    }
    Ok(reply)
}

pub(super) fn status(ctx: &AppContext) -> String {
    format!("{} across {} drinks", summary(ctx), ctx.intake.history().len())
}

fn summary(ctx: &AppContext) -> String {
    let progress = ctx.intake.progress();
    match progress.goal_ml {
        Some(goal) => format!(
            "{} / {goal} ml ({:.0}%)",
            progress.consumed_ml,
            progress.fraction * 100.0
        ),
        None => format!("{} ml today, no goal set", progress.consumed_ml),
    }
}
