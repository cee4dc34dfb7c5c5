//! Line commands - terminal to services bridge
//!
//! Each input line parses into one [`Command`]. [`execute`] runs it against
//! the [`AppContext`] and renders the outcome as text.

mod alarms;
mod intake;

use std::time::Instant;

use thiserror::Error;
use watertime_domain::{AlarmId, Result};

use crate::utils::logging::log_command_execution;
use crate::AppContext;

pub const HELP: &str = "\
commands:
  add-interval N     remind every N minutes
  add-time HH:MM     remind daily at HH:MM
  toggle ID          switch an alarm on or off
  remove ID          delete an alarm
  list               show all alarms
  restore-defaults   replace all alarms with the hourly defaults
  goal N             set the daily goal in ml
  reset-goal         clear the daily goal
  drink N            log N ml
  status             show today's progress
  help               show this text
  quit               exit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddInterval(String),
    AddTime(String),
    Toggle(AlarmId),
    Remove(AlarmId),
    List,
    RestoreDefaults,
    SetGoal(String),
    ResetGoal,
    Drink(String),
    Status,
    Help,
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument { command: &'static str, argument: &'static str },
}

/// What the host should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

impl Command {
    /// Parse one line. Blank lines yield `Ok(None)`.
    ///
    /// Arguments are passed through untouched; validation happens in the
    /// services so every caller gets the same rules.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let argument = rest.trim();
        let required = |command: &'static str, what: &'static str| {
            if argument.is_empty() {
                Err(CommandError::MissingArgument { command, argument: what })
            } else {
                Ok(argument.to_string())
            }
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "add-interval" => Self::AddInterval(required("add-interval", "a number of minutes")?),
            "add-time" => Self::AddTime(required("add-time", "a time like 07:30")?),
            "toggle" => Self::Toggle(AlarmId::new(required("toggle", "an alarm id")?)),
            "remove" => Self::Remove(AlarmId::new(required("remove", "an alarm id")?)),
            "list" => Self::List,
            "restore-defaults" => Self::RestoreDefaults,
            "goal" => Self::SetGoal(required("goal", "an amount in ml")?),
            "reset-goal" => Self::ResetGoal,
            "drink" => Self::Drink(required("drink", "an amount in ml")?),
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Stable name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddInterval(_) => "alarms::add_interval",
            Self::AddTime(_) => "alarms::add_time",
            Self::Toggle(_) => "alarms::toggle",
            Self::Remove(_) => "alarms::remove",
            Self::List => "alarms::list",
            Self::RestoreDefaults => "alarms::restore_defaults",
            Self::SetGoal(_) => "intake::set_goal",
            Self::ResetGoal => "intake::reset_goal",
            Self::Drink(_) => "intake::drink",
            Self::Status => "intake::status",
            Self::Help => "app::help",
            Self::Quit => "app::quit",
        }
    }
}

/// Run a command and render its outcome.
///
/// # Errors
/// Only infrastructure failures (persistence, platform) are returned;
/// rejected input is rendered as text.
pub async fn execute(ctx: &mut AppContext, command: Command) -> Result<Reply> {
    let name = command.name();
    let start = Instant::now();

    let result = match command {
        Command::AddInterval(text) => alarms::add_interval(ctx, &text).await,
        Command::AddTime(text) => alarms::add_time(ctx, &text).await,
        Command::Toggle(id) => alarms::toggle(ctx, &id).await,
        Command::Remove(id) => alarms::remove(ctx, &id).await,
        Command::List => Ok(alarms::list(ctx)),
        Command::RestoreDefaults => alarms::restore_defaults(ctx).await,
        Command::SetGoal(text) => intake::set_goal(ctx, &text).await,
        Command::ResetGoal => intake::reset_goal(ctx).await,
        Command::Drink(text) => intake::drink(ctx, &text).await,
        Command::Status => Ok(intake::status(ctx)),
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => return Ok(Reply::Quit),
    };

    log_command_execution(
        name,
        start.elapsed(),
        result.is_ok(),
        result.as_ref().err().map(|err| err.label()),
    );
    result.map(Reply::Text)
}
