//! Command parsing for the interactive feed console.
//!
//! The daemon reads one command per line from stdin. Commands start with `:`
//! and stand in for the events a page would deliver: play clicks, image load
//! errors and re-renders.

use anyhow::{anyhow, Result};
use vitalfeed_core::RecordId;

/// Represents a parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle playback of a record
    Play { id: RecordId },
    /// Report that a record's thumbnail failed to load
    ThumbnailFailed { id: RecordId },
    /// Stop whatever is playing
    Stop,
    /// Render the feed now
    Render,
    /// Quit the daemon
    Quit,
    /// Show help information
    Help,
}

pub const HELP: &str = "\
:play <id>    toggle the player of a record
:fail <id>    report a thumbnail load failure for a record
:stop         stop the active player
:render       render the feed now
:help         show this help
:quit         stop the daemon";

/// Parse a command line.
///
/// Commands must start with `:`. The leading `:` should be included in the input.
///
/// # Examples
///
/// ```
/// use vitalfeed_daemon::command::{parse_command, Command};
/// use vitalfeed_core::RecordId;
///
/// let cmd = parse_command(":quit").unwrap();
/// assert_eq!(cmd, Command::Quit);
///
/// let cmd = parse_command(":play hands-only-cpr").unwrap();
/// assert_eq!(cmd, Command::Play { id: RecordId::from("hands-only-cpr") });
/// ```
pub fn parse_command(input: &str) -> Result<Command> {
    let input = input.trim();

    let input = input
        .strip_prefix(':')
        .ok_or_else(|| anyhow!("Commands must start with ':'"))?;
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.is_empty() {
        return Err(anyhow!("Empty command"));
    }

    let name = parts[0].to_lowercase();
    match name.as_str() {
        "play" | "p" => Ok(Command::Play {
            id: single_record_id(&name, &parts)?,
        }),
        "fail" | "f" => Ok(Command::ThumbnailFailed {
            id: single_record_id(&name, &parts)?,
        }),
        "stop" => no_arguments(&name, &parts, Command::Stop),
        "render" | "r" => no_arguments(&name, &parts, Command::Render),
        "q" | "quit" => no_arguments(&name, &parts, Command::Quit),
        "help" | "h" => no_arguments(&name, &parts, Command::Help),
        other => Err(anyhow!("Unknown command: {}", other)),
    }
}

fn single_record_id(name: &str, parts: &[&str]) -> Result<RecordId> {
    match parts {
        [_, id] => Ok(RecordId::from(*id)),
        [_] => Err(anyhow!("{} command requires a record id", name)),
        _ => Err(anyhow!("{} command takes exactly one record id", name)),
    }
}

fn no_arguments(name: &str, parts: &[&str], command: Command) -> Result<Command> {
    if parts.len() > 1 {
        return Err(anyhow!("{} command takes no arguments", name));
    }
    Ok(command)
}
