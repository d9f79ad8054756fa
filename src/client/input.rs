//! Command line input
//!
//! Turns a line typed by the user into a validated `Command`. Everything here
//! runs before any network I/O.

use crate::error::{KvError, Result};
use crate::protocol::{Command, MAX_FIELD_LEN};

/// Shown after a rejected line and at startup
pub const USAGE: &str = "Please Input Command in either of the following forms:\n\
    \tGET <key>\n\
    \tPUT <key> <val>\n\
    \tDELETE <key>\n\
    \tQUIT";

/// Parse one input line
///
/// Tags are case-sensitive and operands are whitespace-separated, so keys and
/// values entered here cannot contain spaces.
pub fn parse_line(line: &str) -> Result<Command> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let command = match parts.as_slice() {
        ["GET", key] => Command::Get { key: key.to_string() },
        ["PUT", key, value] => Command::Put {
            key: key.to_string(),
            value: value.to_string(),
        },
        ["DELETE", key] => Command::Delete { key: key.to_string() },
        ["QUIT"] => Command::Quit,
        _ => return Err(KvError::InvalidFormat),
    };

    validate(&command)?;
    Ok(command)
}

/// Check the size limits of a command's operands
pub fn validate(command: &Command) -> Result<()> {
    let (key, value) = match command {
        Command::Get { key } | Command::Delete { key } => (key, None),
        Command::Put { key, value } => (key, Some(value)),
        Command::Quit => return Ok(()),
    };

    if key.len() > MAX_FIELD_LEN {
        return Err(KvError::KeyTooLarge { size: key.len() });
    }
    if let Some(value) = value {
        if value.len() > MAX_FIELD_LEN {
            return Err(KvError::ValueTooLarge { size: value.len() });
        }
    }
    Ok(())
}
