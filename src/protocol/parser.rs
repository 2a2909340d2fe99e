//! Line Protocol Parser
//!
//! Requests are plain text, one command per line:
//!
//! ```text
//! SET key value [EX seconds]\n
//! GET key\n
//! DEL key\n
//! TTL key\n
//! ```
//!
//! Parsing happens in two steps:
//! 1. [`next_line`] frames the byte stream: it finds the next `\n` and returns
//!    the line (with any trailing `\r` stripped) plus the bytes consumed
//! 2. [`parse_line`] tokenizes the line on whitespace and validates the
//!    command name and arity, producing a [`Command`] or a [`CommandError`]
//!
//! Validation happens entirely here, before the store is touched, so a
//! rejected command never leaves the store half-updated.

use std::time::Duration;
use thiserror::Error;

/// The line terminator.
pub const LF: u8 = b'\n';

/// Largest accepted `EX` value: whole seconds that fit in `i64` nanoseconds.
pub const MAX_EXPIRE_SECS: u64 = i64::MAX as u64 / 1_000_000_000;

/// A validated command, ready to run against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `SET key value [EX seconds]`
    Set {
        key: String,
        value: String,
        ttl: Option<Duration>,
    },
    /// `GET key`
    Get { key: String },
    /// `DEL key`
    Del { key: String },
    /// `TTL key`
    Ttl { key: String },
}

impl Command {
    /// The upper-case command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
            Command::Ttl { .. } => "TTL",
        }
    }
}

/// Errors reported to the client when a line can't be turned into a command.
///
/// The connection stays open after any of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Wrong token count for a recognized command
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    /// The `EX` argument is not a non-negative integer
    #[error("ERR invalid expire time")]
    InvalidExpireTime,

    /// Unrecognized command name, or a blank line
    #[error("ERR unknown command")]
    UnknownCommand,
}

impl CommandError {
    /// Returns true for errors raised while handling `SET`.
    ///
    /// These go out on the wire without the leading `-` that every other
    /// error carries. Clients written against the existing server match on
    /// the exact bytes, so the two forms are kept.
    pub fn is_set_error(&self) -> bool {
        matches!(
            self,
            CommandError::WrongArity("SET") | CommandError::InvalidExpireTime
        )
    }
}

/// Finds the next complete line in the buffer.
///
/// # Returns
///
/// - `Some((line, consumed))` - `line` excludes the `\n` and any `\r` before
///   it; `consumed` includes the terminator
/// - `None` - no `\n` yet, need more data
pub fn next_line(buf: &[u8]) -> Option<(&[u8], usize)> {
    let pos = buf.iter().position(|&b| b == LF)?;
    let line = &buf[..pos];
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    Some((line, pos + 1))
}

/// Parses one request line into a [`Command`].
///
/// Surrounding whitespace is trimmed and tokens are split on runs of
/// whitespace. The command name and the `EX` keyword are case-insensitive.
///
/// # Example
///
/// ```
/// use medis::protocol::{parse_line, Command};
///
/// let cmd = parse_line("get name").unwrap();
/// assert_eq!(cmd, Command::Get { key: "name".to_string() });
/// ```
pub fn parse_line(line: &str) -> Result<Command, CommandError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let Some(name) = tokens.first() else {
        return Err(CommandError::UnknownCommand);
    };

    match name.to_ascii_uppercase().as_str() {
        "SET" => parse_set(&tokens),
        "GET" => single_key(&tokens, "GET").map(|key| Command::Get { key }),
        "DEL" => single_key(&tokens, "DEL").map(|key| Command::Del { key }),
        "TTL" => single_key(&tokens, "TTL").map(|key| Command::Ttl { key }),
        _ => Err(CommandError::UnknownCommand),
    }
}

/// `SET key value` or `SET key value EX seconds`
fn parse_set(tokens: &[&str]) -> Result<Command, CommandError> {
    let ttl = match tokens.len() {
        3 => None,
        5 if tokens[3].eq_ignore_ascii_case("EX") => Some(parse_expire_seconds(tokens[4])?),
        _ => return Err(CommandError::WrongArity("SET")),
    };

    Ok(Command::Set {
        key: tokens[1].to_string(),
        value: tokens[2].to_string(),
        ttl,
    })
}

fn parse_expire_seconds(token: &str) -> Result<Duration, CommandError> {
    match token.parse::<u64>() {
        Ok(secs) if secs <= MAX_EXPIRE_SECS => Ok(Duration::from_secs(secs)),
        _ => Err(CommandError::InvalidExpireTime),
    }
}

fn single_key(tokens: &[&str], name: &'static str) -> Result<String, CommandError> {
    match tokens {
        [_, key] => Ok(key.to_string()),
        _ => Err(CommandError::WrongArity(name)),
    }
}
