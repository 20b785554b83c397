//! Command definitions
//!
//! Text commands understood by the `logcask` shell.
//!
//! ## Syntax
//! ```text
//! put <key> <value...>   value is the rest of the line, may be empty
//! get <key>
//! del <key>
//! keys
//! sync
//! ```
//! The token `""` stands for the empty key.

use crate::error::Result;
use crate::CaskError;

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: Vec<u8> },

    /// Put a key-value pair
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },

    /// List live keys
    Keys,

    /// Sync the active file
    Sync,
}

impl Command {
    /// Parse one line of input
    ///
    /// A command that needs a key but has none fails with
    /// [`CaskError::KeyRequired`].
    pub fn parse(line: &str) -> Result<Self> {
        let (verb, rest) = split_token(line);

        match verb.to_ascii_lowercase().as_str() {
            "get" => Ok(Command::Get {
                key: only_key(rest)?,
            }),
            "put" | "set" => {
                let (key, value) = split_token(rest);
                Ok(Command::Put {
                    key: key_bytes(key)?,
                    value: value.as_bytes().to_vec(),
                })
            }
            "del" | "delete" => Ok(Command::Delete {
                key: only_key(rest)?,
            }),
            "keys" => no_arguments(rest, Command::Keys),
            "sync" => no_arguments(rest, Command::Sync),
            "" => Err(CaskError::InvalidCommand("empty command".to_string())),
            other => Err(CaskError::InvalidCommand(format!(
                "unknown command: {}",
                other
            ))),
        }
    }

    /// Whether this command reads a value
    pub fn is_read(&self) -> bool {
        matches!(self, Command::Get { .. } | Command::Keys)
    }
}

/// Split off the first whitespace-delimited token
fn split_token(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], input[end..].trim_start()),
        None => (input, ""),
    }
}

fn key_bytes(token: &str) -> Result<Vec<u8>> {
    match token {
        "" => Err(CaskError::KeyRequired),
        "\"\"" => Ok(Vec::new()),
        key => Ok(key.as_bytes().to_vec()),
    }
}

fn only_key(rest: &str) -> Result<Vec<u8>> {
    let (key, extra) = split_token(rest);
    if !extra.is_empty() {
        return Err(CaskError::InvalidCommand(format!(
            "unexpected arguments: {}",
            extra
        )));
    }
    key_bytes(key)
}

fn no_arguments(rest: &str, command: Command) -> Result<Command> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CaskError::InvalidCommand(format!(
            "unexpected arguments: {}",
            rest
        )))
    }
}
