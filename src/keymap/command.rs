//! Commands that key sequences can be bound to
//!
//! A handful of commands are understood by the engine itself; anything else
//! is an opaque command line handed to the host for execution.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::hints::HintOptions;
use crate::mode::{Mode, ModeRequest, UnknownMode};

/// Errors for malformed command text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unterminated quote in `{0}`")]
    UnterminatedQuote(String),

    #[error("`{command}` is missing its {argument} argument")]
    MissingArgument { command: String, argument: String },

    #[error("`{command}` does not accept `{option}`")]
    UnknownOption { command: String, option: String },

    #[error("invalid value `{value}` for `{option}`")]
    InvalidValue { option: String, value: String },

    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),
}

/// A bindable command
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// `mode_change <mode>`
    ModeChange(Mode),
    /// `hint [--auto[=always]] [--action=newtab] [--include <selector>] [--numeric]`
    Hint(HintOptions),
    /// `jumplist_back`
    JumpBackward,
    /// `jumplist_forward`
    JumpForward,
    /// Any other command line, executed by the host
    Excmd(String),
    /// Removes an inherited binding
    Unbound,
}

impl Command {
    /// Mode change implied by running this command
    pub fn mode_request(&self) -> ModeRequest {
        match self {
            Command::ModeChange(mode) => ModeRequest::Enter(*mode),
            // Hint mode starts once targets have been collected
            Command::Hint(_) => ModeRequest::None,
            Command::JumpBackward | Command::JumpForward | Command::Excmd(_) => {
                ModeRequest::RevertTransient
            }
            Command::Unbound => ModeRequest::None,
        }
    }

    /// Whether the host has to run this command
    pub fn is_host_command(&self) -> bool {
        matches!(self, Command::Excmd(_))
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, Command::Unbound)
    }
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let args = split_args(s)?;
        let Some((name, rest)) = args.split_first() else {
            return Err(CommandParseError::Empty);
        };

        let no_args = |command: Command| {
            match rest.first() {
                Some(extra) => Err(CommandParseError::UnknownOption {
                    command: name.clone(),
                    option: extra.clone(),
                }),
                None => Ok(command),
            }
        };

        match name.as_str() {
            "mode_change" => {
                let mode = rest.first().ok_or_else(|| CommandParseError::MissingArgument {
                    command: name.clone(),
                    argument: "mode".to_string(),
                })?;
                if let Some(extra) = rest.get(1) {
                    return Err(CommandParseError::UnknownOption {
                        command: name.clone(),
                        option: extra.clone(),
                    });
                }
                Ok(Command::ModeChange(mode.parse()?))
            }
            "hint" => Ok(Command::Hint(HintOptions::from_args(rest)?)),
            "jumplist_back" | "jump_backward" => no_args(Command::JumpBackward),
            "jumplist_forward" | "jump_forward" => no_args(Command::JumpForward),
            "Unbound" | "unbound" => no_args(Command::Unbound),
            _ => Ok(Command::Excmd(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ModeChange(mode) => write!(f, "mode_change {}", mode),
            Command::Hint(options) => write!(f, "hint{}", options),
            Command::JumpBackward => f.write_str("jumplist_back"),
            Command::JumpForward => f.write_str("jumplist_forward"),
            Command::Excmd(line) => f.write_str(line),
            Command::Unbound => f.write_str("Unbound"),
        }
    }
}

impl serde::Serialize for Command {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Command {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Split a command line into words, honouring single and double quotes
pub fn split_args(line: &str) -> Result<Vec<String>, CommandParseError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CommandParseError::UnterminatedQuote(line.to_string()));
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}
