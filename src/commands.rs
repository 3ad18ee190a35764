//! Commands - side effects returned by update functions
//!
//! The engine never talks to the host directly. Every effect (running a
//! command, showing hint labels, arming a timer, letting a key through) is
//! described by a `Cmd` and carried out by whoever drives the update loop.

use std::fmt;

use serde::Serialize;

use crate::hints::{HintAction, HintAssignment, HintOptions};
use crate::keymap::{Binding, KeyContext, RawKeyEvent};
use crate::mode::Mode;
use crate::model::TargetId;

/// Identifies one dispatched command so its completion can be matched up
///
/// `generation` is the mode generation at dispatch time; a completion whose
/// generation is no longer current may not change the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CommandTicket {
    pub id: u64,
    pub generation: u64,
}

/// Which pending-sequence timer fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// A binding matched but longer bindings share its prefix
    TieBreak,
    /// A partial sequence is waiting for its next key
    Idle,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::TieBreak => f.write_str("tie-break"),
            TimerKind::Idle => f.write_str("idle"),
        }
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,

    /// Run a bound command; answer with `Msg::CommandFinished`
    Execute {
        binding: Binding,
        context: KeyContext,
        ticket: CommandTicket,
    },

    /// The window switched modes
    ModeChanged { old: Mode, new: Mode },

    /// Run a `ModeChanged` autocmd command line
    RunAutocmd {
        pattern: String,
        command: String,
        old: Mode,
        new: Mode,
    },

    /// Show the typed sequence (empty string clears)
    DisplayPending(String),

    /// The pending sequence changed
    KeyState {
        mode: Mode,
        sequence: String,
        partial: bool,
    },

    /// Ask the host for hintable targets; answer with `Msg::HintTargets`
    CollectHintTargets { options: HintOptions, request: u64 },

    /// Draw labels next to targets
    ShowHints(Vec<HintAssignment>),

    /// Only these labels still match the typed prefix
    FilterHints {
        typed: String,
        visible: Vec<HintAssignment>,
    },

    /// Remove all labels
    ClearHints,

    /// A label was picked
    SelectHint {
        target: TargetId,
        action: HintAction,
    },

    /// Activate a target (jumplist navigation)
    Activate(TargetId),

    /// Deliver the key to the focused page element unchanged
    PassThrough(RawKeyEvent),

    /// Arm a timer; answer with `Msg::TimerElapsed` after `delay_ms`
    StartTimer {
        kind: TimerKind,
        sequence_id: u64,
        delay_ms: u64,
    },

    /// Disarm a timer of this kind
    CancelTimer { kind: TimerKind },

    /// Show a message to the user
    Notify { level: NotifyLevel, message: String },

    /// Multiple commands to execute in order
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, flattening nested batches and dropping `None`
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut flat: Vec<Cmd> = cmds.into_iter().flat_map(Cmd::into_vec).collect();
        match flat.len() {
            0 => Cmd::None,
            1 => flat.remove(0),
            _ => Cmd::Batch(flat),
        }
    }

    /// Convert Option<Cmd> to Cmd (None becomes Cmd::None)
    pub fn from_option(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }

    /// `Some(self)` unless this is `Cmd::None`
    pub fn into_option(self) -> Option<Cmd> {
        match self {
            Cmd::None => None,
            cmd => Some(cmd),
        }
    }

    /// Flatten into the individual commands, in execution order
    pub fn into_vec(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_vec).collect(),
            cmd => vec![cmd],
        }
    }

    pub fn notify(level: NotifyLevel, message: impl Into<String>) -> Self {
        Cmd::Notify {
            level,
            message: message.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }
}

impl From<Option<Cmd>> for Cmd {
    fn from(opt: Option<Cmd>) -> Self {
        Cmd::from_option(opt)
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cmd::None => f.write_str("none"),
            Cmd::Execute {
                binding,
                context,
                ticket,
            } => write!(
                f,
                "execute {:?} keys={} mode={} ticket={}@{}",
                binding.command.to_string(),
                context.keys,
                context.mode,
                ticket.id,
                ticket.generation
            ),
            Cmd::ModeChanged { old, new } => write!(f, "mode {} -> {}", old, new),
            Cmd::RunAutocmd {
                pattern, command, ..
            } => write!(f, "autocmd ModeChanged {} {:?}", pattern, command),
            Cmd::DisplayPending(keys) if keys.is_empty() => f.write_str("display clear"),
            Cmd::DisplayPending(keys) => write!(f, "display {}", keys),
            Cmd::KeyState {
                mode,
                sequence,
                partial,
            } => write!(f, "keystate {} {:?} partial={}", mode, sequence, partial),
            Cmd::CollectHintTargets { options, request } => {
                write!(f, "collect-hints #{}{}", request, options)
            }
            Cmd::ShowHints(assignments) => {
                f.write_str("show-hints")?;
                for a in assignments {
                    write!(f, " {}={}", a.label, a.target.id)?;
                }
                Ok(())
            }
            Cmd::FilterHints { typed, visible } => {
                write!(f, "filter-hints {:?} ({} left)", typed, visible.len())
            }
            Cmd::ClearHints => f.write_str("clear-hints"),
            Cmd::SelectHint { target, action } => write!(f, "select {} {:?}", target, action),
            Cmd::Activate(target) => write!(f, "activate {}", target),
            Cmd::PassThrough(event) => write!(f, "pass-through {:?}", event.key),
            Cmd::StartTimer {
                kind,
                sequence_id,
                delay_ms,
            } => write!(f, "timer {} #{} {}ms", kind, sequence_id, delay_ms),
            Cmd::CancelTimer { kind } => write!(f, "cancel-timer {}", kind),
            Cmd::Notify { level, message } => write!(f, "notify {:?}: {}", level, message),
            Cmd::Batch(cmds) => {
                for (i, cmd) in cmds.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{}", cmd)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_flattens_and_drops_none() {
        let cmd = Cmd::batch(vec![
            Cmd::None,
            Cmd::Batch(vec![Cmd::ClearHints, Cmd::None]),
            Cmd::DisplayPending(String::new()),
        ]);
        assert_eq!(
            cmd,
            Cmd::Batch(vec![Cmd::ClearHints, Cmd::DisplayPending(String::new())])
        );
    }

    #[test]
    fn test_batch_of_one_unwraps() {
        assert_eq!(Cmd::batch(vec![Cmd::None, Cmd::ClearHints]), Cmd::ClearHints);
        assert_eq!(Cmd::batch(vec![]), Cmd::None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Cmd::from(None), Cmd::None);
        assert_eq!(Cmd::from(Some(Cmd::ClearHints)), Cmd::ClearHints);
        assert_eq!(Cmd::None.into_option(), None);
    }
}
