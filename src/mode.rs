//! Editing modes and the automatic mode transition table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input modes, each with its own keymap
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual,
    OpPending,
    Ignore,
    Hint,
    Command,
}

impl Mode {
    pub const COUNT: usize = 7;

    pub const ALL: [Mode; Mode::COUNT] = [
        Mode::Normal,
        Mode::Insert,
        Mode::Visual,
        Mode::OpPending,
        Mode::Ignore,
        Mode::Hint,
        Mode::Command,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Visual => "visual",
            Mode::OpPending => "op-pending",
            Mode::Ignore => "ignore",
            Mode::Hint => "hint",
            Mode::Command => "command",
        }
    }

    /// Modes that only last for one operation and fall back to normal
    /// once a command completes or fails
    pub fn is_transient(self) -> bool {
        match self {
            Mode::OpPending | Mode::Hint => true,
            Mode::Normal | Mode::Insert | Mode::Visual | Mode::Ignore | Mode::Command => false,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode `{0}`")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Mode::Normal),
            "insert" => Ok(Mode::Insert),
            "visual" => Ok(Mode::Visual),
            "op-pending" | "op_pending" | "oppending" => Ok(Mode::OpPending),
            "ignore" => Ok(Mode::Ignore),
            "hint" => Ok(Mode::Hint),
            "command" => Ok(Mode::Command),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// What a command wants to happen to the mode once it has run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModeRequest {
    /// Leave the mode alone
    #[default]
    None,
    /// Switch to a mode
    Enter(Mode),
    /// Drop out of a transient mode back to normal
    RevertTransient,
}

/// Environment changes that may switch modes on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeEvent {
    EditableFocused,
    EditableBlurred,
    FullscreenEntered,
    FullscreenExited,
}

/// Current mode of one window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeState {
    pub mode: Mode,
    /// Sticky modes ignore focus and fullscreen changes
    pub sticky: bool,
    /// Bumped on every mode change; late command completions compare against it
    pub generation: u64,
}

impl ModeState {
    /// Switch modes, returning the previous mode if it changed
    ///
    /// `ignore` is always sticky and `normal` never is.
    pub fn transition(&mut self, mode: Mode, sticky: bool) -> Option<Mode> {
        self.sticky = match mode {
            Mode::Ignore => true,
            Mode::Normal => false,
            _ => sticky,
        };

        if self.mode == mode {
            return None;
        }

        let old = std::mem::replace(&mut self.mode, mode);
        self.generation += 1;
        Some(old)
    }

    /// Mode an automatic event should switch to, if any
    pub fn auto_transition(&self, event: ModeEvent) -> Option<Mode> {
        if self.sticky {
            return None;
        }

        use ModeEvent::*;
        match (self.mode, event) {
            (Mode::Normal, EditableFocused | FullscreenEntered) => Some(Mode::Insert),
            (Mode::Normal, EditableBlurred | FullscreenExited) => None,

            (Mode::Insert, EditableFocused | FullscreenEntered) => None,
            (Mode::Insert, EditableBlurred | FullscreenExited) => Some(Mode::Normal),

            (Mode::Visual, EditableFocused | FullscreenEntered) => Some(Mode::Insert),
            (Mode::Visual, EditableBlurred | FullscreenExited) => None,

            (Mode::OpPending, EditableFocused | FullscreenEntered) => Some(Mode::Insert),
            (Mode::OpPending, EditableBlurred | FullscreenExited) => None,

            // Only reachable when stickiness was lifted elsewhere
            (Mode::Ignore, _) => None,

            // Hint labels and the command line own focus while they are up
            (Mode::Hint, _) => None,
            (Mode::Command, _) => None,
        }
    }
}

/// `old:new` pattern for mode change autocmds, `*` matching any mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChangePattern {
    pub from: Option<Mode>,
    pub to: Option<Mode>,
}

impl ModeChangePattern {
    pub fn matches(&self, old: Mode, new: Mode) -> bool {
        self.from.is_none_or(|m| m == old) && self.to.is_none_or(|m| m == new)
    }
}

impl FromStr for ModeChangePattern {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn side(part: &str) -> Result<Option<Mode>, UnknownMode> {
            match part.trim() {
                "*" | "" => Ok(None),
                name => name.parse().map(Some),
            }
        }

        match s.split_once(':') {
            Some((from, to)) => Ok(Self {
                from: side(from)?,
                to: side(to)?,
            }),
            None => Ok(Self {
                from: None,
                to: side(s)?,
            }),
        }
    }
}

impl fmt::Display for ModeChangePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |m: Option<Mode>| m.map_or("*", Mode::as_str);
        write!(f, "{}:{}", side(self.from), side(self.to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(mode: Mode, sticky: bool) -> ModeState {
        ModeState {
            mode,
            sticky,
            generation: 0,
        }
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>(), Ok(mode));
        }
        assert!("bogus".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_yaml_name() {
        let mode: Mode = serde_yaml::from_str("op-pending").unwrap();
        assert_eq!(mode, Mode::OpPending);
    }

    #[test]
    fn test_transition_bumps_generation() {
        let mut s = ModeState::default();
        assert_eq!(s.transition(Mode::Insert, false), Some(Mode::Normal));
        assert_eq!(s.generation, 1);
        assert_eq!(s.transition(Mode::Insert, false), None);
        assert_eq!(s.generation, 1);
    }

    #[test]
    fn test_ignore_is_always_sticky() {
        let mut s = ModeState::default();
        s.transition(Mode::Ignore, false);
        assert!(s.sticky);
        s.transition(Mode::Normal, true);
        assert!(!s.sticky);
    }

    #[test]
    fn test_focus_transitions() {
        assert_eq!(
            state(Mode::Normal, false).auto_transition(ModeEvent::EditableFocused),
            Some(Mode::Insert)
        );
        assert_eq!(
            state(Mode::Insert, false).auto_transition(ModeEvent::EditableBlurred),
            Some(Mode::Normal)
        );
        assert_eq!(
            state(Mode::Ignore, true).auto_transition(ModeEvent::EditableFocused),
            None
        );
        assert_eq!(
            state(Mode::Ignore, true).auto_transition(ModeEvent::FullscreenExited),
            None
        );
        assert_eq!(
            state(Mode::Insert, true).auto_transition(ModeEvent::EditableBlurred),
            None
        );
        assert_eq!(
            state(Mode::Normal, false).auto_transition(ModeEvent::FullscreenEntered),
            Some(Mode::Insert)
        );
    }

    #[test]
    fn test_mode_change_pattern() {
        let pattern: ModeChangePattern = "insert:normal".parse().unwrap();
        assert!(pattern.matches(Mode::Insert, Mode::Normal));
        assert!(!pattern.matches(Mode::Visual, Mode::Normal));

        let pattern: ModeChangePattern = "*:hint".parse().unwrap();
        assert!(pattern.matches(Mode::Normal, Mode::Hint));
        assert!(pattern.matches(Mode::Insert, Mode::Hint));

        let pattern: ModeChangePattern = "*".parse().unwrap();
        assert!(pattern.matches(Mode::Ignore, Mode::Normal));
        assert_eq!(pattern.to_string(), "*:*");

        assert!("nope:normal".parse::<ModeChangePattern>().is_err());
    }
}
