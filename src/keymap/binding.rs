//! Keybinding struct representing a mapping from a key sequence to a command

use serde::Serialize;

use super::command::Command;
use super::notation::{split_keystrokes, NotationError};
use super::types::Keystroke;
use crate::mode::Mode;

/// Per-binding behaviour flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BindingOptions {
    /// Keep the typed sequence visible after the command runs
    pub retain_key_display: bool,
}

/// What a key sequence resolves to, as stored in a trie
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Binding {
    pub command: Command,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: BindingOptions,
}

impl Binding {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            description: None,
            options: BindingOptions::default(),
        }
    }
}

/// A binding of a key sequence in one or more modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub modes: Vec<Mode>,
    /// The keystroke sequence, `<leader>` still unresolved
    pub keystrokes: Vec<Keystroke>,
    pub binding: Binding,
}

impl Keybinding {
    /// Create a binding from already parsed keystrokes
    pub fn new(modes: impl Into<Vec<Mode>>, keystrokes: Vec<Keystroke>, command: Command) -> Self {
        Self {
            modes: modes.into(),
            keystrokes,
            binding: Binding::new(command),
        }
    }

    /// Create a binding from key notation such as `<leader>f`
    pub fn parse(
        modes: impl Into<Vec<Mode>>,
        notation: &str,
        command: Command,
    ) -> Result<Self, NotationError> {
        let keystrokes = split_keystrokes(notation)?;
        if keystrokes.is_empty() {
            return Err(NotationError::Empty);
        }
        Ok(Self::new(modes, keystrokes, command))
    }

    /// Attach a description (builder pattern)
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.binding.description = Some(description.into());
        self
    }

    /// Keep the typed keys on screen after executing
    pub fn retain_key_display(mut self, retain: bool) -> Self {
        self.binding.options.retain_key_display = retain;
        self
    }

    pub fn command(&self) -> &Command {
        &self.binding.command
    }

    /// Whether both bindings bind the same keys in at least one common mode
    pub fn overlaps(&self, other: &Keybinding) -> bool {
        self.keystrokes == other.keystrokes && self.modes.iter().any(|m| other.modes.contains(m))
    }

    /// Get display string for this keybinding
    pub fn display_string(&self) -> String {
        self.keystrokes.iter().map(|k| k.token().to_string()).collect()
    }
}
