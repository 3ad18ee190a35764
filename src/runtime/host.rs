//! The host side of the engine: running commands and finding hint targets

use std::collections::HashMap;

use crate::hints::{HintOptions, HintTarget};
use crate::keymap::{Binding, KeyContext};
use crate::messages::CommandResult;

/// Effects only the embedding application can carry out
pub trait Host {
    /// Run a host command line, answering with its outcome
    fn run_command(&mut self, binding: &Binding, context: &KeyContext) -> CommandResult;

    /// Targets for a hint request
    fn hint_targets(&mut self, options: &HintOptions) -> Vec<HintTarget>;
}

/// Host with canned answers, for replays and tests
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    pub targets: Vec<HintTarget>,
    /// Command line → error message
    pub failures: HashMap<String, String>,
    /// Command lines run so far
    pub executed: Vec<String>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targets(mut self, targets: Vec<HintTarget>) -> Self {
        self.targets = targets;
        self
    }

    /// Make `command` fail with `message`
    pub fn failing(mut self, command: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(command.into(), message.into());
        self
    }
}

impl Host for ScriptedHost {
    fn run_command(&mut self, binding: &Binding, _context: &KeyContext) -> CommandResult {
        let line = binding.command.to_string();
        self.executed.push(line.clone());
        match self.failures.get(&line) {
            Some(message) => Err(message.clone()),
            None => Ok(None),
        }
    }

    fn hint_targets(&mut self, _options: &HintOptions) -> Vec<HintTarget> {
        self.targets.clone()
    }
}
