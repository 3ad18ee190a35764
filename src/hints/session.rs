//! State of one visible set of hint labels

use super::{HintAssignment, HintOptions};

/// Result of typing into a hint session
#[derive(Debug, Clone, PartialEq)]
pub enum HintInput {
    /// Labels still matching the typed prefix
    Filtered(Vec<HintAssignment>),
    /// The typed text picked exactly one label
    Selected(HintAssignment),
    /// Nothing matches any more
    Cancelled,
}

/// Assignments on screen plus the label prefix typed so far
#[derive(Debug, Clone, PartialEq)]
pub struct HintSession {
    assignments: Vec<HintAssignment>,
    typed: String,
    pub options: HintOptions,
}

impl HintSession {
    pub fn new(assignments: Vec<HintAssignment>, options: HintOptions) -> Self {
        Self {
            assignments,
            typed: String::new(),
            options,
        }
    }

    pub fn assignments(&self) -> &[HintAssignment] {
        &self.assignments
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Assignments whose label starts with the typed prefix
    pub fn visible(&self) -> Vec<HintAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.label.starts_with(&self.typed))
            .cloned()
            .collect()
    }

    /// Type one more label character
    ///
    /// A label is selected once it matches exactly and no other visible
    /// label extends it.
    pub fn push(&mut self, c: char) -> HintInput {
        self.typed.push(c);
        let visible = self.visible();

        match visible.as_slice() {
            [] => HintInput::Cancelled,
            [only] if only.label == self.typed => HintInput::Selected(only.clone()),
            _ => HintInput::Filtered(visible),
        }
    }

    /// Remove the last typed character
    pub fn pop(&mut self) -> Vec<HintAssignment> {
        self.typed.pop();
        self.visible()
    }

    /// Pick the label matching the typed text exactly, or the only one left
    pub fn accept(&self) -> Option<HintAssignment> {
        let visible = self.visible();
        visible
            .iter()
            .find(|a| a.label == self.typed)
            .or(match visible.as_slice() {
                [only] => Some(only),
                _ => None,
            })
            .cloned()
    }
}
