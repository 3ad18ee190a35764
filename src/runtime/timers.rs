//! Timers on a virtual clock

use crate::commands::TimerKind;

/// A timer waiting to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTimer {
    pub kind: TimerKind,
    pub sequence_id: u64,
    pub due_ms: u64,
}

/// At most one armed timer per kind; arming a kind again replaces it
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    armed: Vec<ArmedTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, kind: TimerKind, sequence_id: u64, due_ms: u64) {
        self.cancel(kind);
        self.armed.push(ArmedTimer {
            kind,
            sequence_id,
            due_ms,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.armed.retain(|t| t.kind != kind);
    }

    /// Remove and return the earliest timer due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: u64) -> Option<ArmedTimer> {
        let (index, _) = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by_key(|(_, t)| t.due_ms)?;
        Some(self.armed.remove(index))
    }

    /// When the next timer fires
    pub fn next_due(&self) -> Option<u64> {
        self.armed.iter().map(|t| t.due_ms).min()
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }
}
