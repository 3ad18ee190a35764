//! Back/forward history of activated targets
//!
//! Recording while somewhere in the middle of the list drops the forward
//! branch, like a browser's history. Jumping activates the entry through the
//! host, which reports the activation back; that one report is swallowed so
//! navigating the list does not record itself.

use std::collections::{HashSet, VecDeque};

use crate::model::TargetId;

pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpList {
    entries: VecDeque<TargetId>,
    /// `None` iff the list is empty
    index: Option<usize>,
    max_entries: usize,
    /// Set by a jump, cleared by the next record
    jumping: bool,
    /// Targets that no longer exist; jumps skip over them
    removed: HashSet<TargetId>,
}

impl Default for JumpList {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl JumpList {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: None,
            max_entries,
            jumping: false,
            removed: HashSet::new(),
        }
    }

    /// Record an activation
    ///
    /// Returns `false` when the activation was the echo of a jump.
    pub fn record(&mut self, target: TargetId) -> bool {
        if self.jumping {
            self.jumping = false;
            return false;
        }

        if let Some(index) = self.index {
            self.entries.truncate(index + 1);
        }
        self.entries.push_back(target);
        self.removed.remove(&target);
        self.index = Some(self.entries.len() - 1);
        self.trim();
        self.forget_dropped();
        true
    }

    /// Move to the closest older entry whose target still exists
    pub fn jump_backwards(&mut self) -> Option<TargetId> {
        let index = self.index?;
        let found = (0..index)
            .rev()
            .find(|&i| !self.removed.contains(&self.entries[i]))?;
        Some(self.jump_to(found))
    }

    /// Move to the closest newer entry whose target still exists
    pub fn jump_forwards(&mut self) -> Option<TargetId> {
        let index = self.index?;
        let found =
            (index + 1..self.entries.len()).find(|&i| !self.removed.contains(&self.entries[i]))?;
        Some(self.jump_to(found))
    }

    /// Mark a target as gone; its entries stay but are skipped
    pub fn on_target_removed(&mut self, target: TargetId) {
        if self.entries.contains(&target) {
            self.removed.insert(target);
        }
    }

    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
        self.trim();
        self.forget_dropped();
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn entries(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.entries.iter().copied()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<TargetId> {
        self.index.map(|i| self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_removed(&self, target: TargetId) -> bool {
        self.removed.contains(&target)
    }

    fn jump_to(&mut self, index: usize) -> TargetId {
        self.index = Some(index);
        self.jumping = true;
        self.entries[index]
    }

    /// Drop entries from the front until within bounds, shifting the index
    fn trim(&mut self) {
        let overflow = self.entries.len().saturating_sub(self.max_entries);
        if overflow == 0 {
            return;
        }
        self.entries.drain(..overflow);
        self.index = match self.index {
            _ if self.entries.is_empty() => None,
            Some(i) => Some(i.saturating_sub(overflow)),
            None => None,
        };
    }

    /// Removed-target marks only matter for targets still in the list
    fn forget_dropped(&mut self) {
        if !self.removed.is_empty() {
            let entries = &self.entries;
            self.removed.retain(|target| entries.contains(target));
        }
    }
}
