//! Window model - the complete input state of one browser window
//!
//! This module contains all the state types following the Elm Architecture
//! pattern. Only the update functions mutate it.

pub mod registry;

pub use registry::WindowRegistry;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::commands::{CommandTicket, TimerKind};
use crate::config::EngineConfig;
use crate::hints::{HintOptions, HintSession};
use crate::jumplist::JumpList;
use crate::keymap::{
    display_sequence, Binding, KeyNormalizer, KeyToken, KeyboardLayout, Keymaps, NodeId,
    Platform, RawKeyEvent,
};
use crate::mode::{Mode, ModeState};

/// Unique identifier for a browser window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

/// Unique identifier for something that can be activated (tab, link, element)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One key of a pending sequence
#[derive(Debug, Clone, PartialEq)]
pub struct PendingKey {
    pub event: RawKeyEvent,
    pub token: KeyToken,
    /// The event was already delivered to the page (insert mode)
    pub passed_through: bool,
}

/// A binding that matched but may still be extended by a longer one
#[derive(Debug, Clone, PartialEq)]
pub struct HeldBinding {
    pub binding: Binding,
    /// How many pending keys the binding consumed
    pub len: usize,
}

/// Partially typed key sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingState {
    pub keys: Vec<PendingKey>,
    /// Trie node reached by `keys`, `None` at the root
    pub node: Option<NodeId>,
    pub held: Option<HeldBinding>,
    /// Timer currently armed for this sequence
    pub timer: Option<TimerKind>,
    /// Bumped whenever the sequence changes; timers carry it to detect staleness
    pub sequence_id: u64,
}

impl PendingState {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn tokens(&self) -> Vec<KeyToken> {
        self.keys.iter().map(|k| k.token.clone()).collect()
    }

    /// The typed keys in notation form, e.g. `g` or `<Space>f`
    pub fn display(&self) -> String {
        display_sequence(&self.tokens())
    }

    /// Arm a timer for the current sequence, returning its id
    pub fn arm(&mut self, kind: TimerKind) -> u64 {
        self.sequence_id += 1;
        self.timer = Some(kind);
        self.sequence_id
    }

    /// Drop the sequence, returning it along with the timer that was armed
    ///
    /// The sequence id moves on so a timer still in flight is stale.
    pub fn take(&mut self) -> (Vec<PendingKey>, Option<HeldBinding>, Option<TimerKind>) {
        self.sequence_id += 1;
        self.node = None;
        (
            std::mem::take(&mut self.keys),
            self.held.take(),
            self.timer.take(),
        )
    }
}

/// A hint command waiting for the host to report targets
#[derive(Debug, Clone, PartialEq)]
pub struct HintRequest {
    pub id: u64,
    pub options: HintOptions,
}

/// Input state of one window
#[derive(Debug, Clone)]
pub struct WindowModel {
    pub id: WindowId,
    pub config: Arc<EngineConfig>,
    pub keymaps: Arc<Keymaps>,
    /// Active physical layout, resolved from `config`
    pub layout: KeyboardLayout,
    pub platform: Platform,
    pub mode: ModeState,
    pub pending: PendingState,
    /// Operator shown while in op-pending mode
    pub operator: Option<String>,
    /// What the host is currently showing as the typed sequence
    pub display: String,
    pub jumplist: JumpList,
    pub hints: Option<HintSession>,
    pub hint_request: Option<HintRequest>,
    next_id: u64,
}

impl WindowModel {
    pub fn new(id: WindowId, config: Arc<EngineConfig>, keymaps: Arc<Keymaps>) -> Self {
        let layout = config.active_layout();
        let jumplist = JumpList::new(config.jumplist_max_entries);
        Self {
            id,
            config,
            keymaps,
            layout,
            platform: Platform::current(),
            mode: ModeState::default(),
            pending: PendingState::default(),
            operator: None,
            display: String::new(),
            jumplist,
            hints: None,
            hint_request: None,
            next_id: 0,
        }
    }

    /// Pretend to run on another platform (only affects `LayoutPolicy::Auto`)
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn current_mode(&self) -> Mode {
        self.mode.mode
    }

    /// Swap in new configuration, refreshing everything derived from it
    pub fn set_config(&mut self, config: Arc<EngineConfig>) {
        self.layout = config.active_layout();
        self.jumplist.set_max_entries(config.jumplist_max_entries);
        self.config = config;
    }

    /// Mutable access to this window's own copy of the configuration
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        Arc::make_mut(&mut self.config)
    }

    /// Re-derive cached state after `config_mut` edits
    pub fn refresh_config(&mut self) {
        self.set_config(Arc::clone(&self.config));
    }

    /// Rebuild this window's keymaps if `mapleader` no longer matches them
    ///
    /// Pending node ids belong to the old tries, so the sequence is dropped.
    pub fn rebind_leader(&mut self) {
        let leader = self.config.leader();
        if &leader == self.keymaps.leader() {
            return;
        }
        tracing::debug!(
            target: "keys",
            "Leader {} → {}, rebuilding keymaps for window {}",
            self.keymaps.leader(),
            leader,
            self.id
        );
        self.pending.take();
        self.keymaps = Arc::new(self.keymaps.with_leader(leader));
    }

    pub fn normalizer(&self) -> KeyNormalizer<'_> {
        KeyNormalizer::new(Some(&self.layout), self.config.keymaps_use_physical_layout)
            .with_platform(self.platform)
    }

    /// Ticket for a command dispatched now
    pub fn next_ticket(&mut self) -> CommandTicket {
        CommandTicket {
            id: self.next_id(),
            generation: self.mode.generation,
        }
    }

    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Text the pending-keys display should show right now
    pub fn pending_display(&self) -> String {
        let mut text = self.operator.clone().unwrap_or_default();
        text.push_str(&self.pending.display());
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{split, Keystroke};

    fn key(token: &str) -> PendingKey {
        let token = split(token).unwrap().remove(0);
        PendingKey {
            event: RawKeyEvent::new(token.as_str()),
            token,
            passed_through: false,
        }
    }

    #[test]
    fn test_pending_take_invalidates_timer() {
        let mut pending = PendingState::default();
        pending.keys.push(key("g"));
        let id = pending.arm(TimerKind::Idle);

        let (keys, held, timer) = pending.take();
        assert_eq!(keys.len(), 1);
        assert!(held.is_none());
        assert_eq!(timer, Some(TimerKind::Idle));
        assert!(pending.is_empty());
        assert_ne!(pending.sequence_id, id);
    }

    #[test]
    fn test_pending_display() {
        let mut pending = PendingState::default();
        pending.keys.push(key("<Space>"));
        pending.keys.push(key("f"));
        assert_eq!(pending.display(), "<Space>f");
    }

    #[test]
    fn test_tickets_carry_generation() {
        let mut model = WindowModel::new(
            WindowId(1),
            Arc::new(EngineConfig::default()),
            Arc::new(Keymaps::new(Keystroke::char(','))),
        );
        let first = model.next_ticket();
        model.mode.transition(Mode::Insert, false);
        let second = model.next_ticket();

        assert_ne!(first.id, second.id);
        assert_eq!(first.generation + 1, second.generation);
    }

    #[test]
    fn test_config_mut_refreshes_jumplist_bound() {
        let mut model = WindowModel::new(
            WindowId(1),
            Arc::new(EngineConfig::default()),
            Arc::new(Keymaps::default()),
        );
        model.config_mut().jumplist_max_entries = 3;
        model.refresh_config();
        assert_eq!(model.jumplist.max_entries(), 3);
    }
}
