//! Per-mode keymaps built from keybindings

use serde::Serialize;

use super::binding::{Binding, Keybinding};
use super::trie::KeymapTrie;
use super::types::{KeyCode, KeyToken, Keystroke};
use crate::mode::Mode;

/// One listed binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeymapEntry<'a> {
    pub mode: Mode,
    pub keys: String,
    #[serde(flatten)]
    pub binding: &'a Binding,
}

/// A trie per mode, with `<leader>` resolved at build time
///
/// Rebuilt wholesale when configuration reloads and shared read-only
/// between windows.
#[derive(Debug, Clone)]
pub struct Keymaps {
    tries: [KeymapTrie; Mode::COUNT],
    leader: Keystroke,
    /// Source bindings in insertion order, for rebuilding under another leader
    bindings: Vec<Keybinding>,
}

impl Default for Keymaps {
    fn default() -> Self {
        Self::new(Keystroke::key(KeyCode::Space))
    }
}

impl Keymaps {
    /// Create empty keymaps
    pub fn new(leader: Keystroke) -> Self {
        Self {
            tries: Default::default(),
            leader,
            bindings: Vec::new(),
        }
    }

    /// Create keymaps with the given bindings, later bindings winning
    pub fn with_bindings(bindings: impl IntoIterator<Item = Keybinding>, leader: Keystroke) -> Self {
        let mut keymaps = Self::new(leader);
        for binding in bindings {
            keymaps.add_binding(binding);
        }
        keymaps
    }

    /// Add a binding to every mode it names; `Unbound` removes instead
    pub fn add_binding(&mut self, keybinding: Keybinding) {
        if keybinding.keystrokes.is_empty() {
            return;
        }

        let tokens = self.resolve(&keybinding.keystrokes);
        for &mode in &keybinding.modes {
            let trie = &mut self.tries[mode as usize];
            if keybinding.binding.command.is_unbound() {
                trie.delete(&tokens);
            } else {
                trie.insert(&tokens, keybinding.binding.clone());
            }
        }
        self.bindings.push(keybinding);
    }

    /// The same bindings with `<leader>` resolved to `leader`
    pub fn with_leader(&self, leader: Keystroke) -> Self {
        Self::with_bindings(self.bindings.iter().cloned(), leader)
    }

    /// Tokens for keystrokes, with `<leader>` replaced by the leader key
    pub fn resolve(&self, keystrokes: &[Keystroke]) -> Vec<KeyToken> {
        keystrokes
            .iter()
            .map(|stroke| stroke.resolve_leader(&self.leader).token())
            .collect()
    }

    pub fn leader(&self) -> &Keystroke {
        &self.leader
    }

    pub fn trie(&self, mode: Mode) -> &KeymapTrie {
        &self.tries[mode as usize]
    }

    /// Live binding for a complete sequence in `mode`
    pub fn lookup(&self, mode: Mode, keys: &[KeyToken]) -> Option<&Binding> {
        self.trie(mode).lookup(keys)
    }

    /// Live bindings of the given modes, mode by mode
    pub fn list(&self, modes: &[Mode]) -> Vec<KeymapEntry<'_>> {
        modes
            .iter()
            .flat_map(|&mode| {
                self.trie(mode)
                    .list()
                    .into_iter()
                    .map(move |(keys, binding)| KeymapEntry {
                        mode,
                        keys: super::types::display_sequence(&keys),
                        binding,
                    })
            })
            .collect()
    }

    /// Total live bindings across modes
    pub fn len(&self) -> usize {
        self.tries.iter().map(KeymapTrie::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{split, Command, Modifiers};

    fn bind(mode: Mode, keys: &str, command: &str) -> Keybinding {
        Keybinding::parse([mode], keys, command.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_bindings_are_per_mode() {
        let keymaps = Keymaps::with_bindings(
            [
                bind(Mode::Normal, "j", "scroll_down"),
                bind(Mode::Insert, "jj", "mode_change normal"),
            ],
            Keystroke::key(KeyCode::Space),
        );

        assert!(keymaps.lookup(Mode::Normal, &split("j").unwrap()).is_some());
        assert!(keymaps.lookup(Mode::Insert, &split("j").unwrap()).is_none());
        assert_eq!(keymaps.len(), 2);
    }

    #[test]
    fn test_leader_resolution() {
        let keymaps = Keymaps::with_bindings(
            [bind(Mode::Normal, "<leader>f", "find")],
            Keystroke::char('\\'),
        );
        assert!(keymaps.lookup(Mode::Normal, &split("<Bslash>f").unwrap()).is_some());
    }

    #[test]
    fn test_with_leader_rebuilds_everything() {
        let keymaps = Keymaps::with_bindings(
            [
                bind(Mode::Normal, "<leader>f", "find"),
                bind(Mode::Normal, "gg", "scroll_top"),
                bind(Mode::Normal, "gg", "Unbound"),
            ],
            Keystroke::key(KeyCode::Space),
        );

        let rebuilt = keymaps.with_leader(Keystroke::char(','));
        assert_eq!(rebuilt.leader(), &Keystroke::char(','));
        assert!(rebuilt.lookup(Mode::Normal, &split(",f").unwrap()).is_some());
        assert!(rebuilt.lookup(Mode::Normal, &split("<Space>f").unwrap()).is_none());
        assert!(rebuilt.lookup(Mode::Normal, &split("gg").unwrap()).is_none());
        assert_eq!(rebuilt.len(), keymaps.len());
    }

    #[test]
    fn test_leader_modifiers_merge() {
        let keymaps = Keymaps::with_bindings(
            [bind(Mode::Normal, "<D-leader>", "palette")],
            Keystroke::key(KeyCode::Space),
        );
        let tokens = vec![Keystroke::new(KeyCode::Space, Modifiers::META).token()];
        assert!(keymaps.lookup(Mode::Normal, &tokens).is_some());
    }

    #[test]
    fn test_unbound_removes() {
        let keymaps = Keymaps::with_bindings(
            [
                bind(Mode::Normal, "x", "close"),
                bind(Mode::Normal, "x", "Unbound"),
            ],
            Keystroke::key(KeyCode::Space),
        );
        assert!(keymaps.is_empty());
    }

    #[test]
    fn test_list_by_mode() {
        let keymaps = Keymaps::with_bindings(
            [
                Keybinding::parse(
                    [Mode::Normal, Mode::Visual],
                    "<Esc>",
                    Command::ModeChange(Mode::Normal),
                )
                .unwrap(),
                bind(Mode::Insert, "jj", "mode_change normal"),
            ],
            Keystroke::key(KeyCode::Space),
        );

        let listed: Vec<(Mode, String)> = keymaps
            .list(&[Mode::Visual, Mode::Normal])
            .into_iter()
            .map(|e| (e.mode, e.keys))
            .collect();
        assert_eq!(
            listed,
            [
                (Mode::Visual, "<Esc>".to_string()),
                (Mode::Normal, "<Esc>".to_string())
            ]
        );
    }
}
