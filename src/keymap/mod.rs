//! Configurable keyboard mapping system
//!
//! This module provides a data-driven keybinding system that:
//! - Turns raw keyboard events into canonical key tokens, optionally by
//!   physical key position
//! - Parses vim-style key notation (`<C-o>`, `<leader>f`, `<S-Esc>`)
//! - Keeps one prefix tree of bindings per mode
//! - Enables user customization via YAML config files
//!
//! # Architecture
//!
//! ```text
//! RawKeyEvent → KeyNormalizer → KeyToken → KeymapTrie::step() → Binding → Cmd
//! ```
//!
//! # Loading Keymaps
//!
//! ```ignore
//! // Load from embedded defaults plus project and user overrides
//! let keymaps = Keymaps::with_bindings(load_default_keymap(), leader);
//!
//! // Or load from a YAML file
//! let keymaps = Keymaps::with_bindings(load_keymap_file(path)?, leader);
//! ```

mod binding;
mod command;
mod config;
mod context;
mod defaults;
#[allow(clippy::module_inception)]
mod keymap;
mod layout;
mod normalizer;
mod notation;
mod trie;
mod types;

pub use binding::{Binding, BindingOptions, Keybinding};
pub use command::{split_args, Command, CommandParseError};
pub use config::{
    load_keymap_file, parse_keymap_yaml, parse_keymap_yaml_lenient, BindingConfig, KeymapConfig,
    KeymapError,
};
pub use context::KeyContext;
pub use defaults::{
    default_bindings, get_default_keymap_yaml, load_default_keymap, load_keymap_layers,
    merge_bindings,
};
pub use keymap::{KeymapEntry, Keymaps};
pub use layout::{KeyboardLayout, LayoutPolicy, LayoutRegistry, Platform, BUILTIN_LAYOUT};
pub use normalizer::{normalize_event, KeyNormalizer, RawKeyEvent};
pub use notation::{normalize, parse_keystroke, split, split_keystrokes, NotationError};
pub use trie::{KeymapTrie, NodeId, Step};
pub use types::{display_sequence, KeyCode, KeyToken, Keystroke, Modifiers};

#[cfg(test)]
mod tests;
