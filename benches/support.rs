//! Shared helpers for benchmarks

use std::sync::Arc;

use keyseq::config::EngineConfig;
use keyseq::keymap::{load_keymap_layers, Command, Keybinding, Keymaps, Platform};
use keyseq::mode::Mode;
use keyseq::model::{WindowId, WindowModel};

/// Window with the embedded default keymap
#[allow(dead_code)]
pub fn make_model() -> WindowModel {
    let config = EngineConfig::default();
    let keymaps = Keymaps::with_bindings(load_keymap_layers(&[]), config.leader());
    WindowModel::new(WindowId(1), Arc::new(config), Arc::new(keymaps))
        .with_platform(Platform::Other)
}

/// `count` normal-mode bindings of two or three letters, like a large user keymap
#[allow(dead_code)]
pub fn synthetic_bindings(count: usize) -> Vec<Keybinding> {
    let letters: Vec<char> = ('a'..='z').collect();
    (0..count)
        .map(|i| {
            let mut keys = String::new();
            keys.push(letters[i % 26]);
            keys.push(letters[(i / 26) % 26]);
            if i >= 26 * 26 {
                keys.push(letters[(i / (26 * 26)) % 26]);
            }
            Keybinding::new(
                [Mode::Normal],
                keys.chars().map(keyseq::keymap::Keystroke::char).collect(),
                Command::Excmd(format!("command_{}", i)),
            )
        })
        .collect()
}
