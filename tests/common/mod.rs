//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;

use keyseq::commands::Cmd;
use keyseq::config::EngineConfig;
use keyseq::hints::HintTarget;
use keyseq::keymap::{
    load_keymap_layers, parse_keystroke, Command, Keybinding, Keymaps, Platform, RawKeyEvent,
};
use keyseq::mode::Mode;
use keyseq::model::{TargetId, WindowId, WindowModel};
use keyseq::runtime::{Runtime, ScriptedHost};

/// A binding in the given modes
pub fn bind(modes: &[Mode], keys: &str, command: &str) -> Keybinding {
    let command: Command = command.parse().expect("valid command");
    Keybinding::parse(modes.to_vec(), keys, command).expect("valid notation")
}

/// A normal-mode binding
pub fn normal(keys: &str, command: &str) -> Keybinding {
    bind(&[Mode::Normal], keys, command)
}

/// Window with only `bindings`, default config and `,` as leader
pub fn test_model(bindings: Vec<Keybinding>) -> WindowModel {
    test_model_with_config(EngineConfig::default(), bindings)
}

pub fn test_model_with_config(config: EngineConfig, bindings: Vec<Keybinding>) -> WindowModel {
    let leader = parse_keystroke(",").expect("valid leader");
    let keymaps = Keymaps::with_bindings(bindings, leader);
    WindowModel::new(WindowId(1), Arc::new(config), Arc::new(keymaps))
        .with_platform(Platform::Other)
}

/// Window with the embedded default keymap and default config
pub fn default_model() -> WindowModel {
    let config = EngineConfig::default();
    let keymaps = Keymaps::with_bindings(load_keymap_layers(&[]), config.leader());
    WindowModel::new(WindowId(1), Arc::new(config), Arc::new(keymaps))
        .with_platform(Platform::Other)
}

/// `count` targets stacked down the page, ids starting at 1
pub fn targets(count: u64) -> Vec<HintTarget> {
    (1..=count)
        .map(|i| HintTarget::new(TargetId(i), 10, i as i32 * 20))
        .collect()
}

/// Runtime with a host that knows `count` hint targets
pub fn runtime_with_targets(model: WindowModel, count: u64) -> Runtime<ScriptedHost> {
    Runtime::new(model, ScriptedHost::new().with_targets(targets(count)))
}

pub fn runtime(model: WindowModel) -> Runtime<ScriptedHost> {
    runtime_with_targets(model, 5)
}

/// Raw event for one keystroke in notation
pub fn key(notation: &str) -> RawKeyEvent {
    RawKeyEvent::from_keystroke(&parse_keystroke(notation).expect("valid notation"))
}

/// Flatten an optional update result
pub fn cmds(cmd: Option<Cmd>) -> Vec<Cmd> {
    cmd.map(Cmd::into_vec).unwrap_or_default()
}

/// Command lines sent to the host for execution
pub fn executed(cmds: &[Cmd]) -> Vec<String> {
    cmds.iter()
        .filter_map(|cmd| match cmd {
            Cmd::Execute { binding, .. } => Some(binding.command.to_string()),
            _ => None,
        })
        .collect()
}

/// `(old, new)` of every mode change
pub fn mode_changes(cmds: &[Cmd]) -> Vec<(Mode, Mode)> {
    cmds.iter()
        .filter_map(|cmd| match cmd {
            Cmd::ModeChanged { old, new } => Some((*old, *new)),
            _ => None,
        })
        .collect()
}

/// Events passed through to the page, as their key values
pub fn passed_through(cmds: &[Cmd]) -> Vec<String> {
    cmds.iter()
        .filter_map(|cmd| match cmd {
            Cmd::PassThrough(event) => Some(event.key.clone()),
            _ => None,
        })
        .collect()
}
