//! Configuration system tests
//!
//! Tests for config paths, engine config files, option overrides and keymap
//! loading/merging.

mod common;

use std::sync::Arc;

use common::{cmds, normal};

use keyseq::config::{ConfigError, EngineConfig};
use keyseq::config_paths;
use keyseq::keymap::{
    default_bindings, load_keymap_layers, merge_bindings, parse_keymap_yaml,
    parse_keymap_yaml_lenient, Command, KeyToken, Keymaps, LayoutPolicy, RawKeyEvent,
};
use keyseq::messages::Msg;
use keyseq::mode::Mode;
use keyseq::model::{WindowId, WindowModel};
use keyseq::scope::{OptionStore, ScopedOverride};
use keyseq::update::update;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("keyseq"));
    }
}

#[test]
fn test_config_files_live_in_config_dir() {
    if let (Some(dir), Some(config), Some(keymap)) = (
        config_paths::config_dir(),
        config_paths::config_file(),
        config_paths::keymap_file(),
    ) {
        assert_eq!(config.parent(), Some(dir.as_path()));
        assert_eq!(keymap.parent(), Some(dir.as_path()));
        assert!(config.to_string_lossy().ends_with("config.yaml"));
        assert!(keymap.to_string_lossy().ends_with("keymap.yaml"));
    }
}

// ========================================================================
// Engine Config Files
// ========================================================================

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "tie_break_timeout_ms: 75\nmapleader: \",\"\n").unwrap();

    let config = EngineConfig::load_from(&path).unwrap();
    assert_eq!(config.tie_break_timeout_ms, 75);
    assert_eq!(config.mapleader, ",");
    assert_eq!(config.mapping_timeout_ms, EngineConfig::default().mapping_timeout_ms);
    assert_eq!(config.hint_chars, EngineConfig::default().hint_chars);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let mut config = EngineConfig::default();
    config.keymaps_use_physical_layout = LayoutPolicy::Force;
    config.hint_char_weights.insert('h', 3);
    config.save_to(&path).unwrap();

    assert_eq!(EngineConfig::load_from(&path).unwrap(), config);
}

#[test]
fn test_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = EngineConfig::load_from(&dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_unknown_layout_is_rejected() {
    let result = EngineConfig::from_yaml("keyboard_layout: colemak\n");
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { ref option, .. }) if option == "keyboard_layout"
    ));
}

#[test]
fn test_legacy_policy_name_is_accepted() {
    let config =
        EngineConfig::from_yaml("keymaps_use_physical_layout: for_macos_option_modifier\n")
            .unwrap();
    assert_eq!(config.keymaps_use_physical_layout, LayoutPolicy::Auto);
}

#[test]
fn test_custom_layout_drives_normalization() {
    let yaml = r#"
keyboard_layout: dvorak-ish
keymaps_use_physical_layout: force
keyboard_layouts:
  dvorak-ish:
    KeyS: ["o", "O"]
    KeyD: ["e", "E"]
"#;
    let config = EngineConfig::from_yaml(yaml).unwrap();
    let mut model = common::test_model_with_config(config, vec![normal("oe", "open")]);

    // Physical S then D, whatever the OS layout produced
    update(&mut model, Msg::Key(RawKeyEvent::new("x").with_code("KeyS")));
    let out = cmds(update(
        &mut model,
        Msg::Key(RawKeyEvent::new("y").with_code("KeyD")),
    ));
    assert_eq!(common::executed(&out), vec!["open"]);
}

// ========================================================================
// Option Overrides
// ========================================================================

#[test]
fn test_get_and_set_option() {
    let mut config = EngineConfig::default();
    config.set_option("jumplist_max_entries", "5").unwrap();
    assert_eq!(config.get_option("jumplist_max_entries").unwrap(), "5");

    config.set_option("hint_chars", "123").unwrap();
    assert_eq!(config.hint_chars, "123");

    assert_eq!(
        config.set_option("nope", "1"),
        Err(ConfigError::UnknownOption("nope".to_string()))
    );
}

#[test]
fn test_invalid_value_leaves_config_unchanged() {
    let mut config = EngineConfig::default();
    assert!(config
        .set_option("tie_break_timeout_ms", "soon")
        .is_err());
    assert!(config.set_option("mapleader", "<Nope").is_err());
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_window_override_does_not_leak_to_other_windows() {
    let config = Arc::new(EngineConfig::default());
    let keymaps = Arc::new(Keymaps::default());
    let mut first = WindowModel::new(WindowId(1), Arc::clone(&config), Arc::clone(&keymaps));
    let second = WindowModel::new(WindowId(2), Arc::clone(&config), keymaps);

    {
        let mut scoped = ScopedOverride::new(&mut first);
        scoped.set("jumplist_max_entries", "2").unwrap();
        assert_eq!(scoped.jumplist.max_entries(), 2);
        assert_eq!(second.config.jumplist_max_entries, config.jumplist_max_entries);
    }

    assert_eq!(
        first.get_option("jumplist_max_entries").unwrap(),
        config.jumplist_max_entries.to_string()
    );
    assert_eq!(first.jumplist.max_entries(), config.jumplist_max_entries);
}

#[test]
fn test_mapleader_override_rebinds_leader_sequences() {
    let config = EngineConfig::default();
    let keymaps = Keymaps::with_bindings(vec![normal("<leader>x", "tab_close")], config.leader());
    let mut model = WindowModel::new(WindowId(1), Arc::new(config), Arc::new(keymaps));

    let typed = |model: &mut WindowModel, keys: &[&str]| {
        let mut out = Vec::new();
        for key in keys {
            out.extend(cmds(update(model, Msg::Key(RawKeyEvent::new(*key)))));
        }
        common::executed(&out)
    };

    {
        let mut scoped = ScopedOverride::new(&mut model);
        scoped.set("mapleader", ",").unwrap();
        assert_eq!(scoped.config.mapleader, ",");
        assert_eq!(typed(&mut *scoped, &[",", "x"]), vec!["tab_close"]);
        assert!(typed(&mut *scoped, &[" ", "x"]).is_empty());
    }

    // Restoring the option restores the old leader
    assert_eq!(model.config.mapleader, "<Space>");
    assert_eq!(typed(&mut model, &[" ", "x"]), vec!["tab_close"]);
}

// ========================================================================
// Keymap Loading Tests
// ========================================================================

#[test]
fn test_default_bindings_cover_core_commands() {
    let keymaps = Keymaps::with_bindings(default_bindings(), EngineConfig::default().leader());
    let lookup = |mode: Mode, keys: &str| {
        let tokens = keyseq::keymap::split(keys).unwrap();
        keymaps.lookup(mode, &tokens).map(|b| b.command.clone())
    };

    assert_eq!(lookup(Mode::Normal, "<C-o>"), Some(Command::JumpBackward));
    assert_eq!(
        lookup(Mode::Normal, "i"),
        Some(Command::ModeChange(Mode::Insert))
    );
    assert!(matches!(lookup(Mode::Normal, "f"), Some(Command::Hint(_))));
    assert_eq!(
        lookup(Mode::Hint, "<Esc>"),
        Some(Command::ModeChange(Mode::Normal))
    );
}

#[test]
fn test_strict_parse_reports_bad_entries() {
    let yaml = r#"
bindings:
  - key: "<C-"
    command: tab_close
"#;
    assert!(parse_keymap_yaml(yaml).is_err());

    let (bindings, errors) = parse_keymap_yaml_lenient(yaml).unwrap();
    assert!(bindings.is_empty());
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_merge_replaces_per_mode() {
    let base = vec![common::bind(&[Mode::Normal, Mode::Visual], "j", "scroll_down")];
    let user = vec![normal("j", "next_item")];

    let keymaps = Keymaps::with_bindings(merge_bindings(base, user), EngineConfig::default().leader());
    let j = [KeyToken::char('j')];
    assert_eq!(
        keymaps.lookup(Mode::Normal, &j).map(|b| b.command.to_string()),
        Some("next_item".to_string())
    );
    assert_eq!(
        keymaps.lookup(Mode::Visual, &j).map(|b| b.command.to_string()),
        Some("scroll_down".to_string())
    );
}

#[test]
fn test_unbound_removes_inherited_binding() {
    let base = vec![normal("x", "tab_close"), normal("y", "yank")];
    let user = vec![normal("x", "Unbound")];

    let merged = merge_bindings(base, user);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].command().to_string(), "yank");
}

#[test]
fn test_keymap_layer_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keymap.yaml");
    std::fs::write(
        &path,
        r#"
bindings:
  - key: "x"
    command: Unbound
  - key: "<leader>n"
    command: tab_new
  - key: "<C-"
    command: broken
"#,
    )
    .unwrap();

    let bindings = load_keymap_layers(&[path, dir.path().join("missing.yaml")]);
    let keymaps = Keymaps::with_bindings(bindings, EngineConfig::default().leader());

    assert!(keymaps.lookup(Mode::Normal, &[KeyToken::char('x')]).is_none());
    let space_n = keyseq::keymap::split("<Space>n").unwrap();
    assert_eq!(
        keymaps
            .lookup(Mode::Normal, &space_n)
            .map(|b| b.command.to_string()),
        Some("tab_new".to_string())
    );
    // Untouched defaults survive
    assert!(keymaps
        .lookup(Mode::Normal, &keyseq::keymap::split("gg").unwrap())
        .is_some());
}
