//! Integration tests for the keymap system

use super::*;
use crate::mode::Mode;

/// Embedded default keymap YAML for testing
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

fn default_keymaps() -> Keymaps {
    let bindings = parse_keymap_yaml(DEFAULT_KEYMAP_YAML).unwrap();
    Keymaps::with_bindings(bindings, Keystroke::key(KeyCode::Space))
}

fn lookup<'a>(keymaps: &'a Keymaps, mode: Mode, keys: &str) -> Option<&'a Command> {
    keymaps
        .lookup(mode, &split(keys).unwrap())
        .map(|binding| &binding.command)
}

#[test]
fn test_embedded_yaml_parses() {
    let bindings = parse_keymap_yaml(DEFAULT_KEYMAP_YAML)
        .expect("Embedded keymap.yaml should parse successfully");

    assert!(!bindings.is_empty(), "Should have bindings");

    let has_hint = bindings
        .iter()
        .any(|b| matches!(b.command(), Command::Hint(_)));
    let has_back = bindings.iter().any(|b| *b.command() == Command::JumpBackward);
    let has_forward = bindings.iter().any(|b| *b.command() == Command::JumpForward);

    assert!(has_hint, "Should have a hint binding");
    assert!(has_back, "Should have jumplist_back");
    assert!(has_forward, "Should have jumplist_forward");
}

#[test]
fn test_load_default_keymap() {
    let bindings = load_default_keymap();
    assert!(!bindings.is_empty(), "Default keymap should not be empty");
}

#[test]
fn test_defaults_jumplist_keys() {
    let keymaps = default_keymaps();
    assert_eq!(
        lookup(&keymaps, Mode::Normal, "<C-o>"),
        Some(&Command::JumpBackward)
    );
    assert_eq!(
        lookup(&keymaps, Mode::Normal, "<C-i>"),
        Some(&Command::JumpForward)
    );
}

#[test]
fn test_defaults_ignore_mode_toggle() {
    let keymaps = default_keymaps();
    assert_eq!(
        lookup(&keymaps, Mode::Normal, "<S-Esc>"),
        Some(&Command::ModeChange(Mode::Ignore))
    );
    assert_eq!(
        lookup(&keymaps, Mode::Ignore, "<S-Esc>"),
        Some(&Command::ModeChange(Mode::Normal))
    );
    assert_eq!(lookup(&keymaps, Mode::Ignore, "f"), None);
}

#[test]
fn test_defaults_leader_bindings_resolve_to_space() {
    let keymaps = default_keymaps();
    assert!(lookup(&keymaps, Mode::Normal, "<Space>f").is_some());
    assert!(keymaps
        .trie(Mode::Normal)
        .list()
        .iter()
        .all(|(keys, _)| keys.iter().all(|k| !k.is_leader())));
}

#[test]
fn test_defaults_every_transient_mode_can_escape() {
    let keymaps = default_keymaps();
    for mode in [Mode::OpPending, Mode::Hint, Mode::Insert, Mode::Visual, Mode::Command] {
        assert_eq!(
            lookup(&keymaps, mode, "<Esc>"),
            Some(&Command::ModeChange(Mode::Normal)),
            "<Esc> in {}",
            mode
        );
    }
}

#[test]
fn test_hint_mode_leaves_alphabet_free() {
    let keymaps = default_keymaps();
    assert!(keymaps.trie(Mode::Hint).single_key_chars().is_empty());
}

#[test]
fn test_user_layer_unbinds_default() {
    let user = parse_keymap_yaml(
        r#"
bindings:
  - key: "x"
    command: Unbound
  - key: "<leader>f"
    command: tab_search
"#,
    )
    .unwrap();

    let defaults = parse_keymap_yaml(DEFAULT_KEYMAP_YAML).unwrap();
    let keymaps = Keymaps::with_bindings(
        merge_bindings(defaults, user),
        Keystroke::key(KeyCode::Space),
    );

    assert_eq!(lookup(&keymaps, Mode::Normal, "x"), None);
    assert_eq!(
        lookup(&keymaps, Mode::Normal, "<Space>f"),
        Some(&Command::Excmd("tab_search".to_string()))
    );
}

#[test]
fn test_normalized_event_finds_binding() {
    let keymaps = default_keymaps();
    let qwerty = KeyboardLayout::qwerty();
    let normalizer = KeyNormalizer::new(Some(&qwerty), LayoutPolicy::Force);

    let event = RawKeyEvent::new("щ").with_code("KeyO").with_mods(Modifiers::CTRL);
    let token = normalizer.normalize(&event);

    assert!(matches!(
        keymaps.trie(Mode::Normal).step(NodeId::ROOT, &token),
        Step::Matched(binding) if binding.command == Command::JumpBackward
    ));
}
