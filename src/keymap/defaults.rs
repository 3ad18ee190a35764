//! Default keybindings
//!
//! The defaults ship embedded as keymap.yaml; a hardcoded set is used only if
//! that fails to parse. Project and user keymaps are layered on top.

use std::path::{Path, PathBuf};

use super::binding::Keybinding;
use super::command::Command;
use super::config::parse_keymap_yaml_lenient;
use super::types::{KeyCode, Keystroke, Modifiers};
use crate::hints::{HintAction, HintOptions};
use crate::mode::Mode;

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// Get the embedded default keymap YAML
pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// Load and merge keymaps: defaults + overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default keymap (compiled into binary)
/// 2. keymap.yaml in current directory (project-local overrides)
/// 3. User config at ~/.config/keyseq/keymap.yaml
///
/// Bindings with `command: Unbound` remove matching bindings of earlier layers.
pub fn load_default_keymap() -> Vec<Keybinding> {
    load_keymap_layers(&crate::config_paths::keymap_layers())
}

/// Embedded defaults with each existing file in `layers` merged on top
pub fn load_keymap_layers(layers: &[PathBuf]) -> Vec<Keybinding> {
    let mut bindings = match parse_keymap_yaml_lenient(DEFAULT_KEYMAP_YAML) {
        Ok((b, errors)) if errors.is_empty() => {
            tracing::info!("Loaded embedded default keymap ({} bindings)", b.len());
            b
        }
        Ok((_, errors)) => {
            tracing::warn!(
                "Embedded keymap has {} invalid entries, using hardcoded defaults",
                errors.len()
            );
            default_bindings()
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded keymap: {}, using hardcoded defaults",
                e
            );
            default_bindings()
        }
    };

    for path in layers {
        if let Some(layer) = load_layer(path) {
            bindings = merge_bindings(bindings, layer);
        }
    }

    bindings
}

/// Read one keymap layer, keeping its valid entries
fn load_layer(path: &Path) -> Option<Vec<Keybinding>> {
    if !path.exists() {
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read keymap {}: {}", path.display(), e);
            return None;
        }
    };

    match parse_keymap_yaml_lenient(&content) {
        Ok((bindings, errors)) => {
            for error in &errors {
                tracing::warn!("Skipping binding in {}: {}", path.display(), error);
            }
            tracing::info!(
                "Merging keymap from {} ({} bindings)",
                path.display(),
                bindings.len()
            );
            Some(bindings)
        }
        Err(e) => {
            tracing::warn!("Failed to load keymap from {}: {}", path.display(), e);
            None
        }
    }
}

/// Merge user bindings into base bindings
///
/// For every mode a user binding names, base bindings of the same keys lose
/// that mode (and disappear once they have none left). A user binding whose
/// command is `Unbound` is not added itself.
pub fn merge_bindings(base: Vec<Keybinding>, user: Vec<Keybinding>) -> Vec<Keybinding> {
    let mut result = base;

    for user_binding in user {
        for existing in result
            .iter_mut()
            .filter(|b| b.keystrokes == user_binding.keystrokes)
        {
            existing.modes.retain(|m| !user_binding.modes.contains(m));
        }
        result.retain(|b| !b.modes.is_empty());

        if !user_binding.command().is_unbound() {
            result.push(user_binding);
        }
    }

    result
}

/// Hardcoded fallback bindings
pub fn default_bindings() -> Vec<Keybinding> {
    let none = Modifiers::NONE;
    let ctrl = Modifiers::CTRL;
    let shift = Modifiers::SHIFT;

    let new_tab = HintOptions {
        action: HintAction::NewTab,
        ..HintOptions::default()
    };

    vec![
        // Normal mode
        bind(Mode::Normal, KeyCode::Char('f'), none, Command::Hint(HintOptions::default())),
        bind(Mode::Normal, KeyCode::Char('F'), none, Command::Hint(new_tab)),
        bind(Mode::Normal, KeyCode::Char('o'), ctrl, Command::JumpBackward),
        bind(Mode::Normal, KeyCode::Char('i'), ctrl, Command::JumpForward),
        bind(Mode::Normal, KeyCode::Char('i'), none, Command::ModeChange(Mode::Insert)),
        bind(Mode::Normal, KeyCode::Char('v'), none, Command::ModeChange(Mode::Visual)),
        bind(Mode::Normal, KeyCode::Char(':'), none, Command::ModeChange(Mode::Command)),
        bind(Mode::Normal, KeyCode::Escape, shift, Command::ModeChange(Mode::Ignore)),
        bind(Mode::Normal, KeyCode::Char('d'), none, Command::ModeChange(Mode::OpPending))
            .retain_key_display(true),
        // Leaving modes
        bind(Mode::Insert, KeyCode::Escape, none, Command::ModeChange(Mode::Normal)),
        bind(Mode::Visual, KeyCode::Escape, none, Command::ModeChange(Mode::Normal)),
        bind(Mode::OpPending, KeyCode::Escape, none, Command::ModeChange(Mode::Normal)),
        bind(Mode::Hint, KeyCode::Escape, none, Command::ModeChange(Mode::Normal)),
        bind(Mode::Command, KeyCode::Escape, none, Command::ModeChange(Mode::Normal)),
        bind(Mode::Ignore, KeyCode::Escape, shift, Command::ModeChange(Mode::Normal)),
    ]
}

/// Helper to create a single-key binding
fn bind(mode: Mode, key: KeyCode, mods: Modifiers, command: Command) -> Keybinding {
    Keybinding::new([mode], vec![Keystroke::new(key, mods)], command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn chord(mode: Mode, keys: &str, command: Command) -> Keybinding {
        Keybinding::parse([mode], keys, command).unwrap()
    }

    #[test]
    fn test_embedded_keymap_parses_cleanly() {
        let (bindings, errors) = parse_keymap_yaml_lenient(get_default_keymap_yaml()).unwrap();
        assert!(errors.is_empty(), "embedded keymap errors: {:?}", errors);
        assert!(!bindings.is_empty());
    }

    #[test]
    fn test_default_bindings_cover_every_mode_exit() {
        let bindings = default_bindings();
        for mode in [Mode::Insert, Mode::Visual, Mode::OpPending, Mode::Hint, Mode::Command] {
            assert!(
                bindings.iter().any(|b| b.modes.contains(&mode)
                    && *b.command() == Command::ModeChange(Mode::Normal)),
                "no way back to normal from {}",
                mode
            );
        }
    }

    #[test]
    fn test_merge_adds_new_binding() {
        let base = vec![chord(Mode::Normal, "gg", Command::Excmd("top".into()))];
        let user = vec![chord(Mode::Normal, "G", Command::Excmd("bottom".into()))];

        let merged = merge_bindings(base, user);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_overrides_existing() {
        let base = vec![chord(Mode::Normal, "gg", Command::Excmd("top".into()))];
        let user = vec![chord(Mode::Normal, "gg", Command::JumpBackward)];

        let merged = merge_bindings(base, user);
        assert_eq!(merged.len(), 1);
        assert_eq!(*merged[0].command(), Command::JumpBackward);
    }

    #[test]
    fn test_merge_only_strips_overlapping_modes() {
        let base = vec![Keybinding::parse(
            [Mode::Normal, Mode::Visual],
            "<Esc>",
            Command::ModeChange(Mode::Normal),
        )
        .unwrap()];
        let user = vec![chord(Mode::Visual, "<Esc>", Command::Unbound)];

        let merged = merge_bindings(base, user);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].modes, [Mode::Normal]);
    }

    #[test]
    fn test_merge_unbound_on_nonexistent_is_noop() {
        let base = vec![chord(Mode::Normal, "gg", Command::Excmd("top".into()))];
        let user = vec![chord(Mode::Normal, "x", Command::Unbound)];

        let merged = merge_bindings(base, user);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_layer_files_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
bindings:
  - key: "f"
    command: Unbound
  - key: "<C-a"
    command: broken
  - key: "gt"
    command: tab_next
"#
        )
        .unwrap();

        let bindings = load_keymap_layers(&[file.path().to_path_buf()]);
        let f = vec![Keystroke::char('f')];
        assert!(!bindings
            .iter()
            .any(|b| b.keystrokes == f && b.modes.contains(&Mode::Normal)));
        assert!(bindings
            .iter()
            .any(|b| *b.command() == Command::Excmd("tab_next".into())));
    }

    #[test]
    fn test_missing_layer_is_ignored() {
        let defaults = load_keymap_layers(&[]);
        let with_missing = load_keymap_layers(&[PathBuf::from("/nonexistent/keymap.yaml")]);
        assert_eq!(defaults, with_missing);
    }
}
