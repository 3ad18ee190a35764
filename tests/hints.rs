//! Hint mode tests
//!
//! Tests for the hint flow: collecting targets, label assignment, filtering
//! by typed characters, selection, cancellation and auto-activation.

mod common;

use common::{bind, cmds, default_model, normal, runtime_with_targets, targets, test_model_with_config};

use keyseq::commands::{Cmd, NotifyLevel};
use keyseq::config::EngineConfig;
use keyseq::hints::{HintAction, HintAssignment};
use keyseq::messages::Msg;
use keyseq::mode::Mode;
use keyseq::model::TargetId;
use keyseq::update::update;

fn shown(emitted: &[Cmd]) -> Vec<HintAssignment> {
    emitted
        .iter()
        .rev()
        .find_map(|cmd| match cmd {
            Cmd::ShowHints(assignments) => Some(assignments.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn labels(assignments: &[HintAssignment]) -> Vec<&str> {
    assignments.iter().map(|a| a.label.as_str()).collect()
}

fn selected(emitted: &[Cmd]) -> Vec<(TargetId, HintAction)> {
    emitted
        .iter()
        .filter_map(|cmd| match cmd {
            Cmd::SelectHint { target, action } => Some((*target, *action)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_hint_shows_labels() {
    let mut rt = runtime_with_targets(default_model(), 5);
    rt.send_keys("f").unwrap();

    assert_eq!(rt.model.current_mode(), Mode::Hint);
    let assignments = shown(&rt.emitted());
    assert_eq!(labels(&assignments), vec!["h", "j", "k", "l", "a"]);
    assert_eq!(assignments[2].target.id, TargetId(3));
}

#[test]
fn test_typing_label_selects_target() {
    let mut rt = runtime_with_targets(default_model(), 5);
    rt.send_keys("fk").unwrap();

    assert_eq!(
        selected(&rt.emitted()),
        vec![(TargetId(3), HintAction::Follow)]
    );
    assert_eq!(rt.model.current_mode(), Mode::Normal);
    assert!(rt.model.hints.is_none());
    assert!(rt.emitted().contains(&Cmd::ClearHints));
}

#[test]
fn test_newtab_action() {
    let mut rt = runtime_with_targets(default_model(), 3);
    rt.send_keys("Fj").unwrap();
    assert_eq!(
        selected(&rt.emitted()),
        vec![(TargetId(2), HintAction::NewTab)]
    );
}

#[test]
fn test_escape_leaves_hint_mode() {
    let mut rt = runtime_with_targets(default_model(), 5);
    rt.send_keys("f<Esc>").unwrap();

    assert_eq!(rt.model.current_mode(), Mode::Normal);
    assert!(selected(&rt.emitted()).is_empty());
    assert!(rt.emitted().contains(&Cmd::ClearHints));
}

#[test]
fn test_escape_leaves_without_hint_keymap() {
    let model = common::test_model(vec![normal("f", "hint")]);
    let mut rt = runtime_with_targets(model, 5);
    rt.send_keys("f").unwrap();
    assert_eq!(rt.model.current_mode(), Mode::Hint);

    rt.send_keys("<Esc>").unwrap();
    assert_eq!(rt.model.current_mode(), Mode::Normal);
    assert!(rt.model.hints.is_none());
    assert!(rt.emitted().contains(&Cmd::ClearHints));
    assert!(selected(&rt.emitted()).is_empty());
}

#[test]
fn test_character_matching_no_label_cancels() {
    let mut rt = runtime_with_targets(default_model(), 5);
    rt.send_keys("fz").unwrap();

    assert_eq!(rt.model.current_mode(), Mode::Normal);
    assert!(selected(&rt.emitted()).is_empty());
}

#[test]
fn test_two_character_labels_filter_then_select() {
    let mut rt = runtime_with_targets(default_model(), 30);
    rt.send_keys("f").unwrap();

    let assignments = shown(&rt.emitted());
    assert_eq!(assignments.len(), 30);
    assert_eq!(
        labels(&assignments[25..]),
        vec!["hh", "hj", "hk", "hl", "ha"]
    );

    rt.send_keys("h").unwrap();
    let filtered = rt.emitted().into_iter().rev().find_map(|cmd| match cmd {
        Cmd::FilterHints { typed, visible } => Some((typed, visible.len())),
        _ => None,
    });
    assert_eq!(filtered, Some(("h".to_string(), 5)));
    assert_eq!(rt.model.current_mode(), Mode::Hint);

    rt.send_keys("a").unwrap();
    assert_eq!(
        selected(&rt.emitted()),
        vec![(TargetId(30), HintAction::Follow)]
    );
}

#[test]
fn test_backspace_widens_filter() {
    let mut rt = runtime_with_targets(default_model(), 30);
    rt.send_keys("fh<BS>").unwrap();

    let last = rt.emitted().into_iter().rev().find_map(|cmd| match cmd {
        Cmd::FilterHints { typed, visible } => Some((typed, visible.len())),
        _ => None,
    });
    assert_eq!(last, Some((String::new(), 30)));
}

#[test]
fn test_numeric_labels_accept_with_enter() {
    let model = test_model_with_config(
        EngineConfig::default(),
        vec![
            normal("f", "hint --numeric"),
            bind(&[Mode::Hint], "<Esc>", "mode_change normal"),
        ],
    );
    let mut rt = runtime_with_targets(model, 12);
    rt.send_keys("f1").unwrap();
    assert_eq!(rt.model.current_mode(), Mode::Hint);

    rt.send_keys("<CR>").unwrap();
    assert_eq!(
        selected(&rt.emitted()),
        vec![(TargetId(1), HintAction::Follow)]
    );
}

#[test]
fn test_hint_bindings_are_excluded_from_labels() {
    let config = EngineConfig {
        hint_chars: "qjk".to_string(),
        ..EngineConfig::default()
    };
    let model = test_model_with_config(
        config,
        vec![
            normal("f", "hint"),
            bind(&[Mode::Hint], "q", "mode_change normal"),
        ],
    );
    let mut rt = runtime_with_targets(model, 2);
    rt.send_keys("f").unwrap();
    assert_eq!(labels(&shown(&rt.emitted())), vec!["j", "k"]);

    rt.send_keys("q").unwrap();
    assert_eq!(rt.model.current_mode(), Mode::Normal);
}

#[test]
fn test_weighted_characters_come_first() {
    let mut config = EngineConfig {
        hint_chars: "abc".to_string(),
        ..EngineConfig::default()
    };
    config.hint_char_weights.insert('a', 5);
    let model = test_model_with_config(config, vec![normal("f", "hint")]);
    let mut rt = runtime_with_targets(model, 3);
    rt.send_keys("f").unwrap();

    assert_eq!(labels(&shown(&rt.emitted())), vec!["b", "c", "a"]);
}

// ========================================================================
// Auto-activation and edge cases
// ========================================================================

#[test]
fn test_auto_activates_single_target() {
    let mut rt = runtime_with_targets(default_model(), 1);
    rt.send_keys("gi").unwrap();

    assert_eq!(
        selected(&rt.emitted()),
        vec![(TargetId(1), HintAction::Follow)]
    );
    assert_eq!(rt.model.current_mode(), Mode::Normal);
    assert!(!rt
        .emitted()
        .iter()
        .any(|cmd| matches!(cmd, Cmd::ShowHints(_))));
}

#[test]
fn test_auto_with_several_targets_shows_labels() {
    let mut rt = runtime_with_targets(default_model(), 3);
    rt.send_keys("gi").unwrap();

    assert_eq!(rt.model.current_mode(), Mode::Hint);
    assert!(selected(&rt.emitted()).is_empty());
}

#[test]
fn test_no_targets_notifies() {
    let mut rt = runtime_with_targets(default_model(), 0);
    rt.send_keys("f").unwrap();

    assert_eq!(rt.model.current_mode(), Mode::Normal);
    assert!(rt.emitted().contains(&Cmd::Notify {
        level: NotifyLevel::Info,
        message: "No hint targets".to_string(),
    }));
}

#[test]
fn test_stale_targets_are_ignored() {
    let mut model = default_model();
    let request = cmds(update(&mut model, Msg::Key(common::key("f"))))
        .into_iter()
        .find_map(|cmd| match cmd {
            Cmd::CollectHintTargets { request, .. } => Some(request),
            _ => None,
        })
        .expect("target request");

    let stale = update(
        &mut model,
        Msg::HintTargets {
            request: request + 100,
            targets: targets(3),
        },
    );
    assert!(stale.is_none());
    assert_eq!(model.current_mode(), Mode::Normal);

    update(
        &mut model,
        Msg::HintTargets {
            request,
            targets: targets(3),
        },
    );
    assert_eq!(model.current_mode(), Mode::Hint);

    // A second reply to the same request is stale too
    assert!(update(
        &mut model,
        Msg::HintTargets {
            request,
            targets: targets(3),
        },
    )
    .is_none());
}
