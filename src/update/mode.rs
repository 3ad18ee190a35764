//! Mode transitions, automatic focus/fullscreen switching and reloads

use std::sync::Arc;

use super::keys::cancel_pending;
use crate::commands::Cmd;
use crate::config::EngineConfig;
use crate::keymap::Keymaps;
use crate::mode::{Mode, ModeEvent};
use crate::model::WindowModel;

/// Switch the window to `mode`
///
/// Leaving a mode drops any pending sequence (its trie no longer applies),
/// tears down hint labels and the op-pending operator, and runs matching
/// `ModeChanged` autocmds. Re-entering the current mode only updates
/// stickiness.
pub fn enter_mode(model: &mut WindowModel, mode: Mode, sticky: bool) -> Vec<Cmd> {
    let Some(old) = model.mode.transition(mode, sticky) else {
        tracing::trace!(target: "mode", "Already in {} (sticky={})", mode, model.mode.sticky);
        return Vec::new();
    };

    tracing::debug!(
        target: "mode",
        "{} → {} (sticky={}, generation {})",
        old,
        mode,
        model.mode.sticky,
        model.mode.generation
    );

    let mut cmds = cancel_pending(model);

    match old {
        Mode::Hint => {
            model.hint_request = None;
            if model.hints.take().is_some() {
                cmds.push(Cmd::ClearHints);
            }
        }
        Mode::OpPending => model.operator = None,
        Mode::Normal | Mode::Insert | Mode::Visual | Mode::Ignore | Mode::Command => {}
    }

    cmds.push(Cmd::ModeChanged { old, new: mode });
    for autocmd in model.config.mode_changed_autocmds(old, mode) {
        tracing::debug!(target: "mode", "ModeChanged {} → {}", autocmd.pattern, autocmd.command);
        cmds.push(Cmd::RunAutocmd {
            pattern: autocmd.pattern.clone(),
            command: autocmd.command.clone(),
            old,
            new: mode,
        });
    }

    let text = model.pending_display();
    cmds.extend(set_display(model, text));
    cmds
}

/// Update the pending-keys display if it changed
pub(super) fn set_display(model: &mut WindowModel, text: String) -> Option<Cmd> {
    if model.display == text {
        return None;
    }
    model.display = text.clone();
    Some(Cmd::DisplayPending(text))
}

pub(super) fn handle_focus(model: &mut WindowModel, editable: bool) -> Vec<Cmd> {
    let event = if editable {
        ModeEvent::EditableFocused
    } else {
        ModeEvent::EditableBlurred
    };
    auto_transition(model, event)
}

pub(super) fn handle_fullscreen(model: &mut WindowModel, active: bool) -> Vec<Cmd> {
    let event = if active {
        ModeEvent::FullscreenEntered
    } else {
        ModeEvent::FullscreenExited
    };
    auto_transition(model, event)
}

fn auto_transition(model: &mut WindowModel, event: ModeEvent) -> Vec<Cmd> {
    let entering = matches!(
        event,
        ModeEvent::EditableFocused | ModeEvent::FullscreenEntered
    );
    if entering && !model.config.switch_mode_on_focus {
        return Vec::new();
    }

    match model.mode.auto_transition(event) {
        Some(mode) => enter_mode(model, mode, false),
        None => {
            tracing::trace!(
                target: "mode",
                "{:?} ignored in {} (sticky={})",
                event,
                model.mode.mode,
                model.mode.sticky
            );
            Vec::new()
        }
    }
}

/// New configuration: node ids of the old tries are meaningless now
pub(super) fn handle_reload(
    model: &mut WindowModel,
    config: Arc<EngineConfig>,
    keymaps: Arc<Keymaps>,
) -> Vec<Cmd> {
    let mut cmds = cancel_pending(model);
    model.keymaps = keymaps;
    model.set_config(config);

    let text = model.pending_display();
    cmds.extend(set_display(model, text));
    cmds
}
