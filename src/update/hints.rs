//! Hint mode: collecting targets, labelling them and picking one by typing

use std::sync::Arc;

use super::exec::{apply_mode_request, execute};
use super::mode::enter_mode;
use crate::commands::{Cmd, NotifyLevel};
use crate::hints::{
    assign_hints, AutoActivate, HintAssignment, HintInput, HintOptions, HintSession, HintTarget,
};
use crate::keymap::KeyToken;
use crate::mode::{Mode, ModeRequest};
use crate::model::{HintRequest, WindowModel};

/// Ask the host for targets; hint mode starts once they arrive
pub(super) fn start(model: &mut WindowModel, options: HintOptions) -> Vec<Cmd> {
    let id = model.next_id();
    tracing::debug!(target: "hints", "Requesting targets #{}{}", id, options);
    model.hint_request = Some(HintRequest {
        id,
        options: options.clone(),
    });
    vec![Cmd::CollectHintTargets {
        options,
        request: id,
    }]
}

pub(super) fn handle_targets(
    model: &mut WindowModel,
    request: u64,
    targets: Vec<HintTarget>,
) -> Vec<Cmd> {
    if model.hint_request.as_ref().map(|r| r.id) != Some(request) {
        tracing::debug!(target: "hints", "Ignoring targets for stale request #{}", request);
        return Vec::new();
    }
    let Some(HintRequest { options, .. }) = model.hint_request.take() else {
        return Vec::new();
    };

    if targets.is_empty() {
        return vec![Cmd::notify(NotifyLevel::Info, "No hint targets")];
    }

    // Single-key hint bindings (`<Esc>`) must stay typeable
    let excluded = model.keymaps.trie(Mode::Hint).single_key_chars();
    let alphabet = model.config.hint_alphabet().without(&excluded);
    let generator = options.labels.unwrap_or(model.config.hint_label_generator);
    let assignments = assign_hints(&targets, &alphabet, generator);

    if assignments.len() < targets.len() {
        tracing::warn!(
            target: "hints",
            "Only {} of {} targets could be labelled with {:?}",
            assignments.len(),
            targets.len(),
            alphabet.chars().collect::<String>()
        );
    }
    if assignments.is_empty() {
        return vec![Cmd::notify(
            NotifyLevel::Warn,
            "No hint characters available",
        )];
    }

    let auto = match options.auto_activate {
        AutoActivate::Never => false,
        AutoActivate::Single => targets.len() == 1,
        AutoActivate::Always => true,
    };
    if auto {
        if let Some(first) = assignments.into_iter().next() {
            tracing::debug!(target: "hints", "Auto-activating {}", first.target.id);
            return vec![Cmd::SelectHint {
                target: first.target.id,
                action: options.action,
            }];
        }
        return Vec::new();
    }

    let mut cmds = Vec::new();
    if model.hints.take().is_some() {
        cmds.push(Cmd::ClearHints);
    }
    cmds.extend(enter_mode(model, Mode::Hint, false));
    cmds.push(Cmd::ShowHints(assignments.clone()));
    model.hints = Some(HintSession::new(assignments, options));
    cmds
}

/// A key typed while labels are up
///
/// Single-key hint bindings win; otherwise `<Esc>` leaves, characters
/// filter the labels, `<BS>` un-types and `<CR>` accepts the exact or only
/// remaining label.
pub(super) fn handle_hint_key(model: &mut WindowModel, token: KeyToken) -> Vec<Cmd> {
    let keymaps = Arc::clone(&model.keymaps);
    if let Some(binding) = keymaps
        .trie(Mode::Hint)
        .lookup(std::slice::from_ref(&token))
    {
        return execute(model, binding.clone(), &[token]);
    }

    // Escape always leaves, even with no hint keymap
    if token.as_str() == "<Esc>" {
        tracing::debug!(target: "hints", "Escape, leaving hint mode");
        return apply_mode_request(model, ModeRequest::RevertTransient);
    }

    let Some(session) = model.hints.as_mut() else {
        tracing::trace!(target: "hints", "{} before targets arrived", token);
        return Vec::new();
    };

    let input = match token.as_str() {
        "<BS>" => HintInput::Filtered(session.pop()),
        "<CR>" => match session.accept() {
            Some(assignment) => HintInput::Selected(assignment),
            None => return Vec::new(),
        },
        _ => match token.as_char() {
            Some(c) => session.push(c),
            None => {
                tracing::trace!(target: "hints", "{} ignored", token);
                return Vec::new();
            }
        },
    };
    let typed = session.typed().to_string();

    match input {
        HintInput::Filtered(visible) => vec![Cmd::FilterHints { typed, visible }],
        HintInput::Selected(assignment) => select(model, assignment),
        HintInput::Cancelled => {
            tracing::debug!(target: "hints", "No label starts with {:?}", typed);
            apply_mode_request(model, ModeRequest::RevertTransient)
        }
    }
}

fn select(model: &mut WindowModel, assignment: HintAssignment) -> Vec<Cmd> {
    let action = model
        .hints
        .as_ref()
        .map(|session| session.options.action)
        .unwrap_or_default();
    tracing::debug!(target: "hints", "Selected {} ({})", assignment.label, assignment.target.id);

    let mut cmds = vec![Cmd::SelectHint {
        target: assignment.target.id,
        action,
    }];
    cmds.extend(apply_mode_request(model, ModeRequest::RevertTransient));
    cmds
}
