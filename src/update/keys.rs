//! Key events: normalization and walking the active keymap trie
//!
//! ```text
//! NoMatch    → drop the sequence; pass the key through (op-pending: back to normal)
//! Matched    → execute
//! Ambiguous  → hold the binding, wait one tie-break window for a longer one
//! Pending    → wait for the next key (idle timeout)
//! ```

use std::sync::Arc;

use super::mode::{enter_mode, set_display};
use super::{exec, hints};
use crate::commands::{Cmd, TimerKind};
use crate::keymap::{KeyToken, NodeId, RawKeyEvent, Step};
use crate::mode::Mode;
use crate::model::{HeldBinding, PendingKey, WindowModel};

pub(super) fn handle_key(model: &mut WindowModel, event: RawKeyEvent) -> Vec<Cmd> {
    if event.is_modifier_only() {
        tracing::trace!(target: "keys", "Modifier-only {:?} passed through", event.key);
        return vec![Cmd::PassThrough(event)];
    }

    let token = model.normalizer().normalize(&event);
    tracing::trace!(
        target: "keys",
        mode = %model.current_mode(),
        "{:?} (code {:?}) → {}",
        event.key,
        event.code,
        token
    );

    if model.current_mode() == Mode::Hint {
        return hints::handle_hint_key(model, token);
    }

    process_key(
        model,
        PendingKey {
            event,
            token,
            passed_through: false,
        },
    )
}

/// Step the active trie with one key
pub(super) fn process_key(model: &mut WindowModel, key: PendingKey) -> Vec<Cmd> {
    let keymaps = Arc::clone(&model.keymaps);
    let node = model.pending.node.unwrap_or(NodeId::ROOT);

    match keymaps.trie(model.current_mode()).step(node, &key.token) {
        Step::NoMatch => no_match(model, key),
        Step::Matched(binding) => {
            let mut cmds = Vec::new();
            let (mut keys, _, timer) = model.pending.take();
            if let Some(kind) = timer {
                cmds.push(Cmd::CancelTimer { kind });
            }
            keys.push(key);
            cmds.extend(exec::execute(model, binding.clone(), &tokens(&keys)));
            cmds
        }
        Step::Ambiguous(child, binding) => {
            model.pending.held = Some(HeldBinding {
                binding: binding.clone(),
                len: model.pending.keys.len() + 1,
            });
            extend(model, child, key, TimerKind::TieBreak)
        }
        Step::Pending(child) => {
            // A held binding still runs if the longer sequence never completes
            let kind = if model.pending.held.is_some() {
                TimerKind::TieBreak
            } else {
                TimerKind::Idle
            };
            extend(model, child, key, kind)
        }
    }
}

/// Grow the pending sequence and re-arm its timer
fn extend(model: &mut WindowModel, child: NodeId, mut key: PendingKey, kind: TimerKind) -> Vec<Cmd> {
    let mode = model.current_mode();
    let mut cmds = Vec::new();

    // Typing the first `j` of an insert-mode `jj` mapping still types it
    if mode == Mode::Insert && !key.passed_through {
        cmds.push(Cmd::PassThrough(key.event.clone()));
        key.passed_through = true;
    }

    model.pending.keys.push(key);
    model.pending.node = Some(child);

    if let Some(previous) = model.pending.timer.filter(|&previous| previous != kind) {
        cmds.push(Cmd::CancelTimer { kind: previous });
    }
    let sequence_id = model.pending.arm(kind);
    let delay_ms = match kind {
        TimerKind::TieBreak => model.config.tie_break_timeout_ms,
        TimerKind::Idle => model.config.mapping_timeout_ms,
    };

    let text = model.pending_display();
    cmds.extend(set_display(model, text));
    cmds.push(Cmd::KeyState {
        mode,
        sequence: model.pending.display(),
        partial: true,
    });
    cmds.push(Cmd::StartTimer {
        kind,
        sequence_id,
        delay_ms,
    });
    cmds
}

fn no_match(model: &mut WindowModel, key: PendingKey) -> Vec<Cmd> {
    if model.pending.held.is_some() {
        let mut cmds = Vec::new();
        let (mut keys, held, timer) = model.pending.take();
        if let Some(kind) = timer {
            cmds.push(Cmd::CancelTimer { kind });
        }
        keys.push(key);
        if let Some(held) = held {
            cmds.extend(flush_held(model, held, keys));
        }
        return cmds;
    }

    if !model.pending.is_empty() {
        tracing::trace!(
            target: "keys",
            "{}{} matches nothing",
            model.pending.display(),
            key.token
        );
    }

    let mut cmds = cancel_pending(model);
    match model.current_mode() {
        Mode::OpPending => cmds.extend(enter_mode(model, Mode::Normal, false)),
        // Hint keys never reach the trie walk
        Mode::Hint => {}
        Mode::Normal | Mode::Insert | Mode::Visual | Mode::Ignore | Mode::Command => {
            let text = model.pending_display();
            cmds.extend(set_display(model, text));
            if !key.passed_through {
                cmds.push(Cmd::PassThrough(key.event));
            }
        }
    }
    cmds
}

/// Run a held binding, then replay the keys typed after it from the root
fn flush_held(model: &mut WindowModel, held: HeldBinding, mut keys: Vec<PendingKey>) -> Vec<Cmd> {
    let rest = keys.split_off(held.len.min(keys.len()));
    let mut cmds = exec::execute(model, held.binding, &tokens(&keys));
    for key in rest {
        cmds.extend(process_key(model, key));
    }
    cmds
}

pub(super) fn handle_timer(model: &mut WindowModel, kind: TimerKind, sequence_id: u64) -> Vec<Cmd> {
    if model.pending.timer != Some(kind) || model.pending.sequence_id != sequence_id {
        tracing::trace!(
            target: "keys",
            "Stale {} timer #{} (current #{})",
            kind,
            sequence_id,
            model.pending.sequence_id
        );
        return Vec::new();
    }

    // The timer has fired, nothing left to cancel
    model.pending.timer = None;

    if kind == TimerKind::TieBreak && model.pending.held.is_some() {
        let (keys, held, _) = model.pending.take();
        if let Some(held) = held {
            tracing::debug!(target: "keys", "Tie-break expired, running held binding");
            return flush_held(model, held, keys);
        }
    }

    tracing::debug!(
        target: "keys",
        "Abandoning {} after {} timeout",
        model.pending.display(),
        kind
    );
    let mut cmds = cancel_pending(model);
    let text = model.pending_display();
    cmds.extend(set_display(model, text));
    cmds
}

/// Drop the pending sequence, disarming its timer
pub(super) fn cancel_pending(model: &mut WindowModel) -> Vec<Cmd> {
    let mode = model.current_mode();
    let (keys, _, timer) = model.pending.take();

    let mut cmds = Vec::new();
    if let Some(kind) = timer {
        cmds.push(Cmd::CancelTimer { kind });
    }
    if !keys.is_empty() {
        cmds.push(Cmd::KeyState {
            mode,
            sequence: String::new(),
            partial: false,
        });
    }
    cmds
}

fn tokens(keys: &[PendingKey]) -> Vec<KeyToken> {
    keys.iter().map(|k| k.token.clone()).collect()
}
