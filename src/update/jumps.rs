//! Jumplist navigation and target lifecycle

use crate::commands::Cmd;
use crate::model::{TargetId, WindowModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum JumpDirection {
    Backward,
    Forward,
}

pub(super) fn jump(model: &mut WindowModel, direction: JumpDirection) -> Vec<Cmd> {
    let target = match direction {
        JumpDirection::Backward => model.jumplist.jump_backwards(),
        JumpDirection::Forward => model.jumplist.jump_forwards(),
    };

    match target {
        Some(target) => {
            tracing::debug!(
                target: "jumplist",
                "{:?} to {} (index {:?})",
                direction,
                target,
                model.jumplist.index()
            );
            vec![Cmd::Activate(target)]
        }
        None => {
            tracing::trace!(target: "jumplist", "Nothing to jump to {:?}", direction);
            Vec::new()
        }
    }
}

/// Record activations; the echo of our own jump is skipped by the jumplist
pub(super) fn handle_activated(model: &mut WindowModel, target: TargetId) -> Vec<Cmd> {
    if model.jumplist.record(target) {
        tracing::trace!(target: "jumplist", "Recorded {}", target);
    } else {
        tracing::trace!(target: "jumplist", "Activation of {} came from a jump", target);
    }
    Vec::new()
}

pub(super) fn handle_removed(model: &mut WindowModel, target: TargetId) -> Vec<Cmd> {
    model.jumplist.on_target_removed(target);
    Vec::new()
}
