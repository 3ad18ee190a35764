//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod exec;
mod hints;
mod jumps;
mod keys;
mod mode;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::WindowModel;

#[cfg(debug_assertions)]
use crate::tracing::StateSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use exec::{apply_mode_request, execute};
pub use mode::enter_mode;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut WindowModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut WindowModel, msg: Msg) -> Option<Cmd> {
    let cmds = match msg {
        Msg::Key(event) => keys::handle_key(model, event),
        Msg::Focus { editable } => mode::handle_focus(model, editable),
        Msg::Fullscreen { active } => mode::handle_fullscreen(model, active),
        Msg::TimerElapsed { kind, sequence_id } => keys::handle_timer(model, kind, sequence_id),
        Msg::CommandFinished { ticket, result } => exec::handle_finished(model, ticket, result),
        Msg::HintTargets { request, targets } => hints::handle_targets(model, request, targets),
        Msg::TargetActivated(target) => jumps::handle_activated(model, target),
        Msg::TargetRemoved(target) => jumps::handle_removed(model, target),
        Msg::Reload { config, keymaps } => mode::handle_reload(model, config, keymaps),
    };

    Cmd::batch(cmds).into_option()
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after window state and logs diffs for debugging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut WindowModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", window = %model.id, msg = %msg_name).entered();

    let before = StateSnapshot::from_model(model);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = StateSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "state", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
///
/// Example outputs:
/// - `Key("j")`
/// - `TimerElapsed(tie-break #4)`
/// - `Focus(editable=true)`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Key(event) => format!("Key({:?})", event.key),
        Msg::Focus { editable } => format!("Focus(editable={})", editable),
        Msg::Fullscreen { active } => format!("Fullscreen(active={})", active),
        Msg::TimerElapsed { kind, sequence_id } => {
            format!("TimerElapsed({} #{})", kind, sequence_id)
        }
        Msg::CommandFinished { ticket, result } => format!(
            "CommandFinished(#{}@{} {})",
            ticket.id,
            ticket.generation,
            if result.is_ok() { "ok" } else { "err" }
        ),
        Msg::HintTargets { request, targets } => {
            format!("HintTargets(#{} n={})", request, targets.len())
        }
        Msg::TargetActivated(target) => format!("TargetActivated({})", target),
        Msg::TargetRemoved(target) => format!("TargetRemoved({})", target),
        Msg::Reload { .. } => "Reload".to_string(),
    }
}
