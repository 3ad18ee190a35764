//! Running matched bindings and handling host command completions

use super::mode::{enter_mode, set_display};
use super::{hints, jumps};
use crate::commands::{Cmd, CommandTicket, NotifyLevel};
use crate::keymap::{display_sequence, Binding, Command, KeyContext, KeyToken};
use crate::messages::CommandResult;
use crate::mode::{Mode, ModeRequest};
use crate::model::WindowModel;

/// Run a binding that matched `keys`
///
/// The command's declared mode request is applied first, so a host command's
/// ticket carries the generation it will complete against.
pub fn execute(model: &mut WindowModel, binding: Binding, keys: &[KeyToken]) -> Vec<Cmd> {
    let typed_in = model.current_mode();
    let sequence = display_sequence(keys);
    tracing::debug!(target: "keys", mode = %typed_in, "{} → {}", sequence, binding.command);

    let mut cmds = vec![Cmd::KeyState {
        mode: typed_in,
        sequence: sequence.clone(),
        partial: false,
    }];

    cmds.extend(apply_mode_request(model, binding.command.mode_request()));

    match &binding.command {
        Command::ModeChange(Mode::OpPending) if model.current_mode() == Mode::OpPending => {
            model.operator = Some(sequence.clone());
        }
        Command::ModeChange(_) | Command::Unbound => {}
        Command::Hint(options) => cmds.extend(hints::start(model, options.clone())),
        Command::JumpBackward => cmds.extend(jumps::jump(model, jumps::JumpDirection::Backward)),
        Command::JumpForward => cmds.extend(jumps::jump(model, jumps::JumpDirection::Forward)),
        Command::Excmd(_) => {
            let ticket = model.next_ticket();
            let context = KeyContext::new(model.id, typed_in, sequence.clone());
            cmds.push(Cmd::Execute {
                binding: binding.clone(),
                context,
                ticket,
            });
        }
    }

    let text = if binding.options.retain_key_display {
        sequence
    } else {
        model.pending_display()
    };
    cmds.extend(set_display(model, text));
    cmds
}

/// Apply what a command asked for with respect to modes
pub fn apply_mode_request(model: &mut WindowModel, request: ModeRequest) -> Vec<Cmd> {
    match request {
        ModeRequest::None => Vec::new(),
        ModeRequest::Enter(mode) => enter_mode(model, mode, true),
        ModeRequest::RevertTransient if model.current_mode().is_transient() => {
            enter_mode(model, Mode::Normal, false)
        }
        ModeRequest::RevertTransient => Vec::new(),
    }
}

/// A host command completed
///
/// Mode overrides only apply while the mode generation is the one the
/// command was dispatched in; otherwise the user has already moved on.
pub(super) fn handle_finished(
    model: &mut WindowModel,
    ticket: CommandTicket,
    result: CommandResult,
) -> Vec<Cmd> {
    let current = ticket.generation == model.mode.generation;

    match result {
        Ok(None) => Vec::new(),
        Ok(Some(request)) if current => apply_mode_request(model, request),
        Ok(Some(request)) => {
            tracing::debug!(
                target: "mode",
                "Ignoring {:?} from command #{} (generation {} is now {})",
                request,
                ticket.id,
                ticket.generation,
                model.mode.generation
            );
            Vec::new()
        }
        Err(message) => {
            tracing::warn!("Command #{} failed: {}", ticket.id, message);
            let mut cmds = vec![Cmd::notify(NotifyLevel::Error, message)];
            if current {
                cmds.extend(apply_mode_request(model, ModeRequest::RevertTransient));
            }
            cmds
        }
    }
}
