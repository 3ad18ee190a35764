//! Message types for the Elm-style architecture
//!
//! Everything that happens to a window reaches the engine as a `Msg`.

use std::sync::Arc;

use crate::commands::{CommandTicket, TimerKind};
use crate::config::EngineConfig;
use crate::hints::HintTarget;
use crate::keymap::{Keymaps, RawKeyEvent};
use crate::mode::ModeRequest;
use crate::model::TargetId;

/// Outcome of a host command: an optional mode override, or an error message
pub type CommandResult = Result<Option<ModeRequest>, String>;

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    /// A keyboard event, in arrival order
    Key(RawKeyEvent),

    /// An editable element gained (`true`) or lost (`false`) focus
    Focus { editable: bool },

    /// The page entered or left fullscreen
    Fullscreen { active: bool },

    /// A timer armed with `Cmd::StartTimer` fired
    TimerElapsed { kind: TimerKind, sequence_id: u64 },

    /// A command dispatched with `Cmd::Execute` completed
    CommandFinished {
        ticket: CommandTicket,
        result: CommandResult,
    },

    /// Targets collected for `Cmd::CollectHintTargets`
    HintTargets {
        request: u64,
        targets: Vec<HintTarget>,
    },

    /// A target became active (tab switch, page load)
    TargetActivated(TargetId),

    /// A target went away
    TargetRemoved(TargetId),

    /// Configuration and keymaps were reloaded
    Reload {
        config: Arc<EngineConfig>,
        keymaps: Arc<Keymaps>,
    },
}
