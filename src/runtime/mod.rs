//! Runtime module - drives one window model like a host would
//!
//! - `host` - the effects only an embedding application can perform
//! - `timers` - timers on a virtual clock
//!
//! The runtime owns a message queue, a virtual clock and a timer queue.
//! Every `Cmd` the engine returns is recorded and, where it asks for an
//! answer (timers, host commands, hint targets, activations), the answer is
//! queued back as a `Msg`. Time only moves when [`Runtime::advance`] says so,
//! which makes timeouts reproducible.

pub mod host;
pub mod timers;

pub use host::{Host, ScriptedHost};
pub use timers::{ArmedTimer, TimerQueue};

use std::collections::VecDeque;

use serde::Serialize;

use crate::commands::Cmd;
use crate::config::ConfigError;
use crate::keymap::{split_keystrokes, KeyCode, KeyboardLayout, NotationError, RawKeyEvent};
use crate::messages::Msg;
use crate::model::WindowModel;
use crate::scope::OptionStore;
use crate::update::update;

/// A command the engine emitted, stamped with virtual time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emitted {
    pub at_ms: u64,
    pub cmd: Cmd,
}

/// Event loop around one window
pub struct Runtime<H: Host> {
    pub model: WindowModel,
    pub host: H,
    now_ms: u64,
    timers: TimerQueue,
    queue: VecDeque<Msg>,
    log: Vec<Emitted>,
    /// Physical keyboard replayed keys are typed on
    keyboard: KeyboardLayout,
}

impl<H: Host> Runtime<H> {
    pub fn new(model: WindowModel, host: H) -> Self {
        Self {
            model,
            host,
            now_ms: 0,
            timers: TimerQueue::new(),
            queue: VecDeque::new(),
            log: Vec::new(),
            keyboard: KeyboardLayout::qwerty(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Everything emitted so far
    pub fn log(&self) -> &[Emitted] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<Emitted> {
        std::mem::take(&mut self.log)
    }

    /// Commands emitted so far, without timestamps
    pub fn emitted(&self) -> Vec<Cmd> {
        self.log.iter().map(|e| e.cmd.clone()).collect()
    }

    /// Deliver a message and everything it causes
    pub fn send(&mut self, msg: Msg) {
        self.queue.push_back(msg);
        while let Some(msg) = self.queue.pop_front() {
            if let Some(cmd) = update(&mut self.model, msg) {
                for cmd in cmd.into_vec() {
                    self.perform(cmd);
                }
            }
        }
    }

    pub fn send_key(&mut self, event: RawKeyEvent) {
        self.send(Msg::Key(event));
    }

    /// Type key notation, as if on a physical qwerty keyboard
    ///
    /// `<leader>` is typed as the configured leader key.
    pub fn send_keys(&mut self, notation: &str) -> Result<(), NotationError> {
        let leader = self.model.keymaps.leader().clone();
        for stroke in split_keystrokes(notation)? {
            let stroke = stroke.resolve_leader(&leader);
            let mut event = RawKeyEvent::from_keystroke(&stroke);
            if let KeyCode::Char(c) = stroke.key {
                if let Some((code, _)) = self.keyboard.code_for(c) {
                    event = event.with_code(code);
                }
            }
            self.send_key(event);
        }
        Ok(())
    }

    /// Move the clock forward, firing timers that come due on the way
    pub fn advance(&mut self, ms: u64) {
        let until = self.now_ms + ms;
        while let Some(timer) = self.timers.pop_due(until) {
            self.now_ms = self.now_ms.max(timer.due_ms);
            self.send(Msg::TimerElapsed {
                kind: timer.kind,
                sequence_id: timer.sequence_id,
            });
        }
        self.now_ms = until;
    }

    /// Fire every armed timer
    pub fn settle(&mut self) {
        while let Some(due) = self.timers.next_due() {
            self.advance(due.saturating_sub(self.now_ms));
        }
    }

    fn perform(&mut self, cmd: Cmd) {
        tracing::trace!(target: "runtime", at_ms = self.now_ms, "{}", cmd);
        match &cmd {
            Cmd::StartTimer {
                kind,
                sequence_id,
                delay_ms,
            } => self
                .timers
                .arm(*kind, *sequence_id, self.now_ms + delay_ms),
            Cmd::CancelTimer { kind } => self.timers.cancel(*kind),
            Cmd::Execute {
                binding,
                context,
                ticket,
            } => {
                let result = self.host.run_command(binding, context);
                self.queue.push_back(Msg::CommandFinished {
                    ticket: *ticket,
                    result,
                });
            }
            Cmd::CollectHintTargets { options, request } => {
                let targets = self.host.hint_targets(options);
                self.queue.push_back(Msg::HintTargets {
                    request: *request,
                    targets,
                });
            }
            Cmd::Activate(target) => self.queue.push_back(Msg::TargetActivated(*target)),
            Cmd::None
            | Cmd::Batch(_)
            | Cmd::ModeChanged { .. }
            | Cmd::RunAutocmd { .. }
            | Cmd::DisplayPending(_)
            | Cmd::KeyState { .. }
            | Cmd::ShowHints(_)
            | Cmd::FilterHints { .. }
            | Cmd::ClearHints
            | Cmd::SelectHint { .. }
            | Cmd::PassThrough(_)
            | Cmd::Notify { .. } => {}
        }
        self.log.push(Emitted {
            at_ms: self.now_ms,
            cmd,
        });
    }
}

/// Options of the driven window
impl<H: Host> OptionStore for Runtime<H> {
    fn get_option(&self, name: &str) -> Result<String, ConfigError> {
        self.model.get_option(name)
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.model.set_option(name, value)
    }
}
