//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging mode
//! transitions and pending key sequences.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=keys=trace,mode=debug` - scoped filtering
//! - `RUST_LOG=keyseq::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/keyseq/logs/keyseq.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_PREFIX;
use crate::mode::Mode;
use crate::model::WindowModel;

/// Initialize tracing subscriber with console and file logging
///
/// Console output goes to stderr and respects RUST_LOG (default `warn`).
/// File logging writes to `~/.config/keyseq/logs/keyseq.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (tests, embedding hosts) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of window input state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub mode: Mode,
    pub sticky: bool,
    pub generation: u64,
    pub pending: String,
    pub jump_index: Option<usize>,
    pub jump_len: usize,
    pub hints_visible: Option<usize>,
}

impl StateSnapshot {
    pub fn from_model(model: &WindowModel) -> Self {
        Self {
            mode: model.mode.mode,
            sticky: model.mode.sticky,
            generation: model.mode.generation,
            pending: model.pending.display(),
            jump_index: model.jumplist.index(),
            jump_len: model.jumplist.len(),
            hints_visible: model.hints.as_ref().map(|h| h.visible().len()),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &StateSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.mode != other.mode || self.sticky != other.sticky {
            changes.push(format!(
                "mode: {}{} → {}{}",
                self.mode,
                if self.sticky { "!" } else { "" },
                other.mode,
                if other.sticky { "!" } else { "" }
            ));
        }
        if self.pending != other.pending {
            changes.push(format!("pending: {:?} → {:?}", self.pending, other.pending));
        }
        if self.jump_index != other.jump_index || self.jump_len != other.jump_len {
            changes.push(format!(
                "jumplist: {:?}/{} → {:?}/{}",
                self.jump_index, self.jump_len, other.jump_index, other.jump_len
            ));
        }
        if self.hints_visible != other.hints_visible {
            changes.push(format!(
                "hints: {:?} → {:?}",
                self.hints_visible, other.hints_visible
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
