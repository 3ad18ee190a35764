//! keyseq - modal key-sequence resolution engine
//!
//! This crate turns raw key events into commands the way a modal editor or
//! browser extension does: layout-aware key notation, per-mode keymap tries
//! with tie-break timeouts, hint labels and a jumplist. It follows the Elm
//! Architecture pattern; hosts feed `Msg`s into [`update`] and carry out the
//! `Cmd`s it returns.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod hints;
pub mod jumplist;
pub mod keymap;
pub mod messages;
pub mod mode;
pub mod model;
pub mod runtime;
pub mod scope;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EngineConfig;
pub use messages::Msg;
pub use mode::Mode;
pub use model::WindowModel;
pub use update::update;
