//! Context handed to the host along with a command to execute

use serde::Serialize;

use crate::mode::Mode;
use crate::model::WindowId;

/// Where and how a binding was triggered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyContext {
    pub window: WindowId,
    /// Mode the sequence was typed in
    pub mode: Mode,
    /// The typed sequence, e.g. `<leader>f` after resolution: `<Space>f`
    pub keys: String,
}

impl KeyContext {
    pub fn new(window: WindowId, mode: Mode, keys: impl Into<String>) -> Self {
        Self {
            window,
            mode,
            keys: keys.into(),
        }
    }
}
