//! YAML configuration parsing for keymaps
//!
//! Parses keymap.yaml files into Keybinding structs:
//!
//! ```yaml
//! bindings:
//!   - key: "<C-o>"
//!     command: jumplist_back
//!   - key: "jj"
//!     mode: insert
//!     command: mode_change normal
//!   - key: "<Esc>"
//!     mode: [normal, visual]
//!     command: mode_change normal
//!     description: Back to normal mode
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::binding::Keybinding;
use super::command::{Command, CommandParseError};
use super::notation::NotationError;
use crate::mode::{Mode, UnknownMode};

/// Errors that can occur when parsing keymaps
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid key sequence `{key}`: {source}")]
    InvalidSequence {
        key: String,
        #[source]
        source: NotationError,
    },

    #[error("Invalid command `{command}`: {source}")]
    InvalidCommand {
        command: String,
        #[source]
        source: CommandParseError,
    },

    #[error("Invalid mode: {0}")]
    InvalidMode(#[from] UnknownMode),
}

/// Root structure of a keymap YAML file
#[derive(Debug, Deserialize)]
pub struct KeymapConfig {
    pub bindings: Vec<BindingConfig>,
}

/// One mode name or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModeList {
    One(String),
    Many(Vec<String>),
}

/// A single binding entry from YAML
#[derive(Debug, Deserialize)]
pub struct BindingConfig {
    pub key: String,
    pub command: String,
    /// Modes the binding applies to, normal when omitted
    #[serde(default)]
    pub mode: Option<ModeList>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub retain_key_display: bool,
    #[serde(default)]
    pub platform: Option<String>,
}

impl BindingConfig {
    /// Convert into a keybinding; `None` when the entry is for another platform
    pub fn to_keybinding(&self) -> Result<Option<Keybinding>, KeymapError> {
        if let Some(ref platform) = self.platform {
            if platform != get_current_platform() {
                return Ok(None);
            }
        }

        let modes = parse_modes(self.mode.as_ref())?;
        let command: Command =
            self.command
                .parse()
                .map_err(|source| KeymapError::InvalidCommand {
                    command: self.command.clone(),
                    source,
                })?;

        let mut binding = Keybinding::parse(modes, &self.key, command).map_err(|source| {
            KeymapError::InvalidSequence {
                key: self.key.clone(),
                source,
            }
        })?;
        if let Some(ref description) = self.description {
            binding = binding.description(description.clone());
        }
        Ok(Some(binding.retain_key_display(self.retain_key_display)))
    }
}

fn parse_modes(modes: Option<&ModeList>) -> Result<Vec<Mode>, KeymapError> {
    let names: Vec<&str> = match modes {
        None => return Ok(vec![Mode::Normal]),
        Some(ModeList::One(name)) => vec![name.as_str()],
        Some(ModeList::Many(names)) => names.iter().map(String::as_str).collect(),
    };

    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mode: Mode = name.parse()?;
        if !out.contains(&mode) {
            out.push(mode);
        }
    }
    Ok(out)
}

/// Load keybindings from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<Vec<Keybinding>, KeymapError> {
    let content = std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;

    parse_keymap_yaml(&content)
}

/// Parse keybindings from YAML string, failing on the first bad entry
pub fn parse_keymap_yaml(yaml: &str) -> Result<Vec<Keybinding>, KeymapError> {
    let config: KeymapConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    let mut bindings = Vec::new();
    for entry in &config.bindings {
        if let Some(binding) = entry.to_keybinding()? {
            bindings.push(binding);
        }
    }
    Ok(bindings)
}

/// Parse keybindings, skipping bad entries
///
/// Only a malformed document fails as a whole; rejected entries are returned
/// next to the bindings that did load.
pub fn parse_keymap_yaml_lenient(
    yaml: &str,
) -> Result<(Vec<Keybinding>, Vec<KeymapError>), KeymapError> {
    let config: KeymapConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    let mut bindings = Vec::new();
    let mut errors = Vec::new();
    for entry in &config.bindings {
        match entry.to_keybinding() {
            Ok(Some(binding)) => bindings.push(binding),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    Ok((bindings, errors))
}

/// Get the current platform identifier
fn get_current_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}
