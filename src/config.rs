//! Engine configuration
//!
//! Stored in `~/.config/keyseq/config.yaml`. Every field has a default, so a
//! partial file (or none at all) is fine.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hints::{HintAlphabet, LabelGenerator};
use crate::jumplist::DEFAULT_MAX_ENTRIES;
use crate::keymap::{
    parse_keystroke, KeyCode, KeyboardLayout, Keystroke, LayoutPolicy, LayoutRegistry,
    BUILTIN_LAYOUT,
};
use crate::mode::{Mode, ModeChangePattern};

/// How long an ambiguous match waits for a longer binding
pub const DEFAULT_TIE_BREAK_MS: u64 = 200;

/// How long a partial sequence waits for its next key
pub const DEFAULT_MAPPING_TIMEOUT_MS: u64 = 1000;

pub const DEFAULT_HINT_CHARS: &str = "hjklasdfgyuiopqwertnmzxcvb";

/// Errors from loading, saving or changing configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,

    #[error("failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for {option}: {reason}")]
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },
}

/// Events an autocmd can hook
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutocmdEvent {
    #[default]
    ModeChanged,
}

/// A command line the host runs when an event matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocmdConfig {
    #[serde(default)]
    pub event: AutocmdEvent,
    /// `old:new` with `*` for any mode, e.g. `"*:insert"`
    pub pattern: String,
    pub command: String,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the active physical layout
    pub keyboard_layout: String,
    /// When keys are matched by physical position
    pub keymaps_use_physical_layout: LayoutPolicy,
    /// User layouts, by name
    pub keyboard_layouts: BTreeMap<String, KeyboardLayout>,
    /// Key that `<leader>` stands for
    pub mapleader: String,
    pub jumplist_max_entries: usize,
    pub hint_chars: String,
    /// Typing cost per hint character; unlisted characters cost 1
    pub hint_char_weights: HashMap<char, u32>,
    pub hint_label_generator: LabelGenerator,
    /// Enter insert mode when an editable element gains focus
    pub switch_mode_on_focus: bool,
    pub tie_break_timeout_ms: u64,
    pub mapping_timeout_ms: u64,
    pub autocmds: Vec<AutocmdConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            keyboard_layout: BUILTIN_LAYOUT.to_string(),
            keymaps_use_physical_layout: LayoutPolicy::Auto,
            keyboard_layouts: BTreeMap::new(),
            mapleader: "<Space>".to_string(),
            jumplist_max_entries: DEFAULT_MAX_ENTRIES,
            hint_chars: DEFAULT_HINT_CHARS.to_string(),
            hint_char_weights: HashMap::new(),
            hint_label_generator: LabelGenerator::PrefixFree,
            switch_mode_on_focus: true,
            tie_break_timeout_ms: DEFAULT_TIE_BREAK_MS,
            mapping_timeout_ms: DEFAULT_MAPPING_TIMEOUT_MS,
            autocmds: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found or invalid
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and validate config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate config YAML
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |message: String| ConfigError::Write {
            path: path.to_path_buf(),
            message,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| write_err(e.to_string()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Check the fields serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_keystroke(&self.mapleader).map_err(|e| ConfigError::InvalidValue {
            option: "mapleader".to_string(),
            value: self.mapleader.clone(),
            reason: e.to_string(),
        })?;

        if self.layouts().get(&self.keyboard_layout).is_none() {
            return Err(ConfigError::InvalidValue {
                option: "keyboard_layout".to_string(),
                value: self.keyboard_layout.clone(),
                reason: "no such layout".to_string(),
            });
        }

        for autocmd in &self.autocmds {
            autocmd
                .pattern
                .parse::<ModeChangePattern>()
                .map_err(|e| ConfigError::InvalidValue {
                    option: "autocmds".to_string(),
                    value: autocmd.pattern.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }

    /// The leader key, `<Space>` if `mapleader` does not parse
    pub fn leader(&self) -> Keystroke {
        parse_keystroke(&self.mapleader).unwrap_or_else(|e| {
            tracing::warn!("Invalid mapleader {:?}: {}", self.mapleader, e);
            Keystroke::key(KeyCode::Space)
        })
    }

    /// Builtin layouts plus the configured ones
    pub fn layouts(&self) -> LayoutRegistry {
        LayoutRegistry::with_custom(&self.keyboard_layouts)
    }

    /// The active layout, falling back to the builtin one
    pub fn active_layout(&self) -> KeyboardLayout {
        let registry = self.layouts();
        match registry.get(&self.keyboard_layout) {
            Some(layout) => layout.clone(),
            None => {
                tracing::warn!(
                    "Unknown keyboard layout {:?}, using {}",
                    self.keyboard_layout,
                    BUILTIN_LAYOUT
                );
                KeyboardLayout::qwerty()
            }
        }
    }

    /// Hint characters with their weights
    pub fn hint_alphabet(&self) -> HintAlphabet {
        HintAlphabet::weighted(&self.hint_chars, &self.hint_char_weights)
    }

    /// Autocmds whose pattern matches a `ModeChanged` from `old` to `new`
    pub fn mode_changed_autocmds(
        &self,
        old: Mode,
        new: Mode,
    ) -> impl Iterator<Item = &AutocmdConfig> {
        self.autocmds.iter().filter(move |autocmd| {
            autocmd.event == AutocmdEvent::ModeChanged
                && autocmd
                    .pattern
                    .parse::<ModeChangePattern>()
                    .is_ok_and(|pattern| pattern.matches(old, new))
        })
    }

    /// Current value of an option, rendered as YAML
    pub fn get_option(&self, name: &str) -> Result<String, ConfigError> {
        let value = self.to_mapping()?;
        let field = value
            .get(name)
            .ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        let text = serde_yaml::to_string(field).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(text.trim_end().to_string())
    }

    /// Set an option from its textual form
    ///
    /// The value is read as YAML, so `set_option("tie_break_timeout_ms", "50")`
    /// and `set_option("keymaps_use_physical_layout", "force")` both work. A
    /// value that only makes sense as a string (`hint_chars: 123`) is retried
    /// as one. The config is unchanged when this fails.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let mut mapping = self.to_mapping()?;
        let key = serde_yaml::Value::String(name.to_string());
        if !mapping.contains_key(&key) {
            return Err(ConfigError::UnknownOption(name.to_string()));
        }

        let parsed: serde_yaml::Value = serde_yaml::from_str(value)
            .unwrap_or_else(|_| serde_yaml::Value::String(value.to_string()));

        let invalid = |reason: String| ConfigError::InvalidValue {
            option: name.to_string(),
            value: value.to_string(),
            reason,
        };

        mapping.insert(key.clone(), parsed);
        let updated = match serde_yaml::from_value::<Self>(serde_yaml::Value::Mapping(
            mapping.clone(),
        )) {
            Ok(config) => config,
            Err(first) => {
                mapping.insert(key, serde_yaml::Value::String(value.to_string()));
                serde_yaml::from_value::<Self>(serde_yaml::Value::Mapping(mapping))
                    .map_err(|_| invalid(first.to_string()))?
            }
        };

        updated.validate()?;
        tracing::debug!("Option {} = {}", name, value);
        *self = updated;
        Ok(())
    }

    fn to_mapping(&self) -> Result<serde_yaml::Mapping, ConfigError> {
        match serde_yaml::to_value(self) {
            Ok(serde_yaml::Value::Mapping(mapping)) => Ok(mapping),
            Ok(_) => Err(ConfigError::Parse("config is not a mapping".to_string())),
            Err(e) => Err(ConfigError::Parse(e.to_string())),
        }
    }
}
