//! Temporary option overrides that undo themselves
//!
//! ```ignore
//! {
//!     let mut scoped = ScopedOverride::new(&mut model);
//!     scoped.set("keymaps_use_physical_layout", "force")?;
//!     // ... drive the model through `scoped` ...
//! } // previous values restored here, also on early return or panic
//! ```

use std::ops::{Deref, DerefMut};

use crate::config::{ConfigError, EngineConfig};
use crate::model::WindowModel;

/// Something with named, textual options
pub trait OptionStore {
    fn get_option(&self, name: &str) -> Result<String, ConfigError>;
    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError>;
}

impl OptionStore for EngineConfig {
    fn get_option(&self, name: &str) -> Result<String, ConfigError> {
        EngineConfig::get_option(self, name)
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        EngineConfig::set_option(self, name, value)
    }
}

/// Options of one window; changes only affect that window's copy
impl OptionStore for WindowModel {
    fn get_option(&self, name: &str) -> Result<String, ConfigError> {
        self.config.get_option(name)
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.config_mut().set_option(name, value)?;
        self.refresh_config();
        if name == "mapleader" {
            self.rebind_leader();
        }
        Ok(())
    }
}

/// Guard that restores every option it changed when dropped
pub struct ScopedOverride<'a, S: OptionStore> {
    store: &'a mut S,
    /// Previous values, in the order they were overridden
    saved: Vec<(String, String)>,
}

impl<'a, S: OptionStore> ScopedOverride<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            saved: Vec::new(),
        }
    }

    /// Apply `name=value` pairs, restoring on drop
    ///
    /// On error the overrides applied so far are rolled back before returning.
    pub fn apply(
        store: &'a mut S,
        overrides: &[(String, String)],
    ) -> Result<Self, ConfigError> {
        let mut scoped = Self::new(store);
        for (name, value) in overrides {
            scoped.set(name, value)?;
        }
        Ok(scoped)
    }

    /// Override one option for the lifetime of the guard
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let previous = self.store.get_option(name)?;
        self.store.set_option(name, value)?;
        tracing::debug!("Scoped override {} = {} (was {})", name, value, previous);
        self.saved.push((name.to_string(), previous));
        Ok(())
    }

    /// Names of the overridden options
    pub fn overridden(&self) -> impl Iterator<Item = &str> {
        self.saved.iter().map(|(name, _)| name.as_str())
    }
}

impl<S: OptionStore> Deref for ScopedOverride<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.store
    }
}

impl<S: OptionStore> DerefMut for ScopedOverride<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.store
    }
}

impl<S: OptionStore> Drop for ScopedOverride<'_, S> {
    fn drop(&mut self) {
        // Newest first, so an option overridden twice ends at its original value
        while let Some((name, value)) = self.saved.pop() {
            if let Err(e) = self.store.set_option(&name, &value) {
                tracing::warn!("Failed to restore option {}: {}", name, e);
            }
        }
    }
}

/// Parse a `name=value` override
pub fn parse_override(text: &str) -> Result<(String, String), ConfigError> {
    match text.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidValue {
            option: text.to_string(),
            value: String::new(),
            reason: "expected name=value".to_string(),
        }),
    }
}
