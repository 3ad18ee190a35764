//! All open windows, sharing one configuration and one set of keymaps

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{WindowId, WindowModel};
use crate::commands::Cmd;
use crate::config::EngineConfig;
use crate::keymap::{load_default_keymap, Keymaps};
use crate::messages::Msg;
use crate::update::update;

/// Maps window ids to their models
#[derive(Debug, Clone)]
pub struct WindowRegistry {
    config: Arc<EngineConfig>,
    keymaps: Arc<Keymaps>,
    windows: BTreeMap<WindowId, WindowModel>,
}

impl WindowRegistry {
    pub fn new(config: Arc<EngineConfig>, keymaps: Arc<Keymaps>) -> Self {
        Self {
            config,
            keymaps,
            windows: BTreeMap::new(),
        }
    }

    /// Registry using the config file and the layered default keymaps
    pub fn load() -> Self {
        let config = EngineConfig::load();
        let keymaps = Keymaps::with_bindings(load_default_keymap(), config.leader());
        Self::new(Arc::new(config), Arc::new(keymaps))
    }

    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    pub fn keymaps(&self) -> &Arc<Keymaps> {
        &self.keymaps
    }

    /// Get or create the model of a window
    pub fn open(&mut self, id: WindowId) -> &mut WindowModel {
        let config = &self.config;
        let keymaps = &self.keymaps;
        self.windows.entry(id).or_insert_with(|| {
            tracing::debug!("Opening {}", id);
            WindowModel::new(id, Arc::clone(config), Arc::clone(keymaps))
        })
    }

    pub fn close(&mut self, id: WindowId) -> Option<WindowModel> {
        tracing::debug!("Closing {}", id);
        self.windows.remove(&id)
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowModel> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut WindowModel> {
        self.windows.get_mut(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Route a message to one window, opening it if needed
    pub fn dispatch(&mut self, id: WindowId, msg: Msg) -> Option<Cmd> {
        update(self.open(id), msg)
    }

    /// Share new configuration and keymaps with every window
    pub fn reload(&mut self, config: EngineConfig, keymaps: Keymaps) -> Vec<(WindowId, Cmd)> {
        self.config = Arc::new(config);
        self.keymaps = Arc::new(keymaps);
        tracing::info!(
            "Reloaded configuration ({} bindings) for {} windows",
            self.keymaps.len(),
            self.windows.len()
        );

        let mut cmds = Vec::new();
        for (&id, model) in self.windows.iter_mut() {
            let msg = Msg::Reload {
                config: Arc::clone(&self.config),
                keymaps: Arc::clone(&self.keymaps),
            };
            if let Some(cmd) = update(model, msg) {
                cmds.push((id, cmd));
            }
        }
        cmds
    }
}
