//! Where keyseq keeps its files
//!
//! ```text
//! <config dir>/keyseq/
//!   config.yaml            EngineConfig
//!   keymap.yaml            user keymap layer
//!   logs/keyseq.log.DATE   daily rotated logs
//! ```
//!
//! `<config dir>` is `$XDG_CONFIG_HOME` or `~/.config` on Unix and macOS,
//! `%APPDATA%` on Windows. Nothing else in the crate builds these paths.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR: &str = "keyseq";

/// Prefix of the daily rotated log files
pub const LOG_FILE_PREFIX: &str = "keyseq.log";

/// Keymap layer looked up in the working directory
pub const PROJECT_KEYMAP: &str = "keymap.yaml";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("no config directory available")]
    NoConfigDir,

    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn base_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        env::var_os("APPDATA")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
    } else {
        env::var_os("XDG_CONFIG_HOME")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
    }
}

/// `<config dir>/keyseq`
pub fn config_dir() -> Option<PathBuf> {
    base_dir().map(|base| base.join(APP_DIR))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn keymap_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("keymap.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Keymap files layered over the embedded defaults, lowest priority first:
/// the project-local `keymap.yaml`, then the user's.
pub fn keymap_layers() -> Vec<PathBuf> {
    std::iter::once(PathBuf::from(PROJECT_KEYMAP))
        .chain(keymap_file())
        .collect()
}

/// Newest `keyseq.log.YYYY-MM-DD` in the logs dir, or the undated name when
/// nothing has been written yet
pub fn log_file() -> Option<PathBuf> {
    let logs = logs_dir()?;

    let newest = fs::read_dir(&logs)
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX))
        })
        // Date suffixes compare lexically
        .max();

    Some(newest.unwrap_or_else(|| logs.join(LOG_FILE_PREFIX)))
}

fn create(path: &Path) -> Result<(), PathError> {
    fs::create_dir_all(path).map_err(|source| PathError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// Create the logs dir (and the config dir above it) if missing
pub fn ensure_logs_dir() -> Result<PathBuf, PathError> {
    let logs = logs_dir().ok_or(PathError::NoConfigDir)?;
    create(&logs)?;
    Ok(logs)
}
