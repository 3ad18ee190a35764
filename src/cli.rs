//! Command-line argument parsing for the `keyseq` host
//!
//! Supports:
//! - Replaying key notation through the engine with a virtual clock
//! - Listing the effective keybindings
//! - Printing hint labels
//! - Showing configuration values

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::keymap::LayoutPolicy;
use crate::mode::Mode;
use crate::scope::parse_override;

/// Modal key-sequence resolution engine
#[derive(Parser, Debug)]
#[command(name = "keyseq", version, about = "Modal key-sequence resolution engine")]
pub struct CliArgs {
    /// Config file to use instead of ~/.config/keyseq/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extra keymap files layered over the defaults, in order
    #[arg(long = "keymap", global = true, value_name = "PATH")]
    pub keymaps: Vec<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run key notation through the engine and print every emitted command
    Replay(ReplayArgs),

    /// List bindings
    Keys {
        /// Only these modes (default: all)
        #[arg(long = "mode", value_name = "MODE")]
        modes: Vec<Mode>,
    },

    /// Print hint labels for COUNT targets
    Hints {
        count: usize,

        /// Label characters (default: hint_chars)
        #[arg(long)]
        chars: Option<String>,

        /// Number the labels instead
        #[arg(long)]
        numeric: bool,
    },

    /// Show the effective configuration, or one option of it
    Config {
        name: Option<String>,

        /// Print where config, keymap and log files live instead
        #[arg(long, conflicts_with = "name")]
        paths: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Physical layout to match keys against
    #[arg(long, value_name = "NAME")]
    pub layout: Option<String>,

    /// When to match by physical key position
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Override an option for this run, e.g. --set tie_break_timeout_ms=50
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,

    /// Number of hint targets the simulated page has
    #[arg(long, default_value_t = 5)]
    pub targets: u64,

    /// Make a host command fail, e.g. --fail tab_close
    #[arg(long = "fail", value_name = "COMMAND")]
    pub failures: Vec<String>,

    /// Leave armed timers pending at the end instead of firing them
    #[arg(long)]
    pub no_settle: bool,

    /// Key notation, with `--wait <ms>` between keys to let time pass
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "SEQUENCE"
    )]
    pub sequence: Vec<String>,
}

/// `LayoutPolicy` as a command-line value
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    Force,
    Never,
    Auto,
}

impl From<PolicyArg> for LayoutPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Force => LayoutPolicy::Force,
            PolicyArg::Never => LayoutPolicy::Never,
            PolicyArg::Auto => LayoutPolicy::Auto,
        }
    }
}

/// One step of a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Keys(String),
    Wait(u64),
}

impl ReplayArgs {
    /// The option overrides this run asks for, in application order
    pub fn option_overrides(&self) -> Result<Vec<(String, String)>, String> {
        let mut overrides = Vec::new();
        if let Some(layout) = &self.layout {
            overrides.push(("keyboard_layout".to_string(), layout.clone()));
        }
        if let Some(policy) = self.policy {
            let name = match LayoutPolicy::from(policy) {
                LayoutPolicy::Force => "force",
                LayoutPolicy::Never => "never",
                LayoutPolicy::Auto => "auto",
            };
            overrides.push(("keymaps_use_physical_layout".to_string(), name.to_string()));
        }
        for text in &self.overrides {
            overrides.push(parse_override(text).map_err(|e| e.to_string())?);
        }
        Ok(overrides)
    }

    /// Split the sequence into key runs and waits
    pub fn steps(&self) -> Result<Vec<ReplayStep>, String> {
        parse_steps(&self.sequence)
    }
}

/// Parse `gg --wait 300 d --wait=50 w` style replay arguments
pub fn parse_steps(args: &[String]) -> Result<Vec<ReplayStep>, String> {
    let mut steps = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let wait = if let Some(value) = arg.strip_prefix("--wait=") {
            Some(value.to_string())
        } else if arg == "--wait" {
            Some(
                iter.next()
                    .ok_or_else(|| "--wait needs a duration in ms".to_string())?
                    .clone(),
            )
        } else {
            None
        };

        match wait {
            Some(value) => {
                let ms = value
                    .trim_end_matches("ms")
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --wait duration '{}'", value))?;
                steps.push(ReplayStep::Wait(ms));
            }
            None => steps.push(ReplayStep::Keys(arg.clone())),
        }
    }

    Ok(steps)
}
