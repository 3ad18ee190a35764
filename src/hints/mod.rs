//! Hint mode: labelling on-screen targets so they can be picked by typing
//!
//! ```text
//! hint command → Cmd::CollectHintTargets → Msg::HintTargets
//!   → labels assigned → Cmd::ShowHints → typed chars filter → Cmd::SelectHint
//! ```

pub mod labels;
mod session;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keymap::CommandParseError;
use crate::model::TargetId;

pub use labels::{numeric, HintAlphabet};
pub use session::{HintInput, HintSession};

/// Something the host can label and activate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HintTarget {
    pub id: TargetId,
    pub x: i32,
    pub y: i32,
}

impl HintTarget {
    pub fn new(id: TargetId, x: i32, y: i32) -> Self {
        Self { id, x, y }
    }
}

/// A target paired with the label shown next to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintAssignment {
    pub target: HintTarget,
    pub label: String,
}

/// When to activate a target without waiting for a label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoActivate {
    #[default]
    Never,
    /// Activate when there is exactly one target
    Single,
    /// Activate the first target whenever there is one
    Always,
}

/// What to do with the picked target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintAction {
    #[default]
    Follow,
    NewTab,
}

/// Label scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelGenerator {
    #[default]
    PrefixFree,
    Numeric,
}

impl LabelGenerator {
    pub fn labels(self, alphabet: &HintAlphabet, count: usize) -> Vec<String> {
        match self {
            LabelGenerator::PrefixFree => alphabet.assign(count),
            LabelGenerator::Numeric => numeric(count),
        }
    }
}

/// Options of the `hint` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HintOptions {
    #[serde(default)]
    pub auto_activate: AutoActivate,
    #[serde(default)]
    pub action: HintAction,
    /// Extra selector for the host to include when collecting targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    /// Overrides the configured label generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelGenerator>,
}

impl HintOptions {
    /// Parse `--auto`, `--auto=always`, `--action=newtab`, `--include <sel>`, `--numeric`
    pub fn from_args(args: &[String]) -> Result<Self, CommandParseError> {
        let mut options = HintOptions::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag, Some(value.to_string())),
                None => (arg.as_str(), None),
            };

            match flag {
                "--auto" | "--auto-activate" => {
                    options.auto_activate = match inline.as_deref() {
                        None | Some("single") | Some("true") => AutoActivate::Single,
                        Some("always") => AutoActivate::Always,
                        Some("never") | Some("false") => AutoActivate::Never,
                        Some(other) => return Err(invalid(flag, other)),
                    };
                }
                "--action" => {
                    let value = value_for(flag, inline, &mut iter)?;
                    options.action = match value.as_str() {
                        "follow" | "click" => HintAction::Follow,
                        "newtab" | "new_tab" => HintAction::NewTab,
                        other => return Err(invalid(flag, other)),
                    };
                }
                "--include" => {
                    options.include = Some(value_for(flag, inline, &mut iter)?);
                }
                "--numeric" => options.labels = Some(LabelGenerator::Numeric),
                "--labels" => {
                    let value = value_for(flag, inline, &mut iter)?;
                    options.labels = Some(match value.as_str() {
                        "numeric" => LabelGenerator::Numeric,
                        "prefix_free" | "prefix-free" => LabelGenerator::PrefixFree,
                        other => return Err(invalid(flag, other)),
                    });
                }
                _ => {
                    return Err(CommandParseError::UnknownOption {
                        command: "hint".to_string(),
                        option: arg.clone(),
                    })
                }
            }
        }

        Ok(options)
    }
}

fn value_for<'a>(
    flag: &str,
    inline: Option<String>,
    rest: &mut impl Iterator<Item = &'a String>,
) -> Result<String, CommandParseError> {
    inline
        .or_else(|| rest.next().cloned())
        .ok_or_else(|| CommandParseError::MissingArgument {
            command: "hint".to_string(),
            argument: flag.to_string(),
        })
}

fn invalid(flag: &str, value: &str) -> CommandParseError {
    CommandParseError::InvalidValue {
        option: flag.to_string(),
        value: value.to_string(),
    }
}

impl fmt::Display for HintOptions {
    /// Flags in the form accepted by [`HintOptions::from_args`], each with a leading space
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.auto_activate {
            AutoActivate::Never => {}
            AutoActivate::Single => f.write_str(" --auto")?,
            AutoActivate::Always => f.write_str(" --auto=always")?,
        }
        if self.action == HintAction::NewTab {
            f.write_str(" --action=newtab")?;
        }
        if let Some(include) = &self.include {
            if include.contains(char::is_whitespace) {
                write!(f, " --include '{}'", include)?;
            } else {
                write!(f, " --include={}", include)?;
            }
        }
        match self.labels {
            Some(LabelGenerator::Numeric) => f.write_str(" --numeric")?,
            Some(LabelGenerator::PrefixFree) => f.write_str(" --labels=prefix_free")?,
            None => {}
        }
        Ok(())
    }
}

/// Pair targets with labels in the order the host reported them
pub fn assign_hints(
    targets: &[HintTarget],
    alphabet: &HintAlphabet,
    generator: LabelGenerator,
) -> Vec<HintAssignment> {
    generator
        .labels(alphabet, targets.len())
        .into_iter()
        .zip(targets)
        .map(|(label, target)| HintAssignment {
            target: *target,
            label,
        })
        .collect()
}
