use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use keyseq::cli::{CliArgs, CliCommand, ReplayArgs, ReplayStep};
use keyseq::config::EngineConfig;
use keyseq::config_paths;
use keyseq::hints::{numeric, HintAlphabet, HintTarget};
use keyseq::keymap::{load_keymap_layers, Keymaps};
use keyseq::mode::Mode;
use keyseq::model::{TargetId, WindowId, WindowModel};
use keyseq::runtime::{Runtime, ScriptedHost};
use keyseq::scope::ScopedOverride;

fn main() -> Result<()> {
    keyseq::tracing::init();

    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref())?;
    let keymaps = load_keymaps(&config, &args.keymaps);

    match args.command {
        CliCommand::Replay(replay_args) => replay(config, keymaps, &replay_args, args.json),
        CliCommand::Keys { modes } => list_keys(&keymaps, &modes, args.json),
        CliCommand::Hints {
            count,
            chars,
            numeric,
        } => print_hints(&config, count, chars.as_deref(), numeric, args.json),
        CliCommand::Config { name, paths } => show_config(&config, name.as_deref(), paths),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(EngineConfig::load()),
    }
}

fn load_keymaps(config: &EngineConfig, extra: &[PathBuf]) -> Keymaps {
    let mut layers = config_paths::keymap_layers();
    layers.extend(extra.iter().cloned());
    Keymaps::with_bindings(load_keymap_layers(&layers), config.leader())
}

fn replay(config: EngineConfig, keymaps: Keymaps, args: &ReplayArgs, json: bool) -> Result<()> {
    let steps = args.steps().map_err(anyhow::Error::msg)?;
    let overrides = args.option_overrides().map_err(anyhow::Error::msg)?;

    let targets = (0..args.targets)
        .map(|i| HintTarget::new(TargetId(i + 1), 0, (i * 20) as i32))
        .collect();
    let host = args
        .failures
        .iter()
        .fold(ScriptedHost::new().with_targets(targets), |host, command| {
            host.failing(command.clone(), format!("{} failed", command))
        });

    let model = WindowModel::new(WindowId(1), Arc::new(config), Arc::new(keymaps));
    let mut runtime = Runtime::new(model, host);
    let mut scoped =
        ScopedOverride::apply(&mut runtime, &overrides).context("applying option overrides")?;

    for step in steps {
        match step {
            ReplayStep::Keys(notation) => scoped
                .send_keys(&notation)
                .with_context(|| format!("parsing keys '{}'", notation))?,
            ReplayStep::Wait(ms) => scoped.advance(ms),
        }
    }
    if !args.no_settle {
        scoped.settle();
    }

    for emitted in scoped.log() {
        if json {
            println!("{}", serde_json::to_string(emitted)?);
        } else {
            for line in emitted.cmd.to_string().lines() {
                println!("{:>6}ms  {}", emitted.at_ms, line);
            }
        }
    }

    if !json {
        let model = &scoped.model;
        println!(
            "-- {} [{}] --",
            model.current_mode(),
            model.display.as_str()
        );
    }
    Ok(())
}

fn list_keys(keymaps: &Keymaps, modes: &[Mode], json: bool) -> Result<()> {
    let modes = if modes.is_empty() { &Mode::ALL[..] } else { modes };
    let entries = keymaps.list(modes);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in entries {
        let description = entry.binding.description.as_deref().unwrap_or("");
        println!(
            "{:<10} {:<14} {:<28} {}",
            entry.mode, entry.keys, entry.binding.command, description
        );
    }
    Ok(())
}

fn print_hints(
    config: &EngineConfig,
    count: usize,
    chars: Option<&str>,
    numbered: bool,
    json: bool,
) -> Result<()> {
    let labels = if numbered {
        numeric(count)
    } else {
        match chars {
            Some(chars) => HintAlphabet::uniform(chars),
            None => config.hint_alphabet(),
        }
        .assign(count)
    };

    if json {
        println!("{}", serde_json::to_string(&labels)?);
    } else {
        println!("{}", labels.join(" "));
    }
    Ok(())
}

fn show_config(config: &EngineConfig, name: Option<&str>, paths: bool) -> Result<()> {
    if paths {
        let show = |label: &str, path: Option<PathBuf>| match path {
            Some(path) => println!("{:<8} {}", label, path.display()),
            None => println!("{:<8} (no config directory)", label),
        };
        show("config", config_paths::config_file());
        show("keymap", config_paths::keymap_file());
        show("log", config_paths::log_file());
        return Ok(());
    }

    match name {
        Some(name) => println!("{}", config.get_option(name)?),
        None => print!("{}", serde_yaml::to_string(config)?),
    }
    Ok(())
}
