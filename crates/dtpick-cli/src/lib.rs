//! Command-line host for the picker.
//!
//! Loads `config.toml`, layers flag overrides on top, replays the `--event`
//! script against a picker and prints what a host would observe afterwards.

pub mod cli_args;
pub mod host;

use std::path::Path;

use clap::Parser;
use dtpick_core::{
    Clock, ConfigLoadResult, DurationCatalog, FileConfig, FixedClock, LoggingDestination,
    PickerConfig, SystemClock, apply_overrides, config_path, init_logging, load_config,
    load_config_from, save_config_to,
};

use cli_args::{Cli, Command, ConfigCommand, PickerArgs, ScriptEvent};
use host::{Report, ScriptedHost, render_text};

/// True when the process was started with any arguments.
pub fn should_run_cli_mode() -> bool {
    std::env::args_os().nth(1).is_some()
}

pub fn run() -> Result<(), String> {
    dispatch(Cli::parse())
}

pub fn dispatch(cli: Cli) -> Result<(), String> {
    match cli.command {
        Some(Command::Config(cmd)) => {
            if !cli.picker.is_empty() {
                return Err(
                    "Picker flags cannot be combined with config management commands.".into(),
                );
            }
            handle_config_command(cmd, cli.picker.config.as_deref())
        }
        None => run_session(&cli.picker),
    }
}

fn run_session(args: &PickerArgs) -> Result<(), String> {
    if let Err(err) = init_logging(LoggingDestination::FileAndStderr) {
        eprintln!("Warning: structured logging unavailable: {err}");
    }

    let load = load_from(args.config.as_deref());
    let (config, warnings) = effective_config(load, args)?;
    let script = args.script()?;

    for warning in warnings {
        eprintln!("Warning: {warning}");
    }

    let report = match args.fixed_now()? {
        Some(now) => run_script(FixedClock(now), config, &script),
        None => run_script(SystemClock, config, &script),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
        println!("{json}");
    } else {
        print!("{}", render_text(&report, args.all));
    }
    Ok(())
}

/// Merge loaded configuration with flag overrides, collecting advisory warnings.
pub fn effective_config(
    load: ConfigLoadResult,
    args: &PickerArgs,
) -> Result<(PickerConfig, Vec<String>), String> {
    let mut warnings = load.warnings;
    let mut config = load.config.picker;

    let overrides = args.to_overrides()?;
    if let Some(spec) = overrides.interval_spec.as_deref() {
        let (catalog, rejected) = DurationCatalog::parse_with_rejects(Some(spec));
        if !rejected.is_empty() {
            warnings.push(format!(
                "--intervals: ignoring unusable tokens {}",
                rejected.join(", ")
            ));
        }
        if catalog.is_empty() {
            warnings.push("--intervals yields no durations; end times will be unavailable.".into());
        }
    }
    apply_overrides(&mut config, &overrides);

    Ok((config, warnings))
}

/// Initialize a picker on `clock` and replay `script` against it.
pub fn run_script<C: Clock>(clock: C, config: PickerConfig, script: &[ScriptEvent]) -> Report {
    let mut host = ScriptedHost::start(clock, config);
    host.run_script(script);
    host.report()
}

fn load_from(path: Option<&Path>) -> ConfigLoadResult {
    match path {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}

fn handle_config_command(command: ConfigCommand, path: Option<&Path>) -> Result<(), String> {
    let target = path.map(Path::to_path_buf).unwrap_or_else(config_path);

    match command {
        ConfigCommand::Path => {
            println!("{}", target.display());
            Ok(())
        }
        ConfigCommand::Show => {
            let load = load_config_from(&target);
            for warning in load.warnings {
                eprintln!("Warning: {warning}");
            }
            let raw = toml::to_string_pretty(&load.config).map_err(|err| err.to_string())?;
            print!("{raw}");
            Ok(())
        }
        ConfigCommand::Init { force } => {
            if target.exists() && !force {
                return Err(format!(
                    "{} already exists; pass --force to overwrite it.",
                    target.display()
                ));
            }
            save_config_to(&target, &FileConfig::default()).map_err(|err| err.to_string())?;
            println!("Wrote default configuration to {}", target.display());
            Ok(())
        }
    }
}
