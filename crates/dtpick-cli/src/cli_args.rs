use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use dtpick_core::{
    PickerOverrides, TimeFormat, parse_date, parse_duration_minutes, parse_time_of_day,
    parse_timestamp,
};

/// Top-level CLI entrypoint.
#[derive(Parser, Debug, Clone)]
#[command(name = "dtpick", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub picker: PickerArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Supported subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Configuration file management.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Print the path of config.toml.
    Path,
    /// Print the effective configuration as TOML.
    Show,
    /// Write the default configuration to config.toml.
    Init {
        /// Overwrite an existing file.
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

/// Arguments for the scripted picker run (default command).
#[derive(Debug, Clone, Args, Default)]
pub struct PickerArgs {
    /// Read configuration from PATH instead of the user config directory.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Comma separated durations in minutes, e.g. "15,30,60".
    #[arg(long = "intervals", value_name = "MINUTES")]
    pub intervals: Option<String>,

    /// Time display flag: "0" for 24-hour labels, anything else for 12-hour.
    #[arg(long = "time-format", value_name = "FLAG")]
    pub time_format: Option<String>,

    /// Floor start times at the current time (true) or at 08:00 (false).
    #[arg(
        long = "default-now",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub default_now: Option<bool>,

    /// Initial event start, "YYYY-MM-DDTHH:MM".
    #[arg(long = "event-date", value_name = "TIMESTAMP")]
    pub event_date: Option<String>,

    /// Pin the wall clock, "YYYY-MM-DDTHH:MM".
    #[arg(long = "now", value_name = "TIMESTAMP")]
    pub now: Option<String>,

    /// Event to apply, in order. One of date=YYYY-MM-DD, start=HH:MM,
    /// end=HH:MM|TIMESTAMP, host-date=TIMESTAMP, host-duration=MINUTES, refresh.
    #[arg(short = 'e', long = "event", value_name = "EVENT")]
    pub events: Vec<String>,

    /// Print the final report as JSON.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// List every start time instead of the slots around the selection.
    #[arg(long = "all", action = ArgAction::SetTrue)]
    pub all: bool,
}

impl PickerArgs {
    /// Returns true when no picker flags were provided. `--config` is not counted.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_none()
            && self.time_format.is_none()
            && self.default_now.is_none()
            && self.event_date.is_none()
            && self.now.is_none()
            && self.events.is_empty()
            && !self.json
            && !self.all
    }

    /// Convert CLI flags into picker overrides.
    pub fn to_overrides(&self) -> Result<PickerOverrides, String> {
        let mut overrides = PickerOverrides::default();

        if let Some(spec) = self.intervals.as_ref() {
            overrides.interval_spec = Some(spec.trim().to_string());
        }
        if let Some(flag) = self.time_format.as_ref() {
            overrides.time_format = Some(TimeFormat::from_flag(flag));
        }
        if let Some(default_now) = self.default_now {
            overrides.default_to_current_time = Some(default_now);
        }
        if let Some(raw) = self.event_date.as_ref() {
            let start = parse_timestamp(raw).map_err(|err| format!("--event-date: {err}"))?;
            overrides.initial_event_date = Some(start);
        }

        Ok(overrides)
    }

    /// The pinned clock instant, if `--now` was given.
    pub fn fixed_now(&self) -> Result<Option<NaiveDateTime>, String> {
        self.now
            .as_deref()
            .map(|raw| parse_timestamp(raw).map_err(|err| format!("--now: {err}")))
            .transpose()
    }

    pub fn script(&self) -> Result<Vec<ScriptEvent>, String> {
        self.events.iter().map(|raw| ScriptEvent::parse(raw)).collect()
    }
}

/// Target of an `end=` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndTarget {
    /// Pick the first end candidate showing this time of day.
    Slot(NaiveTime),
    At(NaiveDateTime),
}

/// One step of a scripted picker session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptEvent {
    Date(NaiveDate),
    Start(NaiveTime),
    End(EndTarget),
    HostDate(NaiveDateTime),
    HostDuration(i64),
    Refresh,
}

impl ScriptEvent {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("refresh") {
            return Ok(ScriptEvent::Refresh);
        }

        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("Event '{raw}' must look like key=value or 'refresh'."))?;
        let value = value.trim();
        let event = match key.trim().to_ascii_lowercase().as_str() {
            "date" => parse_date(value).map(ScriptEvent::Date),
            "start" => parse_time_of_day(value).map(ScriptEvent::Start),
            "end" => parse_timestamp(value)
                .map(|end| ScriptEvent::End(EndTarget::At(end)))
                .or_else(|_| {
                    parse_time_of_day(value).map(|time| ScriptEvent::End(EndTarget::Slot(time)))
                }),
            "host-date" => parse_timestamp(value).map(ScriptEvent::HostDate),
            "host-duration" => parse_duration_minutes(value).map(ScriptEvent::HostDuration),
            other => {
                return Err(format!(
                    "Unknown event '{other}'. Expected date, start, end, host-date, host-duration or refresh."
                ));
            }
        };
        event.map_err(|err| format!("Event '{raw}': {err}"))
    }
}
