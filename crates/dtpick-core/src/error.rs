use std::io;

use thiserror::Error;

/// Failures while interpreting host-supplied strings.
///
/// The picker itself never surfaces these; they only occur at the edges where
/// text from a command line, a config file or a GUI field is turned into values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickerError {
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid time of day '{0}' (expected HH:MM)")]
    InvalidTimeOfDay(String),
    #[error("invalid timestamp '{0}' (expected YYYY-MM-DDTHH:MM)")]
    InvalidTimestamp(String),
    #[error("invalid duration '{0}' (expected a positive number of minutes)")]
    InvalidDuration(String),
}

/// Errors that can occur when persisting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML serialization error: {0}")]
    Ser(#[from] toml::ser::Error),
}
