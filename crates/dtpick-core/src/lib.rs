//! Core library for the date / start time / duration picker.
//!
//! The picker keeps a calendar date, a start timestamp, an end timestamp and a
//! duration mutually consistent while either the user or the embedding host
//! changes one of them. End times are never entered freely: they are always one
//! of the candidates produced by adding a configured duration to the start.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod control;
pub mod end_times;
pub mod error;
pub mod format;
pub mod logging;
pub mod selection;
pub mod start_times;

pub use catalog::{DEFAULT_INTERVAL_MINUTES, DurationCatalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    ConfigLoadResult, ConfigSource, FileConfig, PickerConfig, PickerOverrides, ThemePreference,
    UiPreferences, apply_overrides, config_directory, config_path, load_config, load_config_from,
    save_config, save_config_to,
};
pub use control::{HostField, HostValues, NotifyCallback, Picker};
pub use end_times::{EndTimeGenerator, end_after};
pub use error::{ConfigError, PickerError};
pub use format::{
    TimeFormat, format_date, format_time, parse_date, parse_duration_minutes, parse_time_of_day,
    parse_timestamp,
};
pub use logging::{LoggingDestination, LoggingError, current_log_path, init_logging};
pub use selection::{PickerOutputs, Reconciler, SelectionEvent, SelectionState, Transition};
pub use start_times::{FloorPolicy, SLOT_STEP_MINUTES, StartTimeGenerator, find_slot};
