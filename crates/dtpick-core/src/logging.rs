//! Structured logging for the picker hosts.
//!
//! The CLI host logs to a JSON file and stderr, the GUI host to the file only.
//! Verbosity comes from `DTPICK_LOG`, then `RUST_LOG`, then `info`.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::{LocalTime, UtcTime};
use tracing_subscriber::layer::{Layer, Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::config_directory;

const LOG_FILE_NAME: &str = "dtpick.log";
const PICKER_LOG_VAR: &str = "DTPICK_LOG";
const FALLBACK_DIRECTIVE: &str = "info";

type FilteredRegistry = Layered<EnvFilter, Registry>;
type SinkLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Where a host wants its log records to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingDestination {
    /// JSON file plus human-readable stderr (CLI host).
    FileAndStderr,
    /// JSON file only, stderr stays quiet (GUI host).
    FileOnly,
    /// stderr only (tests and ad-hoc tools).
    StderrOnly,
}

impl LoggingDestination {
    fn writes_file(self) -> bool {
        matches!(self, Self::FileAndStderr | Self::FileOnly)
    }

    fn writes_stderr(self) -> bool {
        matches!(self, Self::FileAndStderr | Self::StderrOnly)
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] io::Error),
    #[error("invalid logging filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install logging subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the non-blocking file writer flushing for the life of the process.
#[derive(Debug)]
struct InstalledLogging {
    _file_writer: Option<WorkerGuard>,
    log_path: Option<PathBuf>,
}

static INSTALLED: OnceLock<InstalledLogging> = OnceLock::new();

/// Install the process-wide subscriber. Only the first call installs anything;
/// every call returns the log file path in use, if there is one.
pub fn init_logging(
    destination: LoggingDestination,
) -> Result<Option<&'static PathBuf>, LoggingError> {
    if INSTALLED.get().is_none() {
        let installed = install(destination)?;
        // A racing caller may have won; its subscriber stays.
        let _ = INSTALLED.set(installed);
    }
    Ok(current_log_path())
}

pub fn current_log_path() -> Option<&'static PathBuf> {
    INSTALLED.get().and_then(|installed| installed.log_path.as_ref())
}

fn install(destination: LoggingDestination) -> Result<InstalledLogging, LoggingError> {
    let directive = filter_directive(
        env::var(PICKER_LOG_VAR).ok(),
        env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let filter = EnvFilter::try_new(&directive)?;

    let mut installed = InstalledLogging {
        _file_writer: None,
        log_path: None,
    };
    let mut sinks: Vec<SinkLayer> = Vec::new();
    if destination.writes_file() {
        let dir = config_directory().join("logs");
        fs::create_dir_all(&dir)?;
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, LOG_FILE_NAME));
        sinks.push(json_file_layer(writer));
        installed._file_writer = Some(guard);
        installed.log_path = Some(log_file_in(&dir));
    }
    if destination.writes_stderr() {
        sinks.push(stderr_layer());
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(sinks)
        .try_init()?;

    if let Some(path) = installed.log_path.as_ref() {
        info!(path = %path.display(), directive = %directive, "Picker logging enabled");
    }
    Ok(installed)
}

/// Filter directive to use. A blank variable counts as unset.
fn filter_directive(picker_log: Option<String>, rust_log: Option<String>) -> String {
    [picker_log, rust_log]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| FALLBACK_DIRECTIVE.to_string())
}

fn log_file_in(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE_NAME)
}

fn json_file_layer(writer: NonBlocking) -> SinkLayer {
    tracing_subscriber::fmt::layer()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_file(true)
        .with_line_number(true)
        .with_writer(writer)
        .with_ansi(false)
        .boxed()
}

fn stderr_layer() -> SinkLayer {
    tracing_subscriber::fmt::layer()
        .with_timer(LocalTime::rfc_3339())
        .with_writer(io::stderr)
        .with_ansi(false)
        .boxed()
}
