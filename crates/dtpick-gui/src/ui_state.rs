//! UI-specific state (ephemeral)

use std::collections::VecDeque;

use dtpick_core::ThemePreference;

const MAX_LOG_ENTRIES: usize = 200;

/// UI-specific state that doesn't need to be persisted
pub struct UiState {
    pub theme: Theme,

    /// Text of the date field; applied to the picker on Enter or focus loss.
    pub date_input: String,
    pub date_error: Option<String>,

    /// Simulated bound host fields.
    pub host_date_input: String,
    pub host_duration_input: String,
    pub host_error: Option<String>,

    /// Configuration form buffers.
    pub interval_input: String,
    pub config_dirty: bool,

    pub notification_log_expanded: bool,

    /// Notification log entries (max 200)
    pub notification_log: VecDeque<LogEntry>,
}

impl UiState {
    pub fn new(theme: ThemePreference, show_notification_log: bool) -> Self {
        Self {
            theme: Theme::from(theme),
            date_input: String::new(),
            date_error: None,
            host_date_input: String::new(),
            host_duration_input: String::new(),
            host_error: None,
            interval_input: String::new(),
            config_dirty: false,
            notification_log_expanded: show_notification_log,
            notification_log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
        }
    }

    /// Add a log entry, maintaining max 200 entries
    pub fn add_log_entry(&mut self, entry: LogEntry) {
        if self.notification_log.len() >= MAX_LOG_ENTRIES {
            self.notification_log.pop_front();
        }
        self.notification_log.push_back(entry);
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(ThemePreference::default(), true)
    }
}

/// Theme selection
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl From<ThemePreference> for Theme {
    fn from(value: ThemePreference) -> Self {
        match value {
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::Light => Theme::Light,
        }
    }
}

impl From<Theme> for ThemePreference {
    fn from(value: Theme) -> Self {
        match value {
            Theme::Dark => ThemePreference::Dark,
            Theme::Light => ThemePreference::Light,
        }
    }
}

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

/// Log level for coloring
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Notify,
    Warning,
    Error,
}
