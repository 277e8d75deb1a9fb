//! Application state for the picker demo host

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dtpick_core::{
    ConfigError, ConfigSource, FileConfig, NotifyCallback, Picker, PickerConfig, PickerOutputs,
    SystemClock, load_config, save_config,
};
use tracing::info;

/// Domain state: the persisted configuration and the hosted picker.
pub struct AppState {
    pub config: FileConfig,
    pub config_source: ConfigSource,
    /// Warnings from loading `config.toml`, drained into the log on the first frame.
    pub load_warnings: Vec<String>,
    pub picker: Picker<SystemClock>,
    notifications: Arc<AtomicUsize>,
    seen_notifications: usize,
}

impl AppState {
    pub fn new() -> Self {
        let load = load_config();
        Self::from_config(load.config, load.source, load.warnings)
    }

    pub fn from_config(
        config: FileConfig,
        config_source: ConfigSource,
        load_warnings: Vec<String>,
    ) -> Self {
        let mut state = Self {
            config,
            config_source,
            load_warnings,
            picker: Picker::default(),
            notifications: Arc::new(AtomicUsize::new(0)),
            seen_notifications: 0,
        };
        state.initialize_picker();
        state
    }

    /// Tear the picker down and initialize it again from the current configuration.
    pub fn initialize_picker(&mut self) {
        self.start_picker(self.config.picker.clone());
    }

    /// Like [`Self::initialize_picker`], but the current start seeds the new picker.
    pub fn reinitialize_keeping_start(&mut self) {
        let mut config = self.config.picker.clone();
        if let Some(start) = self.picker.outputs().event_start {
            config.initial_event_date = Some(start);
        }
        self.start_picker(config);
    }

    fn start_picker(&mut self, config: PickerConfig) {
        self.picker.teardown();
        let counter = self.notifications.clone();
        let notify: NotifyCallback = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        self.picker.initialize(config, notify);
    }

    /// Notifications received since the previous call.
    pub fn take_notifications(&mut self) -> usize {
        let total = self.notifications.load(Ordering::SeqCst);
        let fresh = total.saturating_sub(self.seen_notifications);
        self.seen_notifications = total;
        fresh
    }

    pub fn total_notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }

    pub fn outputs(&self) -> PickerOutputs {
        self.picker.outputs()
    }

    pub fn save_config(&mut self) -> Result<(), ConfigError> {
        save_config(&self.config)?;
        self.config_source = ConfigSource::File;
        info!("Configuration saved");
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn state() -> AppState {
        let mut config = FileConfig::default();
        config.picker.interval_spec = Some("15,30".to_string());
        config.picker.default_to_current_time = false;
        AppState::from_config(config, ConfigSource::Default, Vec::new())
    }

    #[test]
    fn test_take_notifications_reports_only_new_ones() {
        let mut state = state();
        assert_eq!(state.take_notifications(), 0);

        let end = state.picker.state().unwrap().end_options()[1];
        assert!(state.picker.change_end_time(end));
        assert_eq!(state.take_notifications(), 1);
        assert_eq!(state.take_notifications(), 0);
        assert_eq!(state.total_notifications(), 1);
    }

    #[test]
    fn test_reinitialize_applies_new_config_and_keeps_start() {
        let mut state = state();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        state.picker.change_start_time(nine);

        state.config.picker.interval_spec = Some("45".to_string());
        state.reinitialize_keeping_start();

        assert_eq!(state.picker.catalog().unwrap().minutes(), &[45]);
        assert_eq!(state.outputs().duration_minutes, Some(45));
        assert_eq!(state.outputs().event_start.map(|start| start.time()), Some(nine));

        state.initialize_picker();
        assert_eq!(state.config.picker.initial_event_date, None);
        assert_ne!(state.outputs().event_start.map(|start| start.time()), Some(nine));
    }
}
