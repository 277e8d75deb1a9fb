//! Host-facing lifecycle of the picker.
//!
//! The host calls [`Picker::initialize`] once with its configuration and a change
//! callback, forwards bound-value updates through [`Picker::on_host_values_updated`]
//! and reads [`Picker::outputs`] whenever it needs the current selection. User
//! edits of the three inputs arrive through the `change_*` methods.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use crate::catalog::DurationCatalog;
use crate::clock::{Clock, SystemClock};
use crate::config::PickerConfig;
use crate::format::{format_date, format_time};
use crate::selection::{PickerOutputs, Reconciler, SelectionEvent, SelectionState};

/// Invoked once after every transition that changed an output value.
pub type NotifyCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Bound host fields the picker listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostField {
    EventDate,
    Duration,
}

impl HostField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "eventdate" => Some(HostField::EventDate),
            "duration" => Some(HostField::Duration),
            _ => None,
        }
    }
}

/// Current values of the bound host fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostValues {
    pub event_date: Option<NaiveDateTime>,
    pub duration: Option<i64>,
}

struct Ready {
    config: PickerConfig,
    catalog: DurationCatalog,
    state: SelectionState,
    notify: NotifyCallback,
}

/// The embeddable date / start / end picker.
pub struct Picker<C: Clock = SystemClock> {
    clock: C,
    ready: Option<Ready>,
}

impl Default for Picker<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> fmt::Debug for Picker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picker")
            .field("ready", &self.is_ready())
            .field("state", &self.state())
            .finish()
    }
}

impl<C: Clock> Picker<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, ready: None }
    }

    /// Build the initial selection from `config`. Calling it again starts over.
    pub fn initialize(&mut self, config: PickerConfig, notify: NotifyCallback) {
        let catalog = config.duration_catalog();
        let now = self.clock.now();
        let ctx = Reconciler::new(&catalog, config.floor_policy(), now);
        let state = SelectionState::initial(config.initial_event_date, &ctx);

        info!(
            durations = ?catalog.minutes(),
            time_format = config.time_format.as_flag(),
            default_to_current_time = config.default_to_current_time,
            outputs = ?state.outputs(),
            "Picker initialized"
        );

        self.ready = Some(Ready {
            config,
            catalog,
            state,
            notify,
        });
    }

    /// Apply changed bound fields. Only fields named in `changed_fields` that carry
    /// a value are considered.
    pub fn on_host_values_updated(&mut self, changed_fields: &[&str], values: HostValues) -> bool {
        let mut event_start = None;
        let mut duration = None;
        for name in changed_fields {
            match HostField::from_name(name) {
                Some(HostField::EventDate) => event_start = values.event_date,
                Some(HostField::Duration) => duration = values.duration,
                None => debug!(field = %name, "Ignoring unbound host field"),
            }
        }

        if event_start.is_none() && duration.is_none() {
            return false;
        }
        self.dispatch(SelectionEvent::HostValueChanged {
            event_start,
            duration,
        })
    }

    pub fn change_date(&mut self, date: NaiveDate) -> bool {
        self.dispatch(SelectionEvent::DateChanged(date))
    }

    pub fn change_start_time(&mut self, time: NaiveTime) -> bool {
        self.dispatch(SelectionEvent::StartTimeChanged(time))
    }

    pub fn change_end_time(&mut self, end: NaiveDateTime) -> bool {
        self.dispatch(SelectionEvent::EndTimeChanged(end))
    }

    /// Rebuild both candidate lists against the current clock.
    pub fn refresh(&mut self) -> bool {
        self.dispatch(SelectionEvent::Regenerate)
    }

    /// Run one transition and notify the host if any output moved.
    /// Returns whether the host was notified.
    fn dispatch(&mut self, event: SelectionEvent) -> bool {
        let now = self.clock.now();
        let Some(ready) = self.ready.as_mut() else {
            debug!(event = ?event, "Picker not initialized; ignoring event");
            return false;
        };

        let ctx = Reconciler::new(&ready.catalog, ready.config.floor_policy(), now);
        let transition = ready.state.apply(event, &ctx);
        ready.state = transition.state;

        if transition.outputs_changed {
            (ready.notify)();
        }
        transition.outputs_changed
    }

    /// Current outputs. All fields are undefined before initialization.
    pub fn outputs(&self) -> PickerOutputs {
        self.state()
            .map(SelectionState::outputs)
            .unwrap_or_default()
    }

    /// Release the selection and callback; the picker returns to uninitialized.
    pub fn teardown(&mut self) {
        if self.ready.take().is_some() {
            debug!("Picker torn down");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.is_some()
    }

    pub fn state(&self) -> Option<&SelectionState> {
        self.ready.as_ref().map(|ready| &ready.state)
    }

    pub fn config(&self) -> Option<&PickerConfig> {
        self.ready.as_ref().map(|ready| &ready.config)
    }

    pub fn catalog(&self) -> Option<&DurationCatalog> {
        self.ready.as_ref().map(|ready| &ready.catalog)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn selected_start_index(&self) -> Option<usize> {
        self.state()?.selected_start_index()
    }

    pub fn selected_end_index(&self) -> Option<usize> {
        self.state()?.selected_end_index()
    }

    /// `YYYY-MM-DD` text of the date field.
    pub fn date_field(&self) -> Option<String> {
        self.state().map(|state| format_date(state.date()))
    }

    pub fn start_time_labels(&self) -> Vec<String> {
        let Some(ready) = self.ready.as_ref() else {
            return Vec::new();
        };
        ready
            .state
            .start_options()
            .iter()
            .map(|slot| format_time(*slot, ready.config.time_format))
            .collect()
    }

    pub fn end_time_labels(&self) -> Vec<String> {
        let Some(ready) = self.ready.as_ref() else {
            return Vec::new();
        };
        ready
            .state
            .end_options()
            .iter()
            .map(|end| format_time(end.time(), ready.config.time_format))
            .collect()
    }
}
