//! A scripted host that drives the picker from command-line events.

use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDateTime;
use dtpick_core::{Clock, HostValues, NotifyCallback, Picker, PickerConfig, PickerOutputs};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli_args::{EndTarget, ScriptEvent};

/// Start-time rows printed on each side of the selection in the compact listing.
const START_WINDOW: usize = 3;

/// Snapshot of everything the host can observe after a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub date: Option<String>,
    #[serde(flatten)]
    pub outputs: PickerOutputs,
    pub start_times: Vec<String>,
    pub selected_start: Option<usize>,
    pub end_times: Vec<String>,
    pub selected_end: Option<usize>,
    pub notifications: usize,
}

pub struct ScriptedHost<C: Clock> {
    picker: Picker<C>,
    notifications: Arc<AtomicUsize>,
}

impl<C: Clock> ScriptedHost<C> {
    /// Initialize a picker on `clock` with `config`, counting change notifications.
    pub fn start(clock: C, config: PickerConfig) -> Self {
        let notifications = Arc::new(AtomicUsize::new(0));
        let counter = notifications.clone();
        let notify: NotifyCallback = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut picker = Picker::new(clock);
        picker.initialize(config, notify);
        Self {
            picker,
            notifications,
        }
    }

    /// Apply one event. Returns whether the picker notified.
    pub fn apply(&mut self, event: &ScriptEvent) -> bool {
        let notified = match *event {
            ScriptEvent::Date(date) => self.picker.change_date(date),
            ScriptEvent::Start(time) => self.picker.change_start_time(time),
            ScriptEvent::End(target) => match self.resolve_end(target) {
                Some(end) => self.picker.change_end_time(end),
                None => {
                    warn!(end = ?target, "No end time candidate matches; event skipped");
                    false
                }
            },
            ScriptEvent::HostDate(start) => self.picker.on_host_values_updated(
                &["eventdate"],
                HostValues {
                    event_date: Some(start),
                    duration: None,
                },
            ),
            ScriptEvent::HostDuration(minutes) => self.picker.on_host_values_updated(
                &["duration"],
                HostValues {
                    event_date: None,
                    duration: Some(minutes),
                },
            ),
            ScriptEvent::Refresh => self.picker.refresh(),
        };
        info!(event = ?event, notified, "Applied scripted event");
        notified
    }

    pub fn run_script(&mut self, events: &[ScriptEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    fn resolve_end(&self, target: EndTarget) -> Option<NaiveDateTime> {
        match target {
            EndTarget::At(end) => Some(end),
            EndTarget::Slot(time) => self
                .picker
                .state()?
                .end_options()
                .iter()
                .find(|candidate| candidate.time() == time)
                .copied(),
        }
    }

    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::SeqCst)
    }

    pub fn picker(&self) -> &Picker<C> {
        &self.picker
    }

    pub fn report(&self) -> Report {
        Report {
            date: self.picker.date_field(),
            outputs: self.picker.outputs(),
            start_times: self.picker.start_time_labels(),
            selected_start: self.picker.selected_start_index(),
            end_times: self.picker.end_time_labels(),
            selected_end: self.picker.selected_end_index(),
            notifications: self.notifications(),
        }
    }
}

/// Human readable rendering of a [`Report`].
pub fn render_text(report: &Report, all_start_times: bool) -> String {
    let mut out = String::new();
    let blank = || "-".to_string();

    let _ = writeln!(out, "Date:        {}", report.date.clone().unwrap_or_else(blank));
    let _ = writeln!(
        out,
        "Start:       {}",
        report
            .outputs
            .event_start
            .map(|start| start.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(blank)
    );
    let _ = writeln!(
        out,
        "End:         {}",
        report
            .outputs
            .event_end
            .map(|end| end.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(blank)
    );
    let _ = writeln!(
        out,
        "Duration:    {}",
        report
            .outputs
            .duration_minutes
            .map(|minutes| format!("{minutes} min"))
            .unwrap_or_else(blank)
    );
    let _ = writeln!(out, "Notified:    {}", report.notifications);

    let _ = writeln!(out, "Start times ({}):", report.start_times.len());
    let (from, to) = if all_start_times {
        (0, report.start_times.len())
    } else {
        let center = report.selected_start.unwrap_or(0);
        (
            center.saturating_sub(START_WINDOW),
            (center + START_WINDOW + 1).min(report.start_times.len()),
        )
    };
    if from > 0 {
        let _ = writeln!(out, "    ...");
    }
    for index in from..to {
        write_option(&mut out, &report.start_times[index], report.selected_start == Some(index));
    }
    if to < report.start_times.len() {
        let _ = writeln!(out, "    ...");
    }

    let _ = writeln!(out, "End times ({}):", report.end_times.len());
    for (index, label) in report.end_times.iter().enumerate() {
        write_option(&mut out, label, report.selected_end == Some(index));
    }

    out
}

fn write_option(out: &mut String, label: &str, selected: bool) {
    let marker = if selected { '>' } else { ' ' };
    let _ = writeln!(out, "  {marker} {label}");
}
