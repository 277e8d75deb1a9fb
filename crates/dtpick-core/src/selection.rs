//! Selection record and the reconciliation rules that keep it consistent.
//!
//! A [`SelectionState`] is never edited in place by callers. Each change is
//! described as a [`SelectionEvent`] and applied through [`SelectionState::apply`],
//! which returns the next state together with whether any output value moved.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::DurationCatalog;
use crate::end_times::{EndTimeGenerator, end_after};
use crate::start_times::{FloorPolicy, StartTimeGenerator, find_slot, truncate_seconds};

/// The three values reported back to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerOutputs {
    pub event_start: Option<NaiveDateTime>,
    pub event_end: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>,
}

/// External changes the selection reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The calendar date field changed.
    DateChanged(NaiveDate),
    /// A start-time slot was picked.
    StartTimeChanged(NaiveTime),
    /// An end-time candidate was picked.
    EndTimeChanged(NaiveDateTime),
    /// Bound host values changed. Either side may be absent.
    HostValueChanged {
        event_start: Option<NaiveDateTime>,
        duration: Option<i64>,
    },
    /// Rebuild both candidate lists against the current clock.
    Regenerate,
}

/// Everything a transition needs besides the state itself.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    pub catalog: &'a DurationCatalog,
    pub start_times: StartTimeGenerator,
    pub end_times: EndTimeGenerator,
    pub now: NaiveDateTime,
}

impl<'a> Reconciler<'a> {
    pub fn new(catalog: &'a DurationCatalog, policy: FloorPolicy, now: NaiveDateTime) -> Self {
        Self {
            catalog,
            start_times: StartTimeGenerator::new(policy),
            end_times: EndTimeGenerator,
            now,
        }
    }

    /// Start used when the host supplies none: the top of the current hour, or
    /// the fixed floor on today's date.
    fn default_start(&self) -> NaiveDateTime {
        let time = match self.start_times.policy() {
            FloorPolicy::CurrentTime => {
                NaiveTime::from_hms_opt(self.now.hour(), 0, 0).unwrap_or(NaiveTime::MIN)
            }
            FloorPolicy::Fixed(time) => time,
        };
        self.now.date().and_time(time)
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SelectionState,
    pub outputs_changed: bool,
}

/// Date, start, end and duration plus the candidate lists derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    date: NaiveDate,
    event_start: Option<NaiveDateTime>,
    event_end: Option<NaiveDateTime>,
    duration: Option<i64>,
    start_options: Vec<NaiveTime>,
    end_options: Vec<NaiveDateTime>,
}

impl SelectionState {
    /// Build the first consistent state from an optional host-supplied start.
    pub fn initial(initial_start: Option<NaiveDateTime>, ctx: &Reconciler<'_>) -> Self {
        let start = initial_start.unwrap_or_else(|| ctx.default_start());
        let mut state = Self {
            date: start.date(),
            event_start: Some(start),
            event_end: None,
            duration: None,
            start_options: Vec::new(),
            end_options: Vec::new(),
        };
        state.regenerate_start_times(ctx);
        state.regenerate_end_times(ctx);
        state
    }

    pub fn apply(&self, event: SelectionEvent, ctx: &Reconciler<'_>) -> Transition {
        let mut next = self.clone();
        match event {
            SelectionEvent::DateChanged(date) => next.change_date(date, ctx),
            SelectionEvent::StartTimeChanged(time) => next.change_start_time(time, ctx),
            SelectionEvent::EndTimeChanged(end) => next.change_end_time(end, ctx),
            SelectionEvent::HostValueChanged {
                event_start,
                duration,
            } => next.apply_host_values(event_start, duration, ctx),
            SelectionEvent::Regenerate => {
                next.regenerate_start_times(ctx);
                next.regenerate_end_times(ctx);
            }
        }

        let outputs_changed = next.outputs() != self.outputs();
        debug!(
            event = ?event,
            outputs = ?next.outputs(),
            outputs_changed,
            "Reconciled selection"
        );
        Transition {
            state: next,
            outputs_changed,
        }
    }

    fn change_date(&mut self, date: NaiveDate, ctx: &Reconciler<'_>) {
        self.date = date;
        let time = self
            .event_start
            .map(|start| start.time())
            .unwrap_or_else(|| truncate_seconds(ctx.now.time()));
        self.event_start = Some(date.and_time(time));
        self.regenerate_start_times(ctx);
        self.regenerate_end_times(ctx);
    }

    fn change_start_time(&mut self, time: NaiveTime, ctx: &Reconciler<'_>) {
        self.event_start = Some(self.date.and_time(time));
        self.regenerate_end_times(ctx);
    }

    fn change_end_time(&mut self, end: NaiveDateTime, ctx: &Reconciler<'_>) {
        let end = self.restamp_end(end);
        self.event_end = Some(end);

        let matched = self
            .event_start
            .and_then(|start| ctx.end_times.match_duration(start, end, ctx.catalog));
        match matched {
            Some(minutes) => self.duration = Some(minutes),
            None => warn!(
                end = %end,
                duration = ?self.duration,
                "End time matches no catalog duration; keeping previous duration"
            ),
        }
    }

    fn apply_host_values(
        &mut self,
        event_start: Option<NaiveDateTime>,
        duration: Option<i64>,
        ctx: &Reconciler<'_>,
    ) {
        if let Some(start) = event_start {
            self.event_start = Some(start);
            self.date = start.date();
            self.regenerate_start_times(ctx);
            self.regenerate_end_times(ctx);
        }

        // Host durations are stored as given; the end follows so start + duration holds.
        if let Some(minutes) = duration {
            self.duration = Some(minutes);
            if let Some(start) = self.event_start {
                match end_after(start, minutes) {
                    Some(end) => self.event_end = Some(end),
                    None => warn!(
                        start = %start,
                        duration = minutes,
                        "Host duration ends past the calendar range; keeping previous end"
                    ),
                }
            }
        }
    }

    /// Move `end` onto the selected date. An end that spills past midnight from
    /// the start keeps its day offset; anything dated before the start does not.
    fn restamp_end(&self, end: NaiveDateTime) -> NaiveDateTime {
        let day_offset = self
            .event_start
            .map(|start| (end.date() - start.date()).num_days().max(0))
            .unwrap_or(0);
        let restamped = self.date.and_time(end.time());
        restamped
            .checked_add_days(Days::new(day_offset.unsigned_abs()))
            .unwrap_or(restamped)
    }

    fn regenerate_start_times(&mut self, ctx: &Reconciler<'_>) {
        let slots = ctx.start_times.generate(ctx.now);
        let kept = self
            .event_start
            .and_then(|start| find_slot(&slots, start.time()))
            .is_some();

        if !kept {
            match slots.first() {
                Some(first) => {
                    debug!(
                        previous = ?self.event_start,
                        fallback = %first,
                        "Start time not selectable; falling back to first slot"
                    );
                    self.event_start = Some(self.date.and_time(*first));
                }
                None => warn!("No start-time slots at or after the floor time"),
            }
        }

        self.start_options = slots;
    }

    fn regenerate_end_times(&mut self, ctx: &Reconciler<'_>) {
        self.end_options = ctx.end_times.generate(self.event_start, ctx.catalog);

        if self.event_start.is_none() {
            self.event_end = None;
            return;
        }

        let Some(index) = ctx.end_times.default_selection(ctx.catalog, self.duration) else {
            return;
        };
        let chosen = ctx.catalog.get(index);
        let end = self
            .event_start
            .zip(chosen)
            .and_then(|(start, minutes)| end_after(start, minutes));
        if end.is_none() {
            warn!(
                start = ?self.event_start,
                duration = ?chosen,
                "Selected duration ends past the calendar range; end left undefined"
            );
        }
        self.event_end = end;
        self.duration = end.and(chosen);
    }

    pub fn outputs(&self) -> PickerOutputs {
        PickerOutputs {
            event_start: self.event_start,
            event_end: self.event_end,
            duration_minutes: self.duration,
        }
    }

    /// The calendar date field.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn event_start(&self) -> Option<NaiveDateTime> {
        self.event_start
    }

    pub fn event_end(&self) -> Option<NaiveDateTime> {
        self.event_end
    }

    pub fn duration(&self) -> Option<i64> {
        self.duration
    }

    pub fn start_options(&self) -> &[NaiveTime] {
        &self.start_options
    }

    pub fn end_options(&self) -> &[NaiveDateTime] {
        &self.end_options
    }

    /// Index of the start slot currently in effect.
    pub fn selected_start_index(&self) -> Option<usize> {
        let start = self.event_start?;
        find_slot(&self.start_options, start.time())
    }

    /// Index of the end candidate currently in effect.
    pub fn selected_end_index(&self) -> Option<usize> {
        let end = self.event_end?;
        self.end_options.iter().position(|candidate| *candidate == end)
    }
}
