//! End-time candidates derived from a start and the duration catalog.

use chrono::{NaiveDateTime, TimeDelta};

use crate::catalog::DurationCatalog;

/// `start` moved forward by `minutes`, or `None` when the result falls outside the
/// representable calendar.
pub fn end_after(start: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    TimeDelta::try_minutes(minutes).and_then(|delta| start.checked_add_signed(delta))
}

/// Produces one end timestamp per catalog entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndTimeGenerator;

impl EndTimeGenerator {
    /// `start + d` for each catalog duration `d`, in catalog order.
    ///
    /// An undefined start yields no candidates. Durations that would end past the
    /// last representable timestamp are skipped.
    pub fn generate(
        &self,
        start: Option<NaiveDateTime>,
        catalog: &DurationCatalog,
    ) -> Vec<NaiveDateTime> {
        let Some(start) = start else {
            return Vec::new();
        };
        catalog
            .iter()
            .filter_map(|minutes| end_after(start, minutes))
            .collect()
    }

    /// Index to select after regeneration: the previous duration's catalog position,
    /// or the first entry. `None` when there is nothing to select.
    pub fn default_selection(
        &self,
        catalog: &DurationCatalog,
        previous: Option<i64>,
    ) -> Option<usize> {
        if catalog.is_empty() {
            return None;
        }
        Some(previous.and_then(|m| catalog.index_of(m)).unwrap_or(0))
    }

    /// Catalog duration that turns `start` into exactly `end`.
    pub fn match_duration(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        catalog: &DurationCatalog,
    ) -> Option<i64> {
        catalog
            .iter()
            .find(|&minutes| end_after(start, minutes) == Some(end))
    }
}
