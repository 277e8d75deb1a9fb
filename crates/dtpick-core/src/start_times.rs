//! Start-of-day slot generation.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// Spacing between selectable start times.
pub const SLOT_STEP_MINUTES: u32 = 5;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Decides the earliest selectable time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorPolicy {
    /// Floor follows the wall clock, seconds truncated.
    CurrentTime,
    /// Floor is a fixed time of day.
    Fixed(NaiveTime),
}

impl FloorPolicy {
    /// 08:00, the floor used when the picker does not default to the current time.
    pub fn business_hours() -> Self {
        FloorPolicy::Fixed(NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN))
    }

    pub fn from_default_to_current_time(default_to_current_time: bool) -> Self {
        if default_to_current_time {
            FloorPolicy::CurrentTime
        } else {
            Self::business_hours()
        }
    }

    /// Resolve the floor time of day for the instant `now`.
    ///
    /// Only the time of day of `now` is consulted: the floor applies the same way
    /// whichever calendar date is selected.
    pub fn floor(&self, now: NaiveDateTime) -> NaiveTime {
        match self {
            FloorPolicy::CurrentTime => truncate_seconds(now.time()),
            FloorPolicy::Fixed(time) => *time,
        }
    }
}

/// Produces the ordered start-time candidates for a day.
#[derive(Debug, Clone, Copy)]
pub struct StartTimeGenerator {
    policy: FloorPolicy,
}

impl StartTimeGenerator {
    pub fn new(policy: FloorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FloorPolicy {
        self.policy
    }

    /// Every 5-minute slot from 00:00 to 23:55 that is not earlier than the floor.
    pub fn generate(&self, now: NaiveDateTime) -> Vec<NaiveTime> {
        let floor = self.policy.floor(now);
        (0..MINUTES_PER_DAY)
            .step_by(SLOT_STEP_MINUTES as usize)
            .filter_map(|mins| NaiveTime::from_hms_opt(mins / 60, mins % 60, 0))
            .filter(|slot| *slot >= floor)
            .collect()
    }
}

/// Position of the slot matching `previous` by hour and minute.
pub fn find_slot(slots: &[NaiveTime], previous: NaiveTime) -> Option<usize> {
    slots
        .iter()
        .position(|slot| slot.hour() == previous.hour() && slot.minute() == previous.minute())
}

pub(crate) fn truncate_seconds(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_fixed_floor_starts_at_eight() {
        let slots = StartTimeGenerator::new(FloorPolicy::business_hours()).generate(at(3, 0, 0));
        assert_eq!(slots.first().copied(), Some(t(8, 0)));
        assert_eq!(slots.last().copied(), Some(t(23, 55)));
        // 08:00..=23:55 in 5 minute steps
        assert_eq!(slots.len(), 16 * 12);
    }

    #[test]
    fn test_fixed_floor_ignores_clock() {
        let generator = StartTimeGenerator::new(FloorPolicy::business_hours());
        assert_eq!(generator.generate(at(1, 0, 0)), generator.generate(at(22, 0, 0)));
    }

    #[test]
    fn test_midnight_floor_yields_full_day() {
        let slots = StartTimeGenerator::new(FloorPolicy::Fixed(NaiveTime::MIN)).generate(at(12, 0, 0));
        assert_eq!(slots.len(), 288);
        assert!(slots.iter().all(|slot| slot.minute() % 5 == 0 && slot.second() == 0));
    }

    #[test]
    fn test_current_time_floor_rounds_up_to_next_slot() {
        let slots = StartTimeGenerator::new(FloorPolicy::CurrentTime).generate(at(10, 3, 42));
        assert_eq!(slots.first().copied(), Some(t(10, 5)));
    }

    #[test]
    fn test_current_time_floor_truncates_seconds() {
        let slots = StartTimeGenerator::new(FloorPolicy::CurrentTime).generate(at(10, 5, 59));
        assert_eq!(slots.first().copied(), Some(t(10, 5)));
    }

    #[test]
    fn test_late_clock_yields_no_slots() {
        let slots = StartTimeGenerator::new(FloorPolicy::CurrentTime).generate(at(23, 57, 0));
        assert!(slots.is_empty());
    }

    #[test]
    fn test_find_slot_matches_hour_and_minute() {
        let slots = vec![t(9, 0), t(9, 5), t(9, 10)];
        assert_eq!(find_slot(&slots, NaiveTime::from_hms_opt(9, 5, 30).unwrap()), Some(1));
        assert_eq!(find_slot(&slots, t(9, 7)), None);
    }
}
