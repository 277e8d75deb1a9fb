use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use dtpick_core::{
    FixedClock, HostValues, NotifyCallback, Picker, PickerConfig, PickerOutputs, TimeFormat,
};

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn notifications() -> (Arc<AtomicUsize>, NotifyCallback) {
    let count = Arc::new(AtomicUsize::new(0));
    let collector = count.clone();
    let callback: NotifyCallback = Arc::new(move || {
        collector.fetch_add(1, Ordering::SeqCst);
    });
    (count, callback)
}

fn business_hours_config(spec: &str, initial: Option<NaiveDateTime>) -> PickerConfig {
    PickerConfig {
        interval_spec: Some(spec.to_string()),
        time_format: TimeFormat::TwentyFourHour,
        default_to_current_time: false,
        initial_event_date: initial,
    }
}

#[test]
fn test_default_start_is_eight_today_with_first_duration() {
    let now = ts(2024, 6, 1, 6, 40);
    let (_, notify) = notifications();
    let mut picker = Picker::new(FixedClock(now));
    picker.initialize(business_hours_config("15,30,60", None), notify);

    let state = picker.state().expect("picker initialized");
    assert_eq!(state.event_start(), Some(ts(2024, 6, 1, 8, 0)));
    assert_eq!(
        state.end_options(),
        &[
            ts(2024, 6, 1, 8, 15),
            ts(2024, 6, 1, 8, 30),
            ts(2024, 6, 1, 9, 0)
        ]
    );
    assert_eq!(state.duration(), Some(15));
    assert_eq!(picker.end_time_labels(), vec!["08:15", "08:30", "09:00"]);
}

#[test]
fn test_end_change_with_catalog_match_updates_duration() {
    let (count, notify) = notifications();
    let mut picker = Picker::new(FixedClock(ts(2024, 5, 31, 7, 0)));
    picker.initialize(
        business_hours_config("15,30,60", Some(ts(2024, 6, 1, 10, 0))),
        notify,
    );

    picker.change_end_time(ts(2024, 6, 1, 10, 30));

    assert_eq!(
        picker.outputs(),
        PickerOutputs {
            event_start: Some(ts(2024, 6, 1, 10, 0)),
            event_end: Some(ts(2024, 6, 1, 10, 30)),
            duration_minutes: Some(30),
        }
    );
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_end_change_without_catalog_match_keeps_stale_duration() {
    let (_, notify) = notifications();
    let mut picker = Picker::new(FixedClock(ts(2024, 5, 31, 7, 0)));
    picker.initialize(
        business_hours_config("15,30,60", Some(ts(2024, 6, 1, 10, 0))),
        notify,
    );
    picker.change_end_time(ts(2024, 6, 1, 11, 0));
    assert_eq!(picker.outputs().duration_minutes, Some(60));

    picker.change_end_time(ts(2024, 6, 1, 10, 25));

    let outputs = picker.outputs();
    assert_eq!(outputs.event_end, Some(ts(2024, 6, 1, 10, 25)));
    assert_eq!(outputs.duration_minutes, Some(60));
}

#[test]
fn test_end_candidates_track_catalog_for_any_start() {
    let (_, notify) = notifications();
    let mut picker = Picker::new(FixedClock(ts(2024, 1, 1, 0, 0)));
    picker.initialize(business_hours_config("90,5,45,240", None), notify);

    for (h, m) in [(8, 0), (12, 35), (21, 55), (23, 50)] {
        picker.change_start_time(time(h, m));
        let state = picker.state().unwrap();
        let start = state.event_start().unwrap();
        let expected: Vec<NaiveDateTime> = [90, 5, 45, 240]
            .iter()
            .map(|minutes| start + Duration::minutes(*minutes))
            .collect();
        assert_eq!(state.end_options(), expected.as_slice());
    }
}

#[test]
fn test_changing_to_the_current_date_is_a_no_op() {
    let (count, notify) = notifications();
    let mut picker = Picker::new(FixedClock(ts(2024, 6, 1, 7, 0)));
    picker.initialize(
        business_hours_config("15,30,60", Some(ts(2024, 6, 3, 9, 0))),
        notify,
    );
    picker.change_end_time(ts(2024, 6, 3, 10, 0));
    let before = picker.outputs();
    let notified = count.load(Ordering::SeqCst);

    let date = picker.state().unwrap().date();
    assert!(!picker.change_date(date));

    assert_eq!(picker.outputs(), before);
    assert_eq!(count.load(Ordering::SeqCst), notified);
}

#[test]
fn test_chosen_start_is_reselected_after_refresh() {
    let (_, notify) = notifications();
    let mut picker = Picker::new(FixedClock(ts(2024, 6, 1, 7, 0)));
    picker.initialize(business_hours_config("30", None), notify);

    picker.change_start_time(time(15, 40));
    picker.refresh();

    let state = picker.state().unwrap();
    let index = picker.selected_start_index().expect("slot is selectable");
    assert_eq!(state.start_options()[index], time(15, 40));
    assert_eq!(state.event_start(), Some(ts(2024, 6, 1, 15, 40)));
}

#[test]
fn test_floor_past_previous_start_falls_back_to_first_slot() {
    let (_, notify) = notifications();
    let config = PickerConfig {
        interval_spec: Some("30".to_string()),
        time_format: TimeFormat::TwelveHour,
        default_to_current_time: true,
        initial_event_date: Some(ts(2024, 6, 1, 9, 0)),
    };
    let mut early = Picker::new(FixedClock(ts(2024, 6, 1, 8, 0)));
    early.initialize(config.clone(), notify.clone());
    assert_eq!(early.outputs().event_start, Some(ts(2024, 6, 1, 9, 0)));

    // A later clock with the same starting selection.
    let mut late = Picker::new(FixedClock(ts(2024, 6, 1, 13, 21)));
    late.initialize(config, notify);
    let state = late.state().unwrap();
    assert_eq!(state.start_options().first().copied(), Some(time(13, 25)));
    assert_eq!(state.event_start(), Some(ts(2024, 6, 1, 13, 25)));
    assert_eq!(late.start_time_labels().first().map(String::as_str), Some("01:25 PM"));
}

#[test]
fn test_host_date_update_moves_date_field() {
    let (count, notify) = notifications();
    let mut picker = Picker::new(FixedClock(ts(2024, 6, 1, 7, 0)));
    picker.initialize(business_hours_config("15,30,60", None), notify);

    let notified = picker.on_host_values_updated(
        &["eventdate"],
        HostValues {
            event_date: Some(ts(2025, 1, 15, 18, 30)),
            duration: None,
        },
    );

    assert!(notified);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(picker.date_field().as_deref(), Some("2025-01-15"));
    assert_eq!(picker.outputs().event_end, Some(ts(2025, 1, 15, 18, 45)));
}

#[test]
fn test_empty_catalog_reports_incomplete_selection() {
    let (_, notify) = notifications();
    let mut picker = Picker::new(FixedClock(ts(2024, 6, 1, 7, 0)));
    picker.initialize(business_hours_config("abc,,-5", None), notify);

    let outputs = picker.outputs();
    assert_eq!(outputs.event_start, Some(ts(2024, 6, 1, 8, 0)));
    assert_eq!(outputs.event_end, None);
    assert_eq!(outputs.duration_minutes, None);
    assert!(picker.end_time_labels().is_empty());
}

#[test]
fn test_oversized_durations_never_break_the_picker() {
    let (count, notify) = notifications();
    let mut picker = Picker::new(FixedClock(ts(2024, 6, 1, 7, 0)));
    picker.initialize(business_hours_config("30,999999999999", None), notify);

    assert_eq!(picker.catalog().map(|catalog| catalog.minutes().to_vec()), Some(vec![30]));
    assert_eq!(picker.outputs().duration_minutes, Some(30));
    assert_eq!(picker.outputs().event_end, Some(ts(2024, 6, 1, 8, 30)));

    let notified = picker.on_host_values_updated(
        &["duration"],
        HostValues {
            event_date: None,
            duration: Some(999_999_999_999),
        },
    );
    assert!(notified);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(
        picker.outputs(),
        PickerOutputs {
            event_start: Some(ts(2024, 6, 1, 8, 0)),
            event_end: Some(ts(2024, 6, 1, 8, 30)),
            duration_minutes: Some(999_999_999_999),
        }
    );
}
