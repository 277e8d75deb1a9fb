//! Display formatting and parsing of host-supplied date/time strings.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::PickerError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Clock style used for time labels.
///
/// The host encodes this as a flag string: `"0"` selects the 24-hour clock and
/// every other value selects the 12-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimeFormat {
    TwentyFourHour,
    #[default]
    TwelveHour,
}

impl TimeFormat {
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim() == "0" {
            TimeFormat::TwentyFourHour
        } else {
            TimeFormat::TwelveHour
        }
    }

    pub fn as_flag(&self) -> &'static str {
        match self {
            TimeFormat::TwentyFourHour => "0",
            TimeFormat::TwelveHour => "1",
        }
    }

    pub fn is_24_hour(&self) -> bool {
        matches!(self, TimeFormat::TwentyFourHour)
    }
}

impl From<String> for TimeFormat {
    fn from(value: String) -> Self {
        Self::from_flag(&value)
    }
}

impl From<TimeFormat> for String {
    fn from(value: TimeFormat) -> Self {
        value.as_flag().to_string()
    }
}

/// Two-digit hour and minute, with an AM/PM suffix on the 12-hour clock.
pub fn format_time(time: NaiveTime, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwentyFourHour => time.format("%H:%M").to_string(),
        TimeFormat::TwelveHour => time.format("%I:%M %p").to_string(),
    }
}

/// The `YYYY-MM-DD` text shown in the date field.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, PickerError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| PickerError::InvalidDate(raw.to_string()))
}

pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, PickerError> {
    let trimmed = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| PickerError::InvalidTimeOfDay(raw.to_string()))
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, PickerError> {
    let trimmed = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| PickerError::InvalidTimestamp(raw.to_string()))
}

pub fn parse_duration_minutes(raw: &str) -> Result<i64, PickerError> {
    match raw.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(PickerError::InvalidDuration(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_24_hour() {
        let time = NaiveTime::from_hms_opt(14, 5, 0).unwrap();
        assert_eq!(format_time(time, TimeFormat::TwentyFourHour), "14:05");
    }

    #[test]
    fn test_format_time_12_hour() {
        let time = NaiveTime::from_hms_opt(14, 5, 0).unwrap();
        assert_eq!(format_time(time, TimeFormat::TwelveHour), "02:05 PM");
        let morning = NaiveTime::from_hms_opt(0, 30, 0).unwrap();
        assert_eq!(format_time(morning, TimeFormat::TwelveHour), "12:30 AM");
    }

    #[test]
    fn test_time_format_flag() {
        assert_eq!(TimeFormat::from_flag("0"), TimeFormat::TwentyFourHour);
        assert_eq!(TimeFormat::from_flag("1"), TimeFormat::TwelveHour);
        assert_eq!(TimeFormat::from_flag("yes"), TimeFormat::TwelveHour);
        assert_eq!(TimeFormat::default(), TimeFormat::TwelveHour);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-06-01T10:30").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-06-01 10:30:00").unwrap(), expected);
        assert!(matches!(
            parse_timestamp("June 1st"),
            Err(PickerError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(
            parse_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
        assert_eq!(
            parse_time_of_day("07:45").unwrap(),
            NaiveTime::from_hms_opt(7, 45, 0).unwrap()
        );
        assert!(parse_time_of_day("25:00").is_err());
    }

    #[test]
    fn test_parse_duration_minutes_rejects_non_positive() {
        assert_eq!(parse_duration_minutes("45").unwrap(), 45);
        assert!(parse_duration_minutes("0").is_err());
        assert!(parse_duration_minutes("half").is_err());
    }
}
