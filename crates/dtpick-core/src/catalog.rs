//! The configured set of allowed event lengths.

use chrono::NaiveDateTime;
use tracing::warn;

/// Duration used when the host supplies no interval configuration at all.
pub const DEFAULT_INTERVAL_MINUTES: i64 = 30;

/// Ordered list of allowed durations in minutes.
///
/// Order is first-seen order from the interval spec. Repeated values are kept,
/// lookups resolve to the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationCatalog {
    minutes: Vec<i64>,
}

impl Default for DurationCatalog {
    fn default() -> Self {
        Self {
            minutes: vec![DEFAULT_INTERVAL_MINUTES],
        }
    }
}

impl DurationCatalog {
    pub fn new(minutes: Vec<i64>) -> Self {
        Self { minutes }
    }

    /// Parse a comma separated interval spec such as `"15, 30,60"`.
    ///
    /// An absent or empty spec yields the single default interval. Tokens without
    /// a leading integer, non-positive values and lengths longer than the whole
    /// calendar range are dropped.
    pub fn parse(spec: Option<&str>) -> Self {
        let (catalog, rejected) = Self::parse_with_rejects(spec);
        if !rejected.is_empty() {
            warn!(rejected = ?rejected, "Dropped unusable interval tokens");
        }
        if catalog.is_empty() {
            warn!(spec = ?spec, "Interval spec produced an empty duration catalog");
        }
        catalog
    }

    /// Same as [`DurationCatalog::parse`] but also returns the tokens that were dropped.
    pub fn parse_with_rejects(spec: Option<&str>) -> (Self, Vec<String>) {
        let spec = match spec {
            Some(raw) if !raw.is_empty() => raw,
            _ => return (Self::default(), Vec::new()),
        };

        let mut minutes = Vec::new();
        let mut rejected = Vec::new();
        for token in spec.split(',') {
            let trimmed = token.trim();
            match leading_integer(trimmed) {
                Some(value) if value > 0 && value <= longest_interval_minutes() => {
                    minutes.push(value)
                }
                _ => rejected.push(trimmed.to_string()),
            }
        }

        (Self { minutes }, rejected)
    }

    pub fn minutes(&self) -> &[i64] {
        &self.minutes
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }

    pub fn contains(&self, minutes: i64) -> bool {
        self.minutes.contains(&minutes)
    }

    /// Catalog position of the first entry equal to `minutes`.
    pub fn index_of(&self, minutes: i64) -> Option<usize> {
        self.minutes.iter().position(|&m| m == minutes)
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.minutes.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.minutes.iter().copied()
    }
}

/// No start has an end further away than the span between the first and last
/// representable timestamps.
fn longest_interval_minutes() -> i64 {
    (NaiveDateTime::MAX - NaiveDateTime::MIN).num_minutes()
}

/// Optional sign followed by the leading run of ASCII digits; trailing text is ignored.
fn leading_integer(token: &str) -> Option<i64> {
    let (negative, rest) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let digits_end = rest
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_order_and_repeats() {
        let catalog = DurationCatalog::parse(Some("30,abc,60,30"));
        assert_eq!(catalog.minutes(), &[30, 60, 30]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let catalog = DurationCatalog::parse(Some(" 15 ,  30,60 "));
        assert_eq!(catalog.minutes(), &[15, 30, 60]);
    }

    #[test]
    fn test_absent_or_empty_spec_falls_back_to_default() {
        assert_eq!(DurationCatalog::parse(None).minutes(), &[30]);
        assert_eq!(DurationCatalog::parse(Some("")).minutes(), &[30]);
    }

    #[test]
    fn test_all_tokens_malformed_yields_empty_catalog() {
        let (catalog, rejected) = DurationCatalog::parse_with_rejects(Some("abc, ,x1"));
        assert!(catalog.is_empty());
        assert_eq!(rejected, vec!["abc".to_string(), String::new(), "x1".to_string()]);
    }

    #[test]
    fn test_leading_integer_semantics() {
        let catalog = DurationCatalog::parse(Some("45min,1.5,+20"));
        assert_eq!(catalog.minutes(), &[45, 1, 20]);
    }

    #[test]
    fn test_non_positive_values_are_dropped() {
        let (catalog, rejected) = DurationCatalog::parse_with_rejects(Some("0,-15,15"));
        assert_eq!(catalog.minutes(), &[15]);
        assert_eq!(rejected.len(), 2);
    }

    #[test]
    fn test_intervals_beyond_calendar_range_are_dropped() {
        let (catalog, rejected) = DurationCatalog::parse_with_rejects(Some("30,999999999999"));
        assert_eq!(catalog.minutes(), &[30]);
        assert_eq!(rejected, vec!["999999999999".to_string()]);

        let longest = longest_interval_minutes();
        let spec = format!("{longest},{}", longest + 1);
        assert_eq!(DurationCatalog::parse(Some(spec.as_str())).minutes(), &[longest]);
    }

    #[test]
    fn test_index_of_resolves_first_occurrence() {
        let catalog = DurationCatalog::new(vec![30, 60, 30]);
        assert_eq!(catalog.index_of(30), Some(0));
        assert_eq!(catalog.index_of(60), Some(1));
        assert_eq!(catalog.index_of(45), None);
    }
}
