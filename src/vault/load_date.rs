//! Load-date stamping and parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::Deserialize;

use crate::db::Value;

const SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MILLIS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Resolution of the load dates written by a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadDatePrecision {
    Seconds,
    #[default]
    Milliseconds,
}

impl LoadDatePrecision {
    pub fn from_millisecond_flag(millisecond_precision: bool) -> Self {
        if millisecond_precision {
            Self::Milliseconds
        } else {
            Self::Seconds
        }
    }

    /// Drop sub-unit digits from `at`
    pub fn truncate(self, at: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Seconds => at.trunc_subsecs(0),
            Self::Milliseconds => at.trunc_subsecs(3),
        }
    }

    /// Column text for `at`
    pub fn format(self, at: DateTime<Utc>) -> String {
        match self {
            Self::Seconds => at.format(SECONDS_FORMAT).to_string(),
            Self::Milliseconds => at.format(MILLIS_FORMAT).to_string(),
        }
    }

    /// Timestamp for a row being written now
    pub fn stamp_now(self) -> String {
        self.format(Utc::now())
    }
}

/// Read a load date back out of a column value
///
/// Accepts text in either write precision, RFC 3339, a bare date, or integer
/// unix seconds.
pub fn parse(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Text(text) => parse_text(text.trim()),
        Value::Integer(secs) => DateTime::from_timestamp(*secs, 0),
        _ => None,
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(text, MILLIS_FORMAT) {
        return Some(at.and_utc());
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(text, SECONDS_FORMAT) {
        return Some(at.and_utc());
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap() + chrono::Duration::microseconds(123_456)
    }

    #[test]
    fn test_format_by_precision() {
        assert_eq!(
            LoadDatePrecision::Seconds.format(sample()),
            "2024-03-09 14:05:07"
        );
        assert_eq!(
            LoadDatePrecision::Milliseconds.format(sample()),
            "2024-03-09 14:05:07.123"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(LoadDatePrecision::Seconds.truncate(sample()).nanosecond(), 0);
        assert_eq!(
            LoadDatePrecision::Milliseconds.truncate(sample()).nanosecond(),
            123_000_000
        );
    }

    #[test]
    fn test_parse_round_trips_both_precisions() {
        for precision in [LoadDatePrecision::Seconds, LoadDatePrecision::Milliseconds] {
            let text = precision.format(sample());
            assert_eq!(
                parse(&Value::Text(text)),
                Some(precision.truncate(sample()))
            );
        }
    }

    #[test]
    fn test_parse_other_shapes() {
        assert!(parse(&Value::from("2024-03-09T14:05:07Z")).is_some());
        assert_eq!(
            parse(&Value::from("2024-03-09")),
            Some(Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse(&Value::Integer(0)),
            Some(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse(&Value::Null), None);
        assert_eq!(parse(&Value::from("")), None);
        assert_eq!(parse(&Value::from("yesterday")), None);
        assert_eq!(parse(&Value::Real(1.5)), None);
    }

    #[test]
    fn test_millisecond_flag() {
        assert_eq!(
            LoadDatePrecision::from_millisecond_flag(true),
            LoadDatePrecision::Milliseconds
        );
        assert_eq!(
            LoadDatePrecision::from_millisecond_flag(false),
            LoadDatePrecision::Seconds
        );
    }
}
