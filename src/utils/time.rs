use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use chrono_english::{parse_date_string, Dialect};

use crate::error::{ExportError, ExportResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a string in requests and file names.
pub fn date_to_query_value(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Inclusive range of days. Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ExportResult<Self> {
        if start > end {
            return Err(ExportError::config(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Parses a day. `YYYY-MM-DD` is tried first, anything else goes through natural language
/// parsing relative to `now`, e.g. "yesterday" or "15/03/2025".
pub fn parse_day(value: &str, now: DateTime<Local>, dialect: Dialect) -> ExportResult<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }
    parse_date_string(value, now, dialect)
        .map(|v| v.date_naive())
        .map_err(|e| ExportError::config(format!("failed to parse date {value:?}: {e}")))
}

/// Reduces a `Date` value from a report to its calendar day. Values are either plain days or
/// timestamps like `2020-09-01T10:00:00`. Unknown formats are returned as is.
pub fn truncate_to_day(value: &str) -> String {
    if NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok() {
        return value.to_string();
    }
    match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        Ok(v) => date_to_query_value(v.date()),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_rejects_reversed_dates() {
        assert!(DateRange::new(day(2020, 9, 1), day(2020, 9, 1)).is_ok());
        assert!(matches!(
            DateRange::new(day(2020, 9, 2), day(2020, 9, 1)),
            Err(ExportError::Config(_))
        ));
    }

    #[test]
    fn test_parse_day() -> anyhow::Result<()> {
        let now = Local.with_ymd_and_hms(2025, 3, 16, 12, 0, 0).unwrap();
        assert_eq!(parse_day("2020-09-01", now, Dialect::Uk)?, day(2020, 9, 1));
        assert_eq!(parse_day("15/03/2025", now, Dialect::Uk)?, day(2025, 3, 15));
        assert_eq!(
            parse_day("yesterday", now, Dialect::Uk)?,
            (now - Duration::days(1)).date_naive()
        );
        assert!(parse_day("not a date at all", now, Dialect::Uk).is_err());
        Ok(())
    }

    #[test]
    fn test_truncate_to_day() {
        assert_eq!(truncate_to_day("2020-09-01T10:00:00"), "2020-09-01");
        assert_eq!(truncate_to_day("2020-09-01"), "2020-09-01");
        assert_eq!(truncate_to_day("someday"), "someday");
    }
}
