use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    api::{RawReport, DATE_COLUMN},
    error::{ExportError, ExportResult},
    utils::time::truncate_to_day,
};

use super::{labels::CategoryLabels, DailyAggregate};

/// How `Date` values are turned into rows of the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Granularity {
    /// One row per distinct `Date` value, exactly as the service sent it.
    #[default]
    Verbatim,
    /// One row per calendar day. Hourly timestamps of the same day end up in the same row.
    Day,
}

/// How two values for the same date and column are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CombinePolicy {
    /// The later row wins. A replaced value is reported with a warning.
    #[default]
    Overwrite,
    Sum,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PivotOptions {
    pub granularity: Granularity,
    pub combine: CombinePolicy,
}

/// One row of a report, keyed by header name.
#[derive(Debug)]
pub struct HourlyRecord<'a>(HashMap<&'a str, &'a Value>);

impl<'a> HourlyRecord<'a> {
    fn field(&self, column: &str) -> ExportResult<&'a Value> {
        self.0
            .get(column)
            .copied()
            .ok_or_else(|| ExportError::schema(format!("missing column {column:?}")))
    }
}

/// Zips every row with the headers of the report.
pub fn hourly_records(report: &RawReport) -> ExportResult<Vec<HourlyRecord<'_>>> {
    report
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            if row.len() != report.row_headers.len() {
                return Err(ExportError::schema(format!(
                    "row {index} has {} values but there are {} headers",
                    row.len(),
                    report.row_headers.len()
                )));
            }
            Ok(HourlyRecord(
                report
                    .row_headers
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter())
                    .collect(),
            ))
        })
        .collect()
}

/// Groups the rows of `report` by date and spreads `dimension_column` into columns named by
/// `key_fn`, holding the seconds from `value_column`.
pub fn pivot_by_date(
    report: &RawReport,
    dimension_column: &str,
    value_column: &str,
    key_fn: impl Fn(&Value) -> ExportResult<String>,
    options: PivotOptions,
) -> ExportResult<DailyAggregate> {
    for column in [DATE_COLUMN, dimension_column, value_column] {
        if report.column_index(column).is_none() {
            return Err(ExportError::schema(format!(
                "report has no {column:?} column, headers are {:?}",
                report.row_headers
            )));
        }
    }

    let mut aggregate = DailyAggregate::new();
    for record in hourly_records(report)? {
        let date = match record.field(DATE_COLUMN)? {
            Value::String(v) => v.as_str(),
            other => {
                return Err(ExportError::schema(format!(
                    "date should be a string, got {other}"
                )))
            }
        };
        let date = match options.granularity {
            Granularity::Verbatim => date.to_string(),
            Granularity::Day => truncate_to_day(date),
        };
        let key = key_fn(record.field(dimension_column)?)?;
        let seconds = parse_seconds(record.field(value_column)?)?;

        let columns = aggregate.entry(date.clone()).or_default();
        match options.combine {
            CombinePolicy::Sum => columns.add(key, seconds)?,
            CombinePolicy::Overwrite => {
                if let Some(previous) = columns.set(key.clone(), seconds) {
                    warn!("{key} on {date} appeared twice, {previous} was overwritten with {seconds}");
                }
            }
        }
    }

    debug!(
        "Pivoted {} rows of {dimension_column} into {} dates",
        report.rows.len(),
        aggregate.len()
    );
    Ok(aggregate)
}

/// Renders a dimension value. Categories come as strings, productivity scores as numbers.
pub fn dimension_text(value: &Value) -> ExportResult<String> {
    match value {
        Value::String(v) => Ok(v.clone()),
        Value::Number(v) => Ok(v.to_string()),
        other => Err(ExportError::schema(format!(
            "dimension value should be a string or a number, got {other}"
        ))),
    }
}

/// Column key of a category row.
pub fn category_key(labels: &CategoryLabels) -> impl Fn(&Value) -> ExportResult<String> + '_ {
    move |value| labels.resolve(&dimension_text(value)?)
}

/// Column key of a productivity row, `Score2`, `Score-1` and so on.
pub fn productivity_key(value: &Value) -> ExportResult<String> {
    Ok(format!("Score{}", dimension_text(value)?))
}

fn parse_seconds(value: &Value) -> ExportResult<i64> {
    if let Some(v) = value.as_i64() {
        return Ok(v);
    }
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    match value.as_f64() {
        Some(v) if v.fract() == 0. && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
            Ok(v as i64)
        }
        _ => Err(ExportError::schema(format!(
            "time spent should be a whole number of seconds that fits into i64, got {value}"
        ))),
    }
}
