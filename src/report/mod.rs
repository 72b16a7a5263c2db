//! Reshaping of raw reports. [pivot] turns rows into per date columns, [merge] joins the
//! category and productivity tables into the records that end up in the output file.

pub mod labels;
pub mod merge;
pub mod pivot;

use std::collections::BTreeMap;

use crate::error::{ExportError, ExportResult};

/// Seconds spent per column of a single date. Columns keep the order they were first seen in,
/// which later decides the order of the output header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayColumns(Vec<(String, i64)>);

impl DayColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Sets a column, returning the value it replaced.
    pub fn set(&mut self, key: String, value: i64) -> Option<i64> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, previous)) => Some(std::mem::replace(previous, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Adds to a column. A sum that doesn't fit into `i64` is rejected.
    pub fn add(&mut self, key: String, value: i64) -> ExportResult<()> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, previous)) => match previous.checked_add(value) {
                Some(sum) => *previous = sum,
                None => {
                    return Err(ExportError::schema(format!(
                        "sum of {key} overflows: {previous} + {value}"
                    )))
                }
            },
            None => self.0.push((key, value)),
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all columns, `None` when it overflows.
    pub fn total(&self) -> Option<i64> {
        self.0
            .iter()
            .try_fold(0i64, |acc, (_, v)| acc.checked_add(*v))
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for DayColumns {
    fn from_iter<T: IntoIterator<Item = (K, i64)>>(iter: T) -> Self {
        let mut columns = DayColumns::new();
        for (k, v) in iter {
            columns.set(k.into(), v);
        }
        columns
    }
}

/// Date of the report -> columns of that date.
pub type DailyAggregate = BTreeMap<String, DayColumns>;
