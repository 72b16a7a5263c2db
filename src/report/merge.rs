use std::collections::BTreeSet;

use super::{DailyAggregate, DayColumns};

/// One line of the output. Columns are sparse, a date only has the categories and scores that
/// were active on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRecord {
    pub date: String,
    pub columns: DayColumns,
}

/// Joins category and productivity aggregates by date. Dates present in either side produce a
/// record, records are sorted by date. When both sides have the same column the productivity
/// value is kept.
///
/// Passing `None` for productivity is the category-only run mode.
pub fn merge(
    mut categories: DailyAggregate,
    productivity: Option<DailyAggregate>,
) -> Vec<MergedRecord> {
    let mut productivity = productivity.unwrap_or_default();

    let dates = categories
        .keys()
        .chain(productivity.keys())
        .cloned()
        .collect::<BTreeSet<_>>();

    dates
        .into_iter()
        .map(|date| {
            let mut columns = categories.remove(&date).unwrap_or_default();
            for (key, value) in productivity.remove(&date).unwrap_or_default().iter() {
                columns.set(key.to_string(), value);
            }
            MergedRecord { date, columns }
        })
        .collect()
}
