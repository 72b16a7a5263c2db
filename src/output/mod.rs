//! Writing of merged records into a delimited file.

use std::{
    collections::HashSet,
    fs::File,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{ExportError, ExportResult},
    report::merge::MergedRecord,
    utils::{
        dir::ensure_dir,
        time::{date_to_query_value, DateRange},
    },
};

pub const REPORT_NAME: &str = "rescuetime-data";
pub const DATE_HEADER: &str = "date";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Delimiter::Comma => "csv",
            Delimiter::Tab => "tsv",
        }
    }
}

/// `<out_dir>/rescuetime-data-<start>-<end>.<ext>`
pub fn output_file_path(out_dir: &Path, range: DateRange, delimiter: Delimiter) -> PathBuf {
    out_dir.join(format!(
        "{REPORT_NAME}-{}-{}.{}",
        date_to_query_value(range.start()),
        date_to_query_value(range.end()),
        delimiter.extension()
    ))
}

/// `date` followed by every column of the records, in the order they first appear. A column
/// named `date` would be indistinguishable from the date itself and is rejected.
pub fn header(records: &[MergedRecord]) -> ExportResult<Vec<&str>> {
    let mut seen = HashSet::new();
    let mut header = vec![DATE_HEADER];
    for record in records {
        for key in record.columns.keys() {
            if key == DATE_HEADER {
                return Err(ExportError::schema(format!(
                    "record of {} has a column named {DATE_HEADER:?}",
                    record.date
                )));
            }
            if seen.insert(key) {
                header.push(key);
            }
        }
    }
    Ok(header)
}

/// Writes records to `path`, creating its directory if needed. An existing file is replaced.
/// Columns a record doesn't have are left empty.
pub fn write_delimited(
    records: &[MergedRecord],
    path: &Path,
    delimiter: Delimiter,
) -> ExportResult<()> {
    let header = header(records)?;

    if let Some(parent) = path.parent().filter(|v| !v.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.byte())
        .from_writer(file);

    writer.write_record(&header)?;
    for record in records {
        let row = header.iter().skip(1).map(|key| {
            record
                .columns
                .get(key)
                .map(|v| v.to_string())
                .unwrap_or_default()
        });
        writer.write_record(std::iter::once(record.date.clone()).chain(row))?;
    }
    writer.flush().map_err(|e| ExportError::io(path, e))?;

    debug!(
        "Wrote {} rows with {} columns into {path:?}",
        records.len(),
        header.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::report::DayColumns;

    use super::*;

    fn records() -> Vec<MergedRecord> {
        vec![
            MergedRecord {
                date: "2020-09-01".into(),
                columns: DayColumns::from_iter([("Business", 3600), ("Entertainment", 1800)]),
            },
            MergedRecord {
                date: "2020-09-02".into(),
                columns: DayColumns::from_iter([("Business", 7200), ("Score2", 7000)]),
            },
            MergedRecord {
                date: "2020-09-03".into(),
                columns: DayColumns::from_iter([("Design & Composition, Art", 60)]),
            },
        ]
    }

    #[test]
    fn test_header_is_first_seen_union() -> Result<()> {
        assert_eq!(
            header(&records())?,
            vec![
                "date",
                "Business",
                "Entertainment",
                "Score2",
                "Design & Composition, Art"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_column_named_date_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.csv");
        let records = vec![MergedRecord {
            date: "2020-09-01".into(),
            columns: DayColumns::from_iter([("date", 3600), ("Business", 10)]),
        }];

        let result = write_delimited(&records, &path, Delimiter::Comma);

        assert!(matches!(result, Err(ExportError::Schema(_))));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_output_file_path() -> Result<()> {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 9, 30).unwrap(),
        )?;
        assert_eq!(
            output_file_path(Path::new("./output"), range, Delimiter::Comma),
            PathBuf::from("./output/rescuetime-data-2020-09-01-2020-09-30.csv")
        );
        assert_eq!(
            output_file_path(Path::new("out"), range, Delimiter::Tab),
            PathBuf::from("out/rescuetime-data-2020-09-01-2020-09-30.tsv")
        );
        Ok(())
    }

    #[test]
    fn test_written_rows_read_back() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("data.csv");
        let records = records();

        write_delimited(&records, &path, Delimiter::Comma)?;

        let mut reader = csv::Reader::from_path(&path)?;
        let headers = reader.headers()?.clone();
        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

        assert_eq!(rows.len(), records.len());
        for (row, record) in rows.iter().zip(&records) {
            assert_eq!(&row[0], record.date);
            for (index, name) in headers.iter().enumerate().skip(1) {
                let expected = record
                    .columns
                    .get(name)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                assert_eq!(row[index], expected);
            }
        }
        assert_eq!(&rows[2][1], "");
        assert_eq!(&rows[2][4], "60");
        Ok(())
    }

    #[test]
    fn test_empty_records_write_header_only() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.csv");

        write_delimited(&[], &path, Delimiter::Comma)?;

        assert_eq!(std::fs::read_to_string(&path)?, "date\n");
        Ok(())
    }

    #[test]
    fn test_existing_file_is_replaced() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.tsv");
        std::fs::write(&path, "old content that is longer than the new one\n".repeat(10))?;

        write_delimited(&records()[1..2], &path, Delimiter::Tab)?;

        assert_eq!(
            std::fs::read_to_string(&path)?,
            "date\tBusiness\tScore2\n2020-09-02\t7200\t7000\n"
        );
        Ok(())
    }
}
