use std::{fmt::Debug, path::PathBuf, time::Duration};

use crate::{
    output::{output_file_path, Delimiter},
    report::{labels::CategoryLabels, pivot::PivotOptions},
    utils::time::DateRange,
};

/// Everything a single export run depends on. Built once from the command line and the
/// environment, then only read.
#[derive(Clone)]
pub struct ExportConfig {
    pub api_key: String,
    pub api_url: String,
    pub range: DateRange,
    pub out_dir: PathBuf,
    pub labels: CategoryLabels,
    /// When false only the overview report is fetched and the output has no score columns.
    pub include_productivity: bool,
    pub pivot: PivotOptions,
    pub delimiter: Delimiter,
    pub timeout: Option<Duration>,
}

impl ExportConfig {
    pub fn output_path(&self) -> PathBuf {
        output_file_path(&self.out_dir, self.range, self.delimiter)
    }
}

impl Debug for ExportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("range", &self.range)
            .field("out_dir", &self.out_dir)
            .field("labels", &self.labels.len())
            .field("include_productivity", &self.include_productivity)
            .field("pivot", &self.pivot)
            .field("delimiter", &self.delimiter)
            .field("timeout", &self.timeout)
            .finish()
    }
}
