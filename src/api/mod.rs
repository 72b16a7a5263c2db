//! Access to the RescueTime analytic data API. [RescueTimeClient] is the real implementation of
//! [ReportSource], tests drive the pipeline through a mock instead.

pub mod client;

use std::fmt::Display;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::{error::ExportResult, utils::time::DateRange};

pub use client::{RescueTimeClient, DEFAULT_API_URL};

pub const DATE_COLUMN: &str = "Date";
pub const TIME_SPENT_COLUMN: &str = "Time Spent (seconds)";

/// Value of `restrict_kind` sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Overview,
    Productivity,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Overview => "overview",
            ReportKind::Productivity => "productivity",
        }
    }

    /// Column of the report that holds the pivoted dimension.
    pub fn dimension_column(self) -> &'static str {
        match self {
            ReportKind::Overview => "Category",
            ReportKind::Productivity => "Productivity",
        }
    }
}

impl Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tabular response of the API. Rows are positional and are interpreted through
/// `row_headers`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawReport {
    pub row_headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl RawReport {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.row_headers.iter().position(|v| v == name)
    }
}

/// Anything that can provide reports for a date range.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_report(&self, kind: ReportKind, range: DateRange) -> ExportResult<RawReport>;
}
