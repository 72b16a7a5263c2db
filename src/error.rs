use std::path::PathBuf;

use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

/// Every way an export run can fail. None of these are recovered from, they all travel up to
/// the process boundary.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request for {kind} report failed")]
    Network {
        kind: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{kind} report returned unexpected status {status}")]
    Status {
        kind: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("credential rejected: {0}")]
    Auth(String),

    #[error("unexpected report shape: {0}")]
    Schema(String),

    #[error("no label configured for category {0:?}")]
    UnmappedCategory(String),

    #[error("failed to write {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write delimited output")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Transport and unexpected status failures are both network errors from the caller's
    /// point of view.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}
