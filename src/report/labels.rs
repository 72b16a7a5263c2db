use std::{collections::HashMap, path::Path};

use crate::{
    error::{ExportError, ExportResult},
    output::DATE_HEADER,
};

/// What to do with a category that has no configured label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Use the category name as the column.
    #[default]
    PassThrough,
    /// Fail the run with [ExportError::UnmappedCategory].
    Strict,
}

/// Maps category names of the service ("Business") to output columns ("business").
/// An empty map with [UnmappedPolicy::PassThrough] keeps every category name verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryLabels {
    labels: HashMap<String, String>,
    unmapped: UnmappedPolicy,
}

impl CategoryLabels {
    pub fn new(labels: HashMap<String, String>, unmapped: UnmappedPolicy) -> Self {
        Self { labels, unmapped }
    }

    /// Reads labels from a json object, e.g. `{"Business": "business"}`.
    pub fn from_json_file(path: &Path, unmapped: UnmappedPolicy) -> ExportResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        let labels = serde_json::from_str::<HashMap<String, String>>(&content).map_err(|e| {
            ExportError::config(format!("labels file {path:?} is not a json object of strings: {e}"))
        })?;
        if let Some((category, _)) = labels.iter().find(|(_, label)| *label == DATE_HEADER) {
            return Err(ExportError::config(format!(
                "category {category:?} can't be labeled {DATE_HEADER:?}, the date column uses it"
            )));
        }
        Ok(Self::new(labels, unmapped))
    }

    pub fn with_unmapped(self, unmapped: UnmappedPolicy) -> Self {
        Self { unmapped, ..self }
    }

    pub fn resolve(&self, category: &str) -> ExportResult<String> {
        match (self.labels.get(category), self.unmapped) {
            (Some(label), _) => Ok(label.clone()),
            (None, UnmappedPolicy::PassThrough) => Ok(category.to_string()),
            (None, UnmappedPolicy::Strict) => {
                Err(ExportError::UnmappedCategory(category.to_string()))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
