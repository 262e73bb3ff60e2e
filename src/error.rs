//! Engine error taxonomy and per-column failure reporting.
//!
//! Whole-request failures are [`EngineError`] values. Per-column failures
//! inside a transform batch are collected into a [`BatchReport`] instead of
//! aborting the remaining columns.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The uploaded bytes could not be parsed into a dataset. The message
    /// carries the parser's diagnostic verbatim.
    #[error("failed to parse uploaded data: {0}")]
    Parse(String),

    /// An operation that requires a loaded dataset was requested while the
    /// session holds none.
    #[error("no dataset is currently loaded in this session")]
    NoActiveDataset,

    /// The requested edit would leave the dataset without at least one
    /// column and one row.
    #[error("operation rejected: {0}")]
    StructuralViolation(String),

    #[error("column '{0}' does not exist in the dataset")]
    UnknownColumn(String),

    /// An aggregate fill (mode, mean, median) found no usable values.
    #[error("column '{0}' has no non-empty values to aggregate")]
    EmptyColumn(String),
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::Parse(err.to_string())
    }
}

/// One failed `(column, operation)` request within a batch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ColumnFailure {
    pub column: String,
    pub reason: String,
}

/// Outcome of a transform batch: which columns were applied and which
/// requests failed, in request order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub applied: Vec<String>,
    pub failures: Vec<ColumnFailure>,
}

impl BatchReport {
    pub fn record_success(&mut self, column: &str) {
        self.applied.push(column.to_string());
    }

    pub fn record_failure(&mut self, column: &str, err: &EngineError) {
        self.failures.push(ColumnFailure {
            column: column.to_string(),
            reason: err.to_string(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
