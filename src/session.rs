//! Session-scoped dataset lifecycle.
//!
//! A session owns at most one active dataset plus the per-column precision
//! side-table. Every transform entry point checks for an active dataset
//! first; replacing or clearing the dataset also clears the side-table,
//! since recorded precisions belong to the table they were chosen for.
//!
//! Access is sequential by design. Callers that allow concurrent requests
//! against one session must hold a per-session lock for the whole
//! load-mutate-persist span; each operation reads the full table, mutates
//! it in memory, and leaves the result as the session's current state.

use log::info;

use crate::{
    classify::{self, ColumnKind},
    dataset::Dataset,
    error::{BatchReport, EngineError},
    transform::{self, ColumnRequest, PrecisionTable, RoundPrecision},
};

#[derive(Debug, Default)]
pub struct DatasetSession {
    active: Option<ActiveState>,
}

#[derive(Debug)]
struct ActiveState {
    dataset: Dataset,
    precisions: PrecisionTable,
}

impl DatasetSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses uploaded bytes into a fresh dataset, replacing any active one
    /// and discarding its transform history and recorded precisions.
    pub fn load(&mut self, bytes: &[u8]) -> Result<&Dataset, EngineError> {
        let dataset = Dataset::parse(bytes)?;
        info!(
            "Loaded dataset with {} column(s) and {} row(s)",
            dataset.column_count(),
            dataset.row_count()
        );
        let state = self.active.insert(ActiveState {
            dataset,
            precisions: PrecisionTable::new(),
        });
        Ok(&state.dataset)
    }

    /// Installs an already-built dataset as the session's current one.
    pub fn replace(&mut self, dataset: Dataset) {
        self.active = Some(ActiveState {
            dataset,
            precisions: PrecisionTable::new(),
        });
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn current(&self) -> Result<&Dataset, EngineError> {
        self.active
            .as_ref()
            .map(|state| &state.dataset)
            .ok_or(EngineError::NoActiveDataset)
    }

    fn state_mut(&mut self) -> Result<&mut ActiveState, EngineError> {
        self.active.as_mut().ok_or(EngineError::NoActiveDataset)
    }

    /// Serializes the current dataset and empties the session; the dataset
    /// is not retained after a successful download.
    pub fn download(&mut self) -> Result<Vec<u8>, EngineError> {
        let bytes = self.current()?.to_csv_bytes()?;
        self.clear();
        Ok(bytes)
    }

    /// Assigns declared classifications; unknown columns fail the whole
    /// request with nothing assigned.
    pub fn classify(&mut self, assignments: &[(String, ColumnKind)]) -> Result<(), EngineError> {
        let state = self.state_mut()?;
        for (name, _) in assignments {
            state.dataset.column(name)?;
        }
        for (name, kind) in assignments {
            state.dataset.set_kind(name, *kind)?;
        }
        Ok(())
    }

    /// Deletes the named columns, all-or-nothing.
    pub fn delete_columns(&mut self, names: &[String]) -> Result<(), EngineError> {
        let state = self.state_mut()?;
        state.dataset.remove_columns(names)?;
        state.precisions.retain(|column, _| !names.contains(column));
        Ok(())
    }

    /// Applies a transform batch best-effort and returns the report.
    pub fn apply(&mut self, requests: &[ColumnRequest]) -> Result<BatchReport, EngineError> {
        let state = self.state_mut()?;
        Ok(transform::apply_requests(
            &mut state.dataset,
            &mut state.precisions,
            requests,
        ))
    }

    /// Recorded display precision for a column, if a rounding operation set one.
    pub fn precision_for(&self, column: &str) -> Option<RoundPrecision> {
        self.active
            .as_ref()
            .and_then(|state| state.precisions.get(column))
            .copied()
    }

    /// Columns containing at least one empty cell per their declared kinds.
    pub fn columns_with_empty(&self) -> Result<Vec<String>, EngineError> {
        Ok(classify::columns_with_empty(self.current()?))
    }
}
