//! The in-memory tabular dataset and its CSV (de)serialization.
//!
//! A dataset is a table of rows by named columns. Column order is
//! significant, names are unique and case-sensitive, and all columns hold
//! the same number of cells. A cell is either present text or the missing
//! marker (`None`); parsing maps the empty CSV field to the marker and
//! serialization writes the marker back as an empty field.
//!
//! The structural invariant — at least one column and one row — is checked
//! on construction and must be re-checked by any structural edit before it
//! commits.

use encoding_rs::UTF_8;
use itertools::Itertools;

use crate::{classify::ColumnKind, error::EngineError};

/// A single cell: present text or the canonical missing marker.
pub type Cell = Option<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: &str, cells: Vec<Cell>) -> Self {
        Self::with_kind(name, ColumnKind::default(), cells)
    }

    pub fn with_kind(name: &str, kind: ColumnKind, cells: Vec<Cell>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Builds a dataset from pre-assembled columns, validating uniqueness,
    /// equal lengths, and the structural invariant.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, EngineError> {
        if columns.is_empty() {
            return Err(EngineError::Parse(
                "dataset must contain at least one column".to_string(),
            ));
        }
        let row_count = columns[0].cells.len();
        if row_count == 0 {
            return Err(EngineError::Parse(
                "dataset must contain at least one row".to_string(),
            ));
        }
        for column in &columns {
            if column.cells.len() != row_count {
                return Err(EngineError::Parse(format!(
                    "column '{}' has {} cell(s), expected {}",
                    column.name,
                    column.cells.len(),
                    row_count
                )));
            }
        }
        if let Some(duplicate) = columns.iter().map(|c| c.name.as_str()).duplicates().next() {
            return Err(EngineError::Parse(format!(
                "duplicate column name '{duplicate}'"
            )));
        }
        Ok(Self { columns })
    }

    /// Parses uploaded bytes as headered, comma-delimited text. The input
    /// is decoded as UTF-8 (with BOM sniffing); empty fields become the
    /// missing marker.
    pub fn parse(bytes: &[u8]) -> Result<Self, EngineError> {
        let (text, _, had_errors) = UTF_8.decode(bytes);
        if had_errors {
            return Err(EngineError::Parse(
                "input is not valid UTF-8 text".to_string(),
            ));
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .double_quote(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(EngineError::from)?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();

        let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record.map_err(EngineError::from)?;
            for (idx, field) in record.iter().enumerate() {
                cells[idx].push(if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                });
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(&name, cells))
            .collect();
        Self::from_columns(columns)
    }

    /// Serializes the dataset as comma-delimited text with a header row and
    /// no row-index column. Missing markers are written as empty fields.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, EngineError> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .double_quote(true)
            .from_writer(Vec::new());
        writer
            .write_record(self.columns.iter().map(|c| c.name.as_str()))
            .map_err(EngineError::from)?;
        for row in 0..self.row_count() {
            writer
                .write_record(
                    self.columns
                        .iter()
                        .map(|c| c.cells[row].as_deref().unwrap_or("")),
                )
                .map_err(EngineError::from)?;
        }
        writer
            .into_inner()
            .map_err(|err| EngineError::Parse(err.to_string()))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Column names paired with their declared classification in the
    /// external vocabulary.
    pub fn classifications(&self) -> Vec<(String, String)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.kind.to_string()))
            .collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, EngineError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| EngineError::UnknownColumn(name.to_string()))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column, EngineError> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| EngineError::UnknownColumn(name.to_string()))
    }

    /// Distinct non-empty values of a column in ascending order.
    pub fn unique_values(&self, name: &str) -> Result<Vec<String>, EngineError> {
        let column = self.column(name)?;
        Ok(column
            .cells
            .iter()
            .flatten()
            .cloned()
            .sorted()
            .dedup()
            .collect())
    }

    /// Assigns a declared classification to a column.
    pub fn set_kind(&mut self, name: &str, kind: ColumnKind) -> Result<(), EngineError> {
        self.column_mut(name)?.kind = kind;
        Ok(())
    }

    /// Removes the named columns. All-or-nothing: every name must exist and
    /// at least one column must remain, otherwise nothing changes.
    pub fn remove_columns(&mut self, names: &[String]) -> Result<(), EngineError> {
        for name in names {
            if self.column_index(name).is_none() {
                return Err(EngineError::UnknownColumn(name.clone()));
            }
        }
        let remaining = self
            .columns
            .iter()
            .filter(|c| !names.contains(&c.name))
            .count();
        if remaining == 0 {
            return Err(EngineError::StructuralViolation(
                "deleting these columns would leave the dataset with no columns".to_string(),
            ));
        }
        self.columns.retain(|c| !names.contains(&c.name));
        Ok(())
    }

    /// Keeps only the rows whose mask entry is true. Rejects masks that
    /// would leave the table empty; nothing changes on rejection.
    pub fn retain_rows(&mut self, keep: &[bool]) -> Result<(), EngineError> {
        debug_assert_eq!(keep.len(), self.row_count());
        if !keep.iter().any(|&k| k) {
            return Err(EngineError::StructuralViolation(
                "dropping these rows would leave the dataset with no rows".to_string(),
            ));
        }
        for column in &mut self.columns {
            let mut mask = keep.iter();
            column.cells.retain(|_| *mask.next().unwrap_or(&true));
        }
        Ok(())
    }
}
