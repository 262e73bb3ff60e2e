//! Declared column kinds and the type-aware empty-value classifier.
//!
//! A column's kind is supplied by the user, never inferred from the data.
//! The kind decides which cells count as empty: categorical columns treat
//! the literal `<NA>` sentinel as equivalent to a true missing value,
//! because missing categorical values round-trip through serialization as
//! that sentinel text. Every other kind only treats the missing marker
//! itself as empty.

use std::{fmt, str::FromStr};

use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::dataset::{Cell, Dataset};

/// Literal text a missing categorical value may serialize to.
pub const NA_SENTINEL: &str = "<NA>";

/// User-declared semantic type of a column.
///
/// [`ColumnKind::NonCategorical`] displays as "Non-categorical" and drives
/// the name/text formatting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnKind {
    #[serde(alias = "name")]
    NonCategorical,
    Categorical,
    Numerical,
    Date,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::NonCategorical => "Non-categorical",
            ColumnKind::Categorical => "Categorical",
            ColumnKind::Numerical => "Numerical",
            ColumnKind::Date => "Date",
        }
    }
}

impl Default for ColumnKind {
    fn default() -> Self {
        ColumnKind::NonCategorical
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "non-categorical" | "noncategorical" | "name" => Ok(ColumnKind::NonCategorical),
            "categorical" => Ok(ColumnKind::Categorical),
            "numerical" | "numeric" => Ok(ColumnKind::Numerical),
            "date" => Ok(ColumnKind::Date),
            other => Err(anyhow!("Unknown column classification '{other}'")),
        }
    }
}

/// Returns true when `cell` counts as empty under the declared kind.
pub fn is_empty(cell: &Cell, kind: ColumnKind) -> bool {
    match cell {
        None => true,
        Some(text) => kind == ColumnKind::Categorical && text == NA_SENTINEL,
    }
}

/// Names of columns containing at least one empty cell, in column order.
pub fn columns_with_empty(dataset: &Dataset) -> Vec<String> {
    dataset
        .columns()
        .iter()
        .filter(|column| column.cells.iter().any(|cell| is_empty(cell, column.kind)))
        .map(|column| column.name.clone())
        .collect()
}
