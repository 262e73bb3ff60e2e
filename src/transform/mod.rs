//! Per-column cleaning operations and batch application.
//!
//! Each supported operation is a variant of a closed per-kind enum
//! ([`NameOp`], [`CategoricalOp`], [`NumericalOp`], [`DateOp`]) wrapped in
//! [`ColumnOp`], dispatched exhaustively. A batch of `(column, op)`
//! requests is applied best-effort: a failing request leaves the dataset
//! exactly as the previous successful request left it, and the failure is
//! collected into the returned [`BatchReport`] instead of aborting the
//! remaining requests.

pub mod dates;
pub mod numeric;
pub mod string_ops;

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    classify,
    dataset::Dataset,
    error::{BatchReport, EngineError},
    rank::RankMap,
};

pub use dates::DateLayout;
pub use numeric::RoundPrecision;
pub use string_ops::TextCase;

/// Per-column numeric display precision remembered between operations.
/// Owned by the session and cleared whenever the dataset is replaced.
pub type PrecisionTable = HashMap<String, RoundPrecision>;

/// One requested operation against one named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRequest {
    pub column: String,
    pub op: ColumnOp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnOp {
    Name(NameOp),
    Categorical(CategoricalOp),
    Numerical(NumericalOp),
    Date(DateOp),
    /// Renames/merges values: every cell whose current value is a key of
    /// the map is replaced with the mapped value.
    Standardize(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameOp {
    Format(TextCase),
    FillEmpty(BasicFill),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoricalOp {
    Format(TextCase),
    FillEmpty(BasicFill),
    FillMode,
    FillMean,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericalOp {
    Round(RoundPrecision),
    FillEmpty(NumericFill),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOp {
    Reformat(DateLayout),
    FillEmpty(DateFill),
}

/// Empty-cell strategies shared by name and categorical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BasicFill {
    DeleteEmptyRows,
    FillWithNone,
    FillWithUnknown,
    FillWithNa,
}

impl BasicFill {
    fn literal(&self) -> Option<&'static str> {
        match self {
            BasicFill::DeleteEmptyRows => None,
            BasicFill::FillWithNone => Some("None"),
            BasicFill::FillWithUnknown => Some("Unknown"),
            BasicFill::FillWithNa => Some("N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericFill {
    DeleteEmptyRows,
    FillMean,
    FillMedian,
    FillMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateFill {
    DeleteEmptyRows,
    FillCurrentDate,
    FillNa,
}

/// Applies a batch of requests best-effort, collecting per-column failures.
pub fn apply_requests(
    dataset: &mut Dataset,
    precisions: &mut PrecisionTable,
    requests: &[ColumnRequest],
) -> BatchReport {
    let mut report = BatchReport::default();
    for request in requests {
        match apply_one(dataset, precisions, &request.column, &request.op) {
            Ok(()) => {
                debug!("Applied {:?} to column '{}'", request.op, request.column);
                report.record_success(&request.column);
            }
            Err(err) => {
                warn!("Skipping column '{}': {err}", request.column);
                report.record_failure(&request.column, &err);
            }
        }
    }
    report
}

fn apply_one(
    dataset: &mut Dataset,
    precisions: &mut PrecisionTable,
    column: &str,
    op: &ColumnOp,
) -> Result<(), EngineError> {
    match op {
        ColumnOp::Name(NameOp::Format(case)) => format_name_column(dataset, column, *case),
        ColumnOp::Name(NameOp::FillEmpty(fill)) => basic_fill(dataset, column, *fill),
        ColumnOp::Categorical(CategoricalOp::Format(case)) => {
            format_text_column(dataset, column, *case)
        }
        ColumnOp::Categorical(CategoricalOp::FillEmpty(fill)) => basic_fill(dataset, column, *fill),
        ColumnOp::Categorical(CategoricalOp::FillMode) => fill_mode(dataset, column),
        ColumnOp::Categorical(CategoricalOp::FillMean) => fill_rank_mean(dataset, column),
        ColumnOp::Numerical(NumericalOp::Round(precision)) => {
            round_column(dataset, precisions, column, *precision)
        }
        ColumnOp::Numerical(NumericalOp::FillEmpty(fill)) => {
            numeric_fill(dataset, precisions, column, *fill)
        }
        ColumnOp::Date(DateOp::Reformat(layout)) => reformat_dates(dataset, column, *layout),
        ColumnOp::Date(DateOp::FillEmpty(fill)) => date_fill(dataset, column, *fill),
        ColumnOp::Standardize(map) => standardize(dataset, column, map),
    }
}

/// Normalizes whitespace and underscores in every present cell, then
/// applies the case transform. Missing cells stay missing.
fn format_name_column(
    dataset: &mut Dataset,
    column: &str,
    case: TextCase,
) -> Result<(), EngineError> {
    let column = dataset.column_mut(column)?;
    for cell in &mut column.cells {
        if let Some(text) = cell.take() {
            let normalized = string_ops::normalize_name(&text);
            let cased = string_ops::apply_case(normalized.as_ref(), case).into_owned();
            *cell = if cased.is_empty() { None } else { Some(cased) };
        }
    }
    Ok(())
}

/// Case transform for non-name text columns: classifier-empty cells are
/// treated as the empty string for the duration of the transform, and
/// empty-string results convert back to the missing marker.
fn format_text_column(
    dataset: &mut Dataset,
    column: &str,
    case: TextCase,
) -> Result<(), EngineError> {
    let column = dataset.column_mut(column)?;
    let kind = column.kind;
    for cell in &mut column.cells {
        if classify::is_empty(cell, kind) {
            *cell = None;
            continue;
        }
        if let Some(text) = cell.take() {
            let cased = string_ops::apply_case(&text, case).into_owned();
            *cell = if cased.is_empty() { None } else { Some(cased) };
        }
    }
    Ok(())
}

fn basic_fill(dataset: &mut Dataset, column: &str, fill: BasicFill) -> Result<(), EngineError> {
    match fill.literal() {
        None => drop_empty_rows(dataset, column),
        Some(literal) => {
            let column = dataset.column_mut(column)?;
            let kind = column.kind;
            for cell in &mut column.cells {
                if classify::is_empty(cell, kind) {
                    *cell = Some(literal.to_string());
                }
            }
            Ok(())
        }
    }
}

/// Removes every row whose cell in `column` is empty per the declared
/// kind. Rejected wholesale when no rows would remain.
fn drop_empty_rows(dataset: &mut Dataset, column: &str) -> Result<(), EngineError> {
    let target = dataset.column(column)?;
    let kind = target.kind;
    let keep = target
        .cells
        .iter()
        .map(|cell| !classify::is_empty(cell, kind))
        .collect::<Vec<_>>();
    dataset.retain_rows(&keep)
}

/// Fills empty cells with the most frequent non-empty value; frequency
/// ties resolve to the lexicographically smallest value.
fn fill_mode(dataset: &mut Dataset, column: &str) -> Result<(), EngineError> {
    let target = dataset.column_mut(column)?;
    let kind = target.kind;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for cell in &target.cells {
        if !classify::is_empty(cell, kind)
            && let Some(value) = cell.as_deref()
        {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    let Some((mode, _)) = best else {
        return Err(EngineError::EmptyColumn(column.to_string()));
    };
    let mode = mode.to_string();
    for cell in &mut target.cells {
        if classify::is_empty(cell, kind) {
            *cell = Some(mode.clone());
        }
    }
    Ok(())
}

/// Fills empty cells with the rank-space mean of the non-empty values:
/// distinct values are ranked 1..K in sort order, the mean rank is rounded,
/// and the nearest existing rank decodes back to a category.
fn fill_rank_mean(dataset: &mut Dataset, column: &str) -> Result<(), EngineError> {
    let target = dataset.column(column)?;
    let kind = target.kind;
    let ranks = RankMap::build(&target.cells, kind);
    let encoded = ranks
        .encode(&target.cells, kind)
        .into_iter()
        .flatten()
        .map(|rank| rank as f64)
        .collect::<Vec<_>>();
    let Some(mean_rank) = numeric::mean(&encoded) else {
        return Err(EngineError::EmptyColumn(column.to_string()));
    };
    let fill = ranks
        .decode_nearest(mean_rank)
        .ok_or_else(|| EngineError::EmptyColumn(column.to_string()))?
        .to_string();
    let target = dataset.column_mut(column)?;
    for cell in &mut target.cells {
        if classify::is_empty(cell, kind) {
            *cell = Some(fill.clone());
        }
    }
    Ok(())
}

/// Cleans every present cell to a numeric token, rounds to the requested
/// precision, and records the precision for later aggregate fills. Cells
/// with nothing numeric left become missing.
fn round_column(
    dataset: &mut Dataset,
    precisions: &mut PrecisionTable,
    column: &str,
    precision: RoundPrecision,
) -> Result<(), EngineError> {
    let target = dataset.column_mut(column)?;
    for cell in &mut target.cells {
        let Some(raw) = cell.as_deref() else { continue };
        let parsed = numeric::clean_numeric_token(raw).and_then(|token| token.parse::<f64>().ok());
        *cell = parsed.map(|value| match precision.digits() {
            Some(digits) => numeric::format_value(numeric::round_to(value, digits), Some(digits)),
            None => numeric::format_value(value, None),
        });
    }
    precisions.insert(column.to_string(), precision);
    Ok(())
}

/// Coerces the column to numeric (failures become missing), then resolves
/// empties: either drops their rows or fills them with one aggregate value
/// rounded to the column's recorded precision (two fractional digits when
/// none was recorded).
fn numeric_fill(
    dataset: &mut Dataset,
    precisions: &mut PrecisionTable,
    column: &str,
    fill: NumericFill,
) -> Result<(), EngineError> {
    let target = dataset.column_mut(column)?;
    let mut coerced: Vec<Option<f64>> = Vec::with_capacity(target.cells.len());
    for cell in &target.cells {
        coerced.push(numeric::coerce_numeric(cell));
    }

    if fill == NumericFill::DeleteEmptyRows {
        let keep = coerced.iter().map(Option::is_some).collect::<Vec<_>>();
        // Commit the coercion only after the structural check passes.
        dataset.retain_rows(&keep)?;
        let target = dataset.column_mut(column)?;
        let mut kept = coerced.into_iter().flatten();
        for cell in &mut target.cells {
            *cell = kept.next().map(|value| numeric::format_value(value, None));
        }
        return Ok(());
    }

    let present = coerced.iter().flatten().copied().collect::<Vec<_>>();
    let aggregate = match fill {
        NumericFill::FillMean => numeric::mean(&present),
        NumericFill::FillMedian => numeric::median(&present),
        NumericFill::FillMode => numeric::mode(&present),
        NumericFill::DeleteEmptyRows => unreachable!(),
    };
    let Some(aggregate) = aggregate else {
        return Err(EngineError::EmptyColumn(column.to_string()));
    };

    let (rounded, digits) = match precisions.get(column) {
        Some(precision) => match precision.digits() {
            Some(digits) => (numeric::round_to(aggregate, digits), Some(digits)),
            None => (aggregate, None),
        },
        None => (numeric::round_to(aggregate, 2), Some(2)),
    };
    let fill_value = numeric::format_value(rounded, digits);

    for (cell, value) in target.cells.iter_mut().zip(coerced) {
        *cell = match value {
            Some(value) => Some(numeric::format_value(value, None)),
            None => Some(fill_value.clone()),
        };
    }
    Ok(())
}

/// Rewrites parseable date cells in the target layout; cells that fail the
/// permissive parse are left byte-for-byte unchanged.
fn reformat_dates(dataset: &mut Dataset, column: &str, layout: DateLayout) -> Result<(), EngineError> {
    let target = dataset.column_mut(column)?;
    for cell in &mut target.cells {
        if let Some(raw) = cell.as_deref()
            && let Some(date) = dates::parse_with_layout(raw, layout)
        {
            *cell = Some(layout.format(date));
        }
    }
    Ok(())
}

fn date_fill(dataset: &mut Dataset, column: &str, fill: DateFill) -> Result<(), EngineError> {
    match fill {
        DateFill::DeleteEmptyRows => drop_empty_rows(dataset, column),
        DateFill::FillCurrentDate => {
            let today = dates::today_iso();
            fill_date_empties(dataset, column, &today)
        }
        DateFill::FillNa => fill_date_empties(dataset, column, "N/A"),
    }
}

fn fill_date_empties(dataset: &mut Dataset, column: &str, value: &str) -> Result<(), EngineError> {
    let target = dataset.column_mut(column)?;
    let kind = target.kind;
    for cell in &mut target.cells {
        if classify::is_empty(cell, kind) {
            *cell = Some(value.to_string());
        }
    }
    Ok(())
}

fn standardize(
    dataset: &mut Dataset,
    column: &str,
    map: &BTreeMap<String, String>,
) -> Result<(), EngineError> {
    let target = dataset.column_mut(column)?;
    for cell in &mut target.cells {
        if let Some(current) = cell.as_deref()
            && let Some(replacement) = map.get(current)
        {
            *cell = Some(replacement.clone());
        }
    }
    Ok(())
}
