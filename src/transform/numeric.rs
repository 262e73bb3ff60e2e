//! Numeric token cleaning, coercion, and precision-aware rounding.
//!
//! Raw numeric cells arrive with units, thousand separators, and other
//! noise (`"30kg"`, `"1.234.5"`, `"--7"`). Cleaning strips everything that
//! is not a digit, a decimal point, or a minus sign, keeps only the first
//! fractional segment when several decimal points survive, and collapses
//! repeated minus signs to a single leading one. Whatever still fails to
//! parse as a float is treated as missing rather than an error.

use serde::{Deserialize, Serialize};

use crate::dataset::Cell;

/// Display precision chosen for a numerical column. Recorded per column so
/// later aggregate fills round consistently with the column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundPrecision {
    Keep,
    Whole,
    Tenths,
    Hundredths,
    Thousandths,
    TenThousandths,
}

impl RoundPrecision {
    /// Number of fractional digits to keep, or `None` for `keep`.
    pub fn digits(&self) -> Option<u32> {
        match self {
            RoundPrecision::Keep => None,
            RoundPrecision::Whole => Some(0),
            RoundPrecision::Tenths => Some(1),
            RoundPrecision::Hundredths => Some(2),
            RoundPrecision::Thousandths => Some(3),
            RoundPrecision::TenThousandths => Some(4),
        }
    }
}

/// Strips a raw cell down to a parseable numeric token. Returns `None`
/// when nothing numeric survives.
pub fn clean_numeric_token(raw: &str) -> Option<String> {
    let mut filtered: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();

    if filtered.matches('.').count() > 1 {
        let mut segments = filtered.split('.');
        let whole = segments.next().unwrap_or("");
        let fraction = segments.next().unwrap_or("");
        filtered = format!("{whole}.{fraction}");
    }

    if filtered.matches('-').count() > 1 {
        filtered = format!("-{}", filtered.replace('-', ""));
    }

    if filtered.is_empty() {
        None
    } else {
        Some(filtered)
    }
}

/// Cleans and parses a cell as a float; anything non-numeric becomes missing.
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    cell.as_deref()
        .and_then(clean_numeric_token)
        .and_then(|token| token.parse::<f64>().ok())
}

/// Rounds half away from zero to the given number of fractional digits.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Formats a value with a fixed number of fractional digits, or minimally
/// (whole values without a trailing `.0`) when `digits` is `None`.
pub fn format_value(value: f64, digits: Option<u32>) -> String {
    match digits {
        Some(d) => format!("{value:.precision$}", precision = d as usize),
        None => {
            if value.fract() == 0.0 {
                format!("{value:.0}")
            } else {
                value.to_string()
            }
        }
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent value; ties resolve to the smallest.
pub fn mode(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut best = sorted[0];
    let mut best_run = 0usize;
    let mut current = sorted[0];
    let mut run = 0usize;
    for &value in &sorted {
        if value == current {
            run += 1;
        } else {
            current = value;
            run = 1;
        }
        if run > best_run {
            best_run = run;
            best = current;
        }
    }
    Some(best)
}
