//! Permissive date parsing and the supported target layouts.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Target layout for a date-reformat operation: day/month/year order with
/// slash or dash separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateLayout {
    #[serde(rename = "dd/mm/yyyy")]
    DayMonthYearSlash,
    #[serde(rename = "mm/dd/yyyy")]
    MonthDayYearSlash,
    #[serde(rename = "yyyy/mm/dd")]
    YearMonthDaySlash,
    #[serde(rename = "dd-mm-yyyy")]
    DayMonthYearDash,
    #[serde(rename = "mm-dd-yyyy")]
    MonthDayYearDash,
    #[serde(rename = "yyyy-mm-dd")]
    YearMonthDayDash,
}

impl DateLayout {
    pub fn pattern(&self) -> &'static str {
        match self {
            DateLayout::DayMonthYearSlash => "%d/%m/%Y",
            DateLayout::MonthDayYearSlash => "%m/%d/%Y",
            DateLayout::YearMonthDaySlash => "%Y/%m/%d",
            DateLayout::DayMonthYearDash => "%d-%m-%Y",
            DateLayout::MonthDayYearDash => "%m-%d-%Y",
            DateLayout::YearMonthDayDash => "%Y-%m-%d",
        }
    }

    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

/// Attempts to parse a cell as a date, accepting mixed source layouts.
/// ISO order is tried first, then day-first slash/dash forms, then
/// month-first forms.
pub fn parse_flexible(value: &str) -> Option<NaiveDate> {
    const SOURCE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%d-%m-%Y",
        "%m/%d/%Y",
        "%m-%d-%Y",
        "%Y-%m-%d %H:%M:%S",
        "%d %b %Y",
        "%b %d, %Y",
    ];
    let trimmed = value.trim();
    for fmt in SOURCE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(parsed);
        }
    }
    None
}

/// Parse used by reformat operations: the target layout's own pattern is
/// tried first so that values already in that pattern round-trip
/// byte-identically, then the flexible list.
pub fn parse_with_layout(value: &str, layout: DateLayout) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), layout.pattern())
        .ok()
        .or_else(|| parse_flexible(value))
}

/// Today's local date in `YYYY-MM-DD` form, used by `fill-current-date`.
pub fn today_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
