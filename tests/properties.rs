//! Property tests for the classifier, the rank codec, and date layouts.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use proptest::prelude::*;

use csv_refine::classify::{self, ColumnKind, NA_SENTINEL};
use csv_refine::dataset::{Column, Dataset};
use csv_refine::rank::RankMap;
use csv_refine::transform::{
    self, CategoricalOp, ColumnOp, ColumnRequest, DateLayout, PrecisionTable,
};

fn arb_cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        2 => Just(None),
        1 => Just(Some(NA_SENTINEL.to_string())),
        4 => "[a-zA-Z0-9 ]{0,8}".prop_map(|s| if s.is_empty() { None } else { Some(s) }),
    ]
}

fn arb_kind() -> impl Strategy<Value = ColumnKind> {
    prop_oneof![
        Just(ColumnKind::NonCategorical),
        Just(ColumnKind::Categorical),
        Just(ColumnKind::Numerical),
        Just(ColumnKind::Date),
    ]
}

proptest! {
    #[test]
    fn emptiness_matches_the_declared_rule(cell in arb_cell(), kind in arb_kind()) {
        let expected = match &cell {
            None => true,
            Some(text) => kind == ColumnKind::Categorical && text == NA_SENTINEL,
        };
        prop_assert_eq!(classify::is_empty(&cell, kind), expected);
    }

    #[test]
    fn rank_mean_fill_never_invents_a_category(
        cells in prop::collection::vec(arb_cell(), 1..24),
    ) {
        let distinct: BTreeSet<String> = cells
            .iter()
            .filter(|cell| !classify::is_empty(cell, ColumnKind::Categorical))
            .flatten()
            .cloned()
            .collect();

        let mut dataset = match Dataset::from_columns(vec![Column::with_kind(
            "c",
            ColumnKind::Categorical,
            cells.clone(),
        )]) {
            Ok(dataset) => dataset,
            Err(_) => return Ok(()),
        };
        let mut precisions = PrecisionTable::new();
        let report = transform::apply_requests(
            &mut dataset,
            &mut precisions,
            &[ColumnRequest {
                column: "c".to_string(),
                op: ColumnOp::Categorical(CategoricalOp::FillMean),
            }],
        );

        if distinct.is_empty() {
            prop_assert!(!report.is_clean());
        } else {
            prop_assert!(report.is_clean());
            for cell in &dataset.column("c").unwrap().cells {
                let value = cell.as_deref().expect("no empties remain");
                prop_assert!(distinct.contains(value));
            }
        }
    }

    #[test]
    fn decode_nearest_always_returns_a_known_value(
        values in prop::collection::btree_set("[a-z]{1,6}", 1..12),
        rank in -5.0f64..20.0,
    ) {
        let cells: Vec<Option<String>> = values.iter().cloned().map(Some).collect();
        let map = RankMap::build(&cells, ColumnKind::Categorical);
        let decoded = map.decode_nearest(rank).expect("non-empty map");
        prop_assert!(values.contains(decoded));
    }

    #[test]
    fn reformatting_a_formatted_date_is_stable(
        year in 1950i32..2050,
        month in 1u32..=12,
        day in 1u32..=28,
        layout in prop_oneof![
            Just(DateLayout::DayMonthYearSlash),
            Just(DateLayout::MonthDayYearSlash),
            Just(DateLayout::YearMonthDaySlash),
            Just(DateLayout::DayMonthYearDash),
            Just(DateLayout::MonthDayYearDash),
            Just(DateLayout::YearMonthDayDash),
        ],
    ) {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let rendered = layout.format(date);
        let reparsed =
            transform::dates::parse_with_layout(&rendered, layout).expect("formatted date parses");
        prop_assert_eq!(layout.format(reparsed), rendered);
    }
}
