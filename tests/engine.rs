//! End-to-end engine scenarios driven through the session API.

use std::collections::BTreeMap;

use csv_refine::classify::ColumnKind;
use csv_refine::error::EngineError;
use csv_refine::session::DatasetSession;
use csv_refine::transform::{
    BasicFill, CategoricalOp, ColumnOp, ColumnRequest, DateLayout, DateOp, NameOp, NumericFill,
    NumericalOp, RoundPrecision, TextCase,
};

fn request(column: &str, op: ColumnOp) -> ColumnRequest {
    ColumnRequest {
        column: column.to_string(),
        op,
    }
}

fn column_texts(session: &DatasetSession, column: &str) -> Vec<Option<String>> {
    session
        .current()
        .unwrap()
        .column(column)
        .unwrap()
        .cells
        .clone()
}

#[test]
fn age_column_cleans_rounds_and_fills() {
    let mut session = DatasetSession::new();
    session
        .load(b"Age\n25\n30kg\n\n40.5.5\n")
        .unwrap();
    session
        .classify(&[("Age".to_string(), ColumnKind::Numerical)])
        .unwrap();

    let report = session
        .apply(&[request(
            "Age",
            ColumnOp::Numerical(NumericalOp::Round(RoundPrecision::Whole)),
        )])
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(
        column_texts(&session, "Age"),
        vec![
            Some("25".to_string()),
            Some("30".to_string()),
            None,
            Some("41".to_string())
        ]
    );
    assert_eq!(session.precision_for("Age"), Some(RoundPrecision::Whole));

    // The fill honors the precision recorded by the rounding step.
    let report = session
        .apply(&[request(
            "Age",
            ColumnOp::Numerical(NumericalOp::FillEmpty(NumericFill::FillMean)),
        )])
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(
        column_texts(&session, "Age"),
        vec![
            Some("25".to_string()),
            Some("30".to_string()),
            Some("32".to_string()),
            Some("41".to_string())
        ]
    );
}

#[test]
fn categorical_sentinel_is_reported_empty_and_mode_filled() {
    let mut session = DatasetSession::new();
    session
        .load(b"Category\nRed\nred\n<NA>\nBlue\n")
        .unwrap();
    session
        .classify(&[("Category".to_string(), ColumnKind::Categorical)])
        .unwrap();
    assert_eq!(session.columns_with_empty().unwrap(), vec!["Category"]);

    let report = session
        .apply(&[request(
            "Category",
            ColumnOp::Categorical(CategoricalOp::FillMode),
        )])
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(
        column_texts(&session, "Category"),
        vec![
            Some("Red".to_string()),
            Some("red".to_string()),
            Some("Blue".to_string()),
            Some("Blue".to_string())
        ]
    );
    assert!(session.columns_with_empty().unwrap().is_empty());
}

#[test]
fn deleting_the_last_column_is_rejected() {
    let mut session = DatasetSession::new();
    session.load(b"a,b,c\n1,2,3\n").unwrap();

    session
        .delete_columns(&["a".to_string(), "b".to_string()])
        .unwrap();
    assert_eq!(session.current().unwrap().column_names(), vec!["c"]);

    let err = session.delete_columns(&["c".to_string()]).unwrap_err();
    assert!(matches!(err, EngineError::StructuralViolation(_)));
    assert_eq!(session.current().unwrap().column_count(), 1);
    assert_eq!(session.current().unwrap().row_count(), 1);
}

#[test]
fn mixed_batch_applies_good_columns_and_reports_bad_ones() {
    let mut session = DatasetSession::new();
    session
        .load(b"name,joined,status\nmary_jane,2024-05-06,active\npeter,,inactive\n")
        .unwrap();
    session
        .classify(&[
            ("joined".to_string(), ColumnKind::Date),
            ("status".to_string(), ColumnKind::Categorical),
        ])
        .unwrap();

    let mut merges = BTreeMap::new();
    merges.insert("inactive".to_string(), "dormant".to_string());

    let report = session
        .apply(&[
            request("name", ColumnOp::Name(NameOp::Format(TextCase::TitleCase))),
            request(
                "joined",
                ColumnOp::Date(DateOp::Reformat(DateLayout::DayMonthYearSlash)),
            ),
            request("missing", ColumnOp::Standardize(BTreeMap::new())),
            request("status", ColumnOp::Standardize(merges)),
        ])
        .unwrap();

    assert_eq!(report.applied, vec!["name", "joined", "status"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].column, "missing");

    assert_eq!(
        column_texts(&session, "name"),
        vec![Some("Mary Jane".to_string()), Some("Peter".to_string())]
    );
    assert_eq!(
        column_texts(&session, "joined"),
        vec![Some("06/05/2024".to_string()), None]
    );
    assert_eq!(
        column_texts(&session, "status"),
        vec![Some("active".to_string()), Some("dormant".to_string())]
    );
}

#[test]
fn drop_rows_uses_type_aware_emptiness() {
    let mut session = DatasetSession::new();
    session
        .load(b"Category,score\nRed,1\n<NA>,2\nBlue,3\n")
        .unwrap();
    session
        .classify(&[("Category".to_string(), ColumnKind::Categorical)])
        .unwrap();

    let report = session
        .apply(&[request(
            "Category",
            ColumnOp::Categorical(CategoricalOp::FillEmpty(BasicFill::DeleteEmptyRows)),
        )])
        .unwrap();
    assert!(report.is_clean());
    assert_eq!(session.current().unwrap().row_count(), 2);
    assert_eq!(
        column_texts(&session, "score"),
        vec![Some("1".to_string()), Some("3".to_string())]
    );
}

#[test]
fn reformatting_into_the_current_pattern_is_byte_identical() {
    let mut session = DatasetSession::new();
    let input = b"when\n06/05/2024\n31/12/1999\n";
    session.load(input).unwrap();
    session
        .classify(&[("when".to_string(), ColumnKind::Date)])
        .unwrap();

    session
        .apply(&[request(
            "when",
            ColumnOp::Date(DateOp::Reformat(DateLayout::DayMonthYearSlash)),
        )])
        .unwrap();
    let bytes = session.download().unwrap();
    assert_eq!(bytes, input);
}

#[test]
fn median_fill_coerces_non_numeric_cells_first() {
    let mut session = DatasetSession::new();
    session
        .load(b"weight\n10\nheavy\n30\n\n20\n")
        .unwrap();
    session
        .classify(&[("weight".to_string(), ColumnKind::Numerical)])
        .unwrap();

    let report = session
        .apply(&[request(
            "weight",
            ColumnOp::Numerical(NumericalOp::FillEmpty(NumericFill::FillMedian)),
        )])
        .unwrap();
    assert!(report.is_clean());
    // "heavy" coerces to missing and gets the median of [10, 30, 20],
    // rounded to the default two fractional digits.
    assert_eq!(
        column_texts(&session, "weight"),
        vec![
            Some("10".to_string()),
            Some("20.00".to_string()),
            Some("30".to_string()),
            Some("20.00".to_string()),
            Some("20".to_string())
        ]
    );
}
