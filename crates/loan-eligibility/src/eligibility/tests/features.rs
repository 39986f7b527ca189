use super::common::*;

use crate::eligibility::domain::ApplicantRecord;
use crate::eligibility::features::{
    assemble, assemble_for, check_schema, FeatureError, FeatureValue, FEATURE_COLUMNS,
};

#[test]
fn assembles_eight_named_columns_in_canonical_order() {
    let row = assemble(&record());

    assert_eq!(row.len(), 8);
    assert_eq!(row.column_names().collect::<Vec<_>>(), FEATURE_COLUMNS.to_vec());
    assert_eq!(row.get("Age"), Some(&FeatureValue::Integer(30)));
    assert_eq!(
        row.get("StatedMonthlyIncome"),
        Some(&FeatureValue::Float(5000.0))
    );
    assert_eq!(row.get("LoanAmount"), Some(&FeatureValue::Float(10000.0)));
    assert_eq!(
        row.get("EmploymentStatus"),
        Some(&FeatureValue::Text("Employed".to_string()))
    );
    assert_eq!(row.get("CreditScore"), Some(&FeatureValue::Integer(700)));
    assert_eq!(row.get("LoanTerm"), Some(&FeatureValue::Integer(36)));
    assert_eq!(
        row.get("LoanPurpose"),
        Some(&FeatureValue::Text("Debt Consolidation".to_string()))
    );
    assert_eq!(row.get("Delinquencies"), Some(&FeatureValue::Integer(0)));
}

#[test]
fn reorders_to_artifact_columns() {
    let mut expected: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
    expected.reverse();

    let row =
        assemble_for(&record(), Some(expected.as_slice())).expect("same columns, new order");
    assert_eq!(
        row.column_names().collect::<Vec<_>>(),
        expected.iter().map(String::as_str).collect::<Vec<_>>()
    );
    assert_eq!(row.get("CreditScore"), Some(&FeatureValue::Integer(700)));
}

#[test]
fn unknown_artifact_column_is_reported() {
    let mut expected: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
    expected.push("DebtToIncome".to_string());

    let err = assemble_for(&record(), Some(expected.as_slice())).expect_err("unknown column");
    assert_eq!(err, FeatureError::UnknownColumn("DebtToIncome".to_string()));
}

#[test]
fn artifact_schema_missing_columns_is_reported() {
    let expected: Vec<String> = FEATURE_COLUMNS[..6].iter().map(|c| c.to_string()).collect();

    let err = assemble_for(&record(), Some(expected.as_slice())).expect_err("schema is partial");
    assert_eq!(
        err,
        FeatureError::MissingColumns(vec![
            "LoanPurpose".to_string(),
            "Delinquencies".to_string()
        ])
    );
}

#[test]
fn duplicate_artifact_column_is_reported() {
    let mut expected: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
    expected.push("Age".to_string());

    let err = assemble_for(&record(), Some(expected.as_slice())).expect_err("duplicate column");
    assert_eq!(err, FeatureError::DuplicateColumn("Age".to_string()));
}

#[test]
fn boundary_record_passes_through_unchanged() {
    let record = ApplicantRecord::try_from(boundary_submission()).expect("boundary is valid");
    let row = assemble(&record);

    assert_eq!(row.get("Age"), Some(&FeatureValue::Integer(18)));
    assert_eq!(row.get("CreditScore"), Some(&FeatureValue::Integer(300)));
    assert_eq!(row.get("Delinquencies"), Some(&FeatureValue::Integer(20)));
    assert_eq!(row.get("LoanAmount"), Some(&FeatureValue::Float(50000.0)));
}

#[test]
fn row_serializes_as_column_map() {
    let value = serde_json::to_value(assemble(&record())).expect("row serializes");
    assert_eq!(value["LoanTerm"], serde_json::json!(36));
    assert_eq!(value["EmploymentStatus"], serde_json::json!("Employed"));
}

#[test]
fn schema_check_accepts_any_order_of_the_canonical_columns() {
    let mut expected: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
    expected.rotate_left(3);
    assert_eq!(check_schema(&expected), Ok(()));

    expected.pop();
    assert!(matches!(
        check_schema(&expected),
        Err(FeatureError::MissingColumns(_))
    ));
}
