use std::fmt;

use serde::{Serialize, Serializer};

use super::domain::ApplicantRecord;

/// Canonical column order shared by the form, the assembler, and the shipped artifacts.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "Age",
    "StatedMonthlyIncome",
    "LoanAmount",
    "EmploymentStatus",
    "CreditScore",
    "LoanTerm",
    "LoanPurpose",
    "Delinquencies",
];

/// Single cell of the feature table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Integer(value) => Some(*value as f64),
            FeatureValue::Float(value) => Some(*value),
            FeatureValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Integer(value) => write!(f, "{value}"),
            FeatureValue::Float(value) => write!(f, "{value}"),
            FeatureValue::Text(value) => f.write_str(value),
        }
    }
}

/// One-row table of named columns handed to a model artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    pub fn from_columns(columns: Vec<(String, FeatureValue)>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Column construction failure against an artifact's declared schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error("model expects unknown column '{0}'")]
    UnknownColumn(String),
    #[error("model lists column '{0}' more than once")]
    DuplicateColumn(String),
    #[error("model schema omits required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Build the canonical eight-column row for a validated record.
pub fn assemble(record: &ApplicantRecord) -> FeatureRow {
    let values = [
        FeatureValue::Integer(i64::from(record.age())),
        FeatureValue::Float(record.stated_monthly_income()),
        FeatureValue::Float(record.loan_amount()),
        FeatureValue::Text(record.employment_status().label().to_string()),
        FeatureValue::Integer(i64::from(record.credit_score())),
        FeatureValue::Integer(i64::from(record.loan_term().months())),
        FeatureValue::Text(record.loan_purpose().label().to_string()),
        FeatureValue::Integer(i64::from(record.delinquencies())),
    ];

    FeatureRow {
        columns: FEATURE_COLUMNS
            .iter()
            .map(|name| name.to_string())
            .zip(values)
            .collect(),
    }
}

/// Check that an artifact's declared columns are exactly the canonical eight, in any order.
pub fn check_schema(expected: &[String]) -> Result<(), FeatureError> {
    for (position, name) in expected.iter().enumerate() {
        if expected[..position].contains(name) {
            return Err(FeatureError::DuplicateColumn(name.clone()));
        }
        if !FEATURE_COLUMNS.contains(&name.as_str()) {
            return Err(FeatureError::UnknownColumn(name.clone()));
        }
    }

    let missing: Vec<String> = FEATURE_COLUMNS
        .iter()
        .filter(|column| !expected.iter().any(|name| name == *column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(FeatureError::MissingColumns(missing));
    }
    Ok(())
}

/// Build the row in the order an artifact declares. `None` keeps the canonical order.
pub fn assemble_for(
    record: &ApplicantRecord,
    expected: Option<&[String]>,
) -> Result<FeatureRow, FeatureError> {
    let canonical = assemble(record);
    let Some(expected) = expected else {
        return Ok(canonical);
    };
    check_schema(expected)?;

    let columns = expected
        .iter()
        .map(|name| {
            canonical
                .get(name)
                .cloned()
                .map(|value| (name.clone(), value))
                .ok_or_else(|| FeatureError::UnknownColumn(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureRow { columns })
}
