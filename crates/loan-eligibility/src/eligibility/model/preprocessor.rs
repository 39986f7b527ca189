use serde::{Deserialize, Serialize};

use super::ModelError;
use crate::eligibility::features::{check_schema, FeatureRow, FeatureValue};

/// Per-column encoding step, applied in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransform {
    StandardScale {
        column: String,
        mean: f64,
        scale: f64,
    },
    Passthrough {
        column: String,
    },
    OneHot {
        column: String,
        categories: Vec<String>,
    },
}

impl ColumnTransform {
    pub fn column(&self) -> &str {
        match self {
            ColumnTransform::StandardScale { column, .. }
            | ColumnTransform::Passthrough { column }
            | ColumnTransform::OneHot { column, .. } => column,
        }
    }

    fn width(&self) -> usize {
        match self {
            ColumnTransform::StandardScale { .. } | ColumnTransform::Passthrough { .. } => 1,
            ColumnTransform::OneHot { categories, .. } => categories.len(),
        }
    }

    fn apply(&self, value: &FeatureValue, out: &mut Vec<f64>) -> Result<(), ModelError> {
        match self {
            ColumnTransform::StandardScale {
                column,
                mean,
                scale,
            } => {
                let x = numeric(column, value)?;
                // A zero scale comes from a constant training column.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                out.push((x - mean) / scale);
            }
            ColumnTransform::Passthrough { column } => out.push(numeric(column, value)?),
            ColumnTransform::OneHot { categories, .. } => {
                let key = value.to_string();
                // Unknown categories encode as all zeros.
                out.extend(
                    categories
                        .iter()
                        .map(|category| if *category == key { 1.0 } else { 0.0 }),
                );
            }
        }
        Ok(())
    }
}

fn numeric(column: &str, value: &FeatureValue) -> Result<f64, ModelError> {
    value.as_f64().ok_or_else(|| ModelError::NonNumeric {
        column: column.to_string(),
        found: value.to_string(),
    })
}

/// Fitted column transformer turning raw applicant columns into a numeric vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularPreprocessor {
    pub input_columns: Vec<String>,
    pub transforms: Vec<ColumnTransform>,
}

impl TabularPreprocessor {
    pub fn output_width(&self) -> usize {
        self.transforms.iter().map(ColumnTransform::width).sum()
    }

    pub fn check(&self) -> Result<(), String> {
        match self
            .transforms
            .iter()
            .find(|transform| !self.input_columns.iter().any(|c| c == transform.column()))
        {
            Some(transform) => Err(format!(
                "transform references undeclared column '{}'",
                transform.column()
            )),
            None => Ok(()),
        }
    }

    /// Declared input columns must be the applicant columns the assembler produces.
    pub fn check_schema(&self) -> Result<(), String> {
        check_schema(&self.input_columns).map_err(|err| err.to_string())
    }

    pub fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        let mut encoded = Vec::with_capacity(self.output_width());
        for transform in &self.transforms {
            let value = row
                .get(transform.column())
                .ok_or_else(|| ModelError::MissingColumn(transform.column().to_string()))?;
            transform.apply(value, &mut encoded)?;
        }
        Ok(encoded)
    }
}
