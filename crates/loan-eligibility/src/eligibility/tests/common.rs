use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::eligibility::artifact::ModelAvailability;
use crate::eligibility::domain::{ApplicantRecord, ApplicantSubmission};
use crate::eligibility::features::FeatureRow;
use crate::eligibility::model::{
    Classifier, ColumnTransform, LogisticRegression, ModelArtifact, ModelError, PipelineArtifact,
    TabularPreprocessor,
};
use crate::eligibility::service::EligibilityService;

/// Artifact returning a fixed label and probability vector.
pub(super) struct StubModel {
    pub(super) label: i64,
    pub(super) probabilities: Vec<f64>,
    pub(super) columns: Option<Vec<String>>,
}

impl StubModel {
    pub(super) fn returning(label: i64, probabilities: &[f64]) -> Self {
        Self {
            label,
            probabilities: probabilities.to_vec(),
            columns: None,
        }
    }
}

impl ModelArtifact for StubModel {
    fn input_columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    fn predict(&self, _row: &FeatureRow) -> Result<i64, ModelError> {
        Ok(self.label)
    }

    fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        Ok(self.probabilities.clone())
    }
}

/// Artifact whose probability call always errors.
pub(super) struct FailingModel;

impl ModelArtifact for FailingModel {
    fn predict(&self, _row: &FeatureRow) -> Result<i64, ModelError> {
        Ok(1)
    }

    fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        Err(ModelError::Other("estimator not fitted".to_string()))
    }
}

/// Artifact that remembers every row it was asked to score.
#[derive(Default)]
pub(super) struct CapturingModel {
    pub(super) rows: Mutex<Vec<FeatureRow>>,
}

impl ModelArtifact for CapturingModel {
    fn predict(&self, row: &FeatureRow) -> Result<i64, ModelError> {
        self.rows.lock().expect("rows mutex poisoned").push(row.clone());
        Ok(0)
    }

    fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        Ok(vec![0.65, 0.35])
    }
}

/// Reference applicant: form defaults with a 36 month term.
pub(super) fn submission() -> ApplicantSubmission {
    ApplicantSubmission {
        age: Some(30.0),
        stated_monthly_income: Some(5000.0),
        loan_amount: Some(10000.0),
        employment_status: Some("Employed".to_string()),
        credit_score: Some(700.0),
        loan_term: Some(36.0),
        loan_purpose: Some("Debt Consolidation".to_string()),
        delinquencies: Some(0.0),
    }
}

pub(super) fn boundary_submission() -> ApplicantSubmission {
    ApplicantSubmission {
        age: Some(18.0),
        credit_score: Some(300.0),
        delinquencies: Some(20.0),
        loan_amount: Some(50000.0),
        ..submission()
    }
}

pub(super) fn record() -> ApplicantRecord {
    ApplicantRecord::try_from(submission()).expect("reference submission is valid")
}

pub(super) fn service_with<M: ModelArtifact + 'static>(model: M) -> EligibilityService {
    EligibilityService::new(ModelAvailability::ready(Arc::new(model)))
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn scale(column: &str, mean: f64, scale: f64) -> ColumnTransform {
    ColumnTransform::StandardScale {
        column: column.to_string(),
        mean,
        scale,
    }
}

fn one_hot(column: &str, categories: &[&str]) -> ColumnTransform {
    ColumnTransform::OneHot {
        column: column.to_string(),
        categories: strings(categories),
    }
}

/// Logistic pipeline that rewards credit score and penalises delinquencies.
pub(super) fn logistic_pipeline() -> PipelineArtifact {
    let preprocessor = TabularPreprocessor {
        input_columns: strings(&crate::eligibility::features::FEATURE_COLUMNS),
        transforms: vec![
            scale("Age", 40.0, 12.0),
            scale("StatedMonthlyIncome", 6000.0, 3000.0),
            scale("LoanAmount", 15000.0, 9000.0),
            one_hot("EmploymentStatus", &["Employed", "Self-employed", "Unemployed"]),
            scale("CreditScore", 680.0, 60.0),
            one_hot("LoanTerm", &["12", "36", "60"]),
            one_hot(
                "LoanPurpose",
                &[
                    "Business",
                    "Debt Consolidation",
                    "Education",
                    "Home Improvement",
                    "Other",
                ],
            ),
            scale("Delinquencies", 2.0, 3.0),
        ],
    };
    let classifier = Classifier::LogisticRegression(LogisticRegression {
        classes: vec![0, 1],
        coef: vec![
            0.1, 0.6, -0.4, 0.5, 0.2, -1.0, 1.8, 0.2, 0.0, -0.3, 0.1, 0.0, 0.0, 0.0, 0.0, -1.2,
        ],
        intercept: 0.3,
    });
    PipelineArtifact::new(preprocessor, classifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
