use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::artifact::{ArtifactError, ModelAvailability};
use super::domain::{ApplicantRecord, ApplicantSubmission};
use super::features::{assemble_for, FeatureError};
use super::form::ValidationError;
use super::inference::{invoke, InferenceError};
use super::render::EligibilityReport;

/// Per-submission lifecycle. `Error` is terminal and discards the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStage {
    Idle,
    Collecting,
    Assembling,
    Invoking,
    Rendered,
    Error,
}

impl SubmissionStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Assembling => "assembling",
            Self::Invoking => "invoking",
            Self::Rendered => "rendered",
            Self::Error => "error",
        }
    }
}

/// Failure produced while handling one submission.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("model unavailable: {reason}")]
    ModelUnavailable { reason: String },
    #[error("{source}")]
    Prediction {
        stage: SubmissionStage,
        source: InferenceError,
    },
    #[error("prediction failed: {source}")]
    Schema {
        stage: SubmissionStage,
        source: FeatureError,
    },
}

impl EligibilityError {
    /// Last stage reached before the submission moved to `Error`.
    pub fn stage(&self) -> SubmissionStage {
        match self {
            EligibilityError::Validation(_) | EligibilityError::ModelUnavailable { .. } => {
                SubmissionStage::Collecting
            }
            EligibilityError::Prediction { stage, .. } | EligibilityError::Schema { stage, .. } => {
                *stage
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelStatusView {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request handler owning the loaded artifact for the life of the process.
#[derive(Debug, Clone)]
pub struct EligibilityService {
    model: ModelAvailability,
}

impl EligibilityService {
    pub fn new(model: ModelAvailability) -> Self {
        Self { model }
    }

    pub fn model_status(&self) -> ModelStatusView {
        match &self.model {
            ModelAvailability::Ready(_) => ModelStatusView {
                status: "available",
                error: None,
            },
            ModelAvailability::Unavailable(err) => ModelStatusView {
                status: "unavailable",
                error: Some(err.to_string()),
            },
        }
    }

    pub fn load_error(&self) -> Option<&ArtifactError> {
        match &self.model {
            ModelAvailability::Ready(_) => None,
            ModelAvailability::Unavailable(err) => Some(err),
        }
    }

    /// Validate, assemble, score, and render a single submission.
    pub fn evaluate(
        &self,
        submission: ApplicantSubmission,
    ) -> Result<EligibilityReport, EligibilityError> {
        let result = self.run(submission);
        match &result {
            Ok(report) => info!(
                verdict = ?report.verdict,
                confidence = %report.confidence_display,
                "submission rendered"
            ),
            Err(err) => warn!(
                stage = err.stage().label(),
                error = %err,
                "submission rejected"
            ),
        }
        result
    }

    fn run(&self, submission: ApplicantSubmission) -> Result<EligibilityReport, EligibilityError> {
        debug!(stage = SubmissionStage::Idle.label(), "submission received");
        debug!(stage = SubmissionStage::Collecting.label(), "submission stage");
        let record = ApplicantRecord::try_from(submission)?;

        let model = match &self.model {
            ModelAvailability::Ready(model) => model,
            ModelAvailability::Unavailable(err) => {
                return Err(EligibilityError::ModelUnavailable {
                    reason: err.to_string(),
                })
            }
        };

        debug!(stage = SubmissionStage::Assembling.label(), "submission stage");
        let row = assemble_for(&record, model.input_columns()).map_err(|source| {
            EligibilityError::Schema {
                stage: SubmissionStage::Assembling,
                source,
            }
        })?;

        debug!(
            stage = SubmissionStage::Invoking.label(),
            columns = row.len(),
            "submission stage"
        );
        let to_error = |source| EligibilityError::Prediction {
            stage: SubmissionStage::Invoking,
            source,
        };
        let prediction = invoke(model.as_ref(), &row).map_err(to_error)?;
        let report = EligibilityReport::build(&record, prediction, Utc::now()).map_err(to_error)?;

        debug!(stage = SubmissionStage::Rendered.label(), "submission stage");
        Ok(report)
    }
}
