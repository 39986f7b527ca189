//! Model artifact capability and the serialized artifact family shipped with the crate.
//!
//! Every artifact follows one label contract: class `1` means the applicant is eligible,
//! class `0` means high credit risk. Artifacts trained with the opposite encoding must be
//! re-exported before they are served.

mod classifier;
mod preprocessor;

pub use classifier::{Classifier, GaussianNb, LogisticRegression};
pub use preprocessor::{ColumnTransform, TabularPreprocessor};

use serde::{Deserialize, Serialize};

use super::features::FeatureRow;

/// Failure raised by an artifact while scoring a row.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("feature row is missing column '{0}'")]
    MissingColumn(String),
    #[error("column '{column}' is not numeric (found '{found}')")]
    NonNumeric { column: String, found: String },
    #[error("model expects {expected} features, received {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("{0}")]
    Other(String),
}

/// Opaque trained model exposing label and probability inference over a feature row.
pub trait ModelArtifact: Send + Sync {
    /// Raw columns the artifact consumes, in order. `None` accepts the canonical order.
    fn input_columns(&self) -> Option<&[String]> {
        None
    }

    /// Class labels in the order `predict_proba` reports them.
    fn classes(&self) -> &[i64] {
        &[0, 1]
    }

    fn predict(&self, row: &FeatureRow) -> Result<i64, ModelError>;

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError>;
}

/// Preprocessing bundled with its classifier so the transform always runs first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub preprocessor: TabularPreprocessor,
    pub classifier: Classifier,
}

impl PipelineArtifact {
    pub fn new(preprocessor: TabularPreprocessor, classifier: Classifier) -> Self {
        Self {
            preprocessor,
            classifier,
        }
    }

    /// Structural checks run once at load time.
    pub fn check(&self) -> Result<(), String> {
        self.preprocessor.check()?;
        self.preprocessor.check_schema()?;
        self.classifier.check()?;
        let width = self.preprocessor.output_width();
        let expected = self.classifier.n_features();
        if width != expected {
            return Err(format!(
                "preprocessor produces {width} features but classifier expects {expected}"
            ));
        }
        Ok(())
    }
}

impl ModelArtifact for PipelineArtifact {
    fn input_columns(&self) -> Option<&[String]> {
        Some(&self.preprocessor.input_columns)
    }

    fn classes(&self) -> &[i64] {
        self.classifier.classes()
    }

    fn predict(&self, row: &FeatureRow) -> Result<i64, ModelError> {
        let encoded = self.preprocessor.transform(row)?;
        self.classifier.predict(&encoded)
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        let encoded = self.preprocessor.transform(row)?;
        self.classifier.predict_proba(&encoded)
    }
}
