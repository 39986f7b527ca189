use serde::Serialize;

use super::features::FeatureRow;
use super::model::{ModelArtifact, ModelError};

const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Label and probabilities returned for one feature row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: i64,
    pub probabilities: Vec<f64>,
    pub confidence: f64,
}

/// Any failure while scoring a row. Reported per submission; never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),
    #[error("prediction failed: model returned unknown label {label}")]
    UnknownLabel { label: i64 },
    #[error("prediction failed: expected {expected} probabilities, received {found}")]
    ProbabilityShape { expected: usize, found: usize },
    #[error("prediction failed: probability {value} at index {index} is outside [0, 1]")]
    ProbabilityRange { index: usize, value: f64 },
    #[error("prediction failed: probabilities sum to {sum}, expected 1")]
    ProbabilitySum { sum: f64 },
}

/// Score a row: predict the label, then read its probability as the confidence.
pub fn invoke(model: &dyn ModelArtifact, row: &FeatureRow) -> Result<Prediction, InferenceError> {
    let label = model.predict(row)?;
    let probabilities = model.predict_proba(row)?;
    let classes = model.classes();

    if probabilities.len() != classes.len() {
        return Err(InferenceError::ProbabilityShape {
            expected: classes.len(),
            found: probabilities.len(),
        });
    }
    if let Some((index, &value)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !(p.is_finite() && (0.0..=1.0).contains(*p)))
    {
        return Err(InferenceError::ProbabilityRange { index, value });
    }
    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(InferenceError::ProbabilitySum { sum });
    }

    let index = classes
        .iter()
        .position(|class| *class == label)
        .ok_or(InferenceError::UnknownLabel { label })?;

    Ok(Prediction {
        label,
        confidence: probabilities[index],
        probabilities,
    })
}
