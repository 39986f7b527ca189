use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Gaussian naive Bayes with fitted per-class means and variances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNb {
    pub classes: Vec<i64>,
    pub class_prior: Vec<f64>,
    pub theta: Vec<Vec<f64>>,
    pub var: Vec<Vec<f64>>,
}

impl GaussianNb {
    fn joint_log_likelihood(&self, x: &[f64]) -> Vec<f64> {
        self.class_prior
            .iter()
            .zip(self.theta.iter().zip(&self.var))
            .map(|(prior, (means, variances))| {
                let log_likelihood: f64 = x
                    .iter()
                    .zip(means.iter().zip(variances))
                    .map(|(value, (mean, var))| {
                        -0.5 * (2.0 * PI * var).ln() - (value - mean).powi(2) / (2.0 * var)
                    })
                    .sum();
                prior.ln() + log_likelihood
            })
            .collect()
    }
}

/// Binary logistic regression; the sigmoid output is the probability of `classes[1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub classes: Vec<i64>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// Classifier family accepted by the artifact loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    GaussianNb(GaussianNb),
    LogisticRegression(LogisticRegression),
}

impl Classifier {
    pub fn classes(&self) -> &[i64] {
        match self {
            Classifier::GaussianNb(model) => &model.classes,
            Classifier::LogisticRegression(model) => &model.classes,
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Classifier::GaussianNb(model) => model.theta.first().map_or(0, Vec::len),
            Classifier::LogisticRegression(model) => model.coef.len(),
        }
    }

    pub fn check(&self) -> Result<(), String> {
        match self {
            Classifier::GaussianNb(model) => {
                let n_classes = model.classes.len();
                if n_classes < 2 {
                    return Err(format!("expected at least 2 classes, found {n_classes}"));
                }
                if model.class_prior.len() != n_classes
                    || model.theta.len() != n_classes
                    || model.var.len() != n_classes
                {
                    return Err("class_prior, theta and var must have one entry per class".into());
                }
                let width = self.n_features();
                if model
                    .theta
                    .iter()
                    .chain(&model.var)
                    .any(|row| row.len() != width)
                {
                    return Err("theta and var rows must share one width".into());
                }
                if model.var.iter().flatten().any(|var| !(*var > 0.0)) {
                    return Err("variances must be strictly positive".into());
                }
                if model.class_prior.iter().any(|prior| !(*prior > 0.0)) {
                    return Err("class priors must be strictly positive".into());
                }
                Ok(())
            }
            Classifier::LogisticRegression(model) => {
                if model.classes.len() != 2 {
                    return Err(format!(
                        "logistic regression is binary, found {} classes",
                        model.classes.len()
                    ));
                }
                Ok(())
            }
        }
    }

    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        let expected = self.n_features();
        if x.len() != expected {
            return Err(ModelError::DimensionMismatch {
                expected,
                found: x.len(),
            });
        }

        let probabilities = match self {
            Classifier::GaussianNb(model) => softmax(&model.joint_log_likelihood(x)),
            Classifier::LogisticRegression(model) => {
                let z: f64 = model
                    .coef
                    .iter()
                    .zip(x)
                    .map(|(weight, value)| weight * value)
                    .sum::<f64>()
                    + model.intercept;
                let positive = 1.0 / (1.0 + (-z).exp());
                vec![1.0 - positive, positive]
            }
        };
        Ok(probabilities)
    }

    pub fn predict(&self, x: &[f64]) -> Result<i64, ModelError> {
        let probabilities = self.predict_proba(x)?;
        let best = probabilities
            .iter()
            .enumerate()
            .fold(None::<(usize, f64)>, |best, (index, &p)| match best {
                Some((_, top)) if top >= p => best,
                _ => Some((index, p)),
            })
            .map(|(index, _)| index)
            .ok_or_else(|| ModelError::Other("classifier has no classes".to_string()))?;

        self.classes()
            .get(best)
            .copied()
            .ok_or_else(|| ModelError::Other(format!("no class at index {best}")))
    }
}

fn softmax(log_values: &[f64]) -> Vec<f64> {
    let max = log_values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let log_sum = max + log_values.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
    log_values.iter().map(|v| (v - log_sum).exp()).collect()
}
