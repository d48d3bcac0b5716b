//! Linear estimators exported from the training pipeline.

use serde::{Deserialize, Serialize};

use crate::ports::BinaryClassifier;

/// Estimator family. Decides whether probabilities are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearKind {
    /// Sigmoid of the decision function.
    LogisticRegression,
    /// Margin classifier without a calibrated probability.
    LinearSvm,
}

/// `decision = coefficients · x + intercept`; class 1 when `decision > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub kind: LinearKind,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearClassifier {
    /// Check that the estimator matches the feature width.
    ///
    /// # Errors
    /// Returns a description of the mismatch.
    pub fn check(&self, expected_features: usize) -> Result<(), String> {
        if self.coefficients.len() != expected_features {
            return Err(format!(
                "model has {} coefficients, expected {expected_features}",
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("model parameters must be finite".into());
        }
        Ok(())
    }

    fn decision(&self, features: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl BinaryClassifier for LinearClassifier {
    fn predict(&self, features: &[f64]) -> u8 {
        u8::from(self.decision(features) > 0.0)
    }

    fn predict_proba(&self, features: &[f64]) -> Option<f64> {
        match self.kind {
            LinearKind::LogisticRegression => Some(sigmoid(self.decision(features))),
            LinearKind::LinearSvm => None,
        }
    }
}
