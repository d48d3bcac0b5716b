//! Classifier ports: the seams between the application and the two
//! classification strategies, and between the model strategy and the
//! trained estimator it wraps.

use crate::domain::{ClassificationResult, ClinicalRecord, Strategy};
use crate::DiabetesCareError;

/// A diabetes risk classifier.
///
/// Implementations are pure: classifying the same record twice yields the
/// same result, and no state is mutated.
pub trait RiskClassifier: Send + Sync {
    /// Which strategy this classifier implements.
    fn strategy(&self) -> Strategy;

    /// Classify a validated record.
    ///
    /// # Errors
    /// Returns `DiabetesCareError::ComponentUnavailable` when a required
    /// artifact is missing, or `DiabetesCareError::Validation` when the
    /// record lacks a feature the strategy needs.
    fn classify(&self, record: &ClinicalRecord) -> Result<ClassificationResult, DiabetesCareError>;
}

/// A trained binary estimator operating on a scaled feature vector.
pub trait BinaryClassifier: Send + Sync {
    /// Predicted class (0 or 1).
    fn predict(&self, features: &[f64]) -> u8;

    /// `P(class = 1)`, if the estimator exposes probabilities.
    fn predict_proba(&self, features: &[f64]) -> Option<f64>;
}
