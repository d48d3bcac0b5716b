//! Feature preprocessing artifacts: min-max scaler and categorical encoders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Min-max scaler exported from the training pipeline.
///
/// `x' = (x - data_min) / (data_max - data_min) * (hi - lo) + lo`, where a
/// zero-width column divides by 1 instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: [f64; 2],
}

fn default_feature_range() -> [f64; 2] {
    [0.0, 1.0]
}

impl MinMaxScaler {
    /// Number of columns the scaler was fit on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.data_min.len()
    }

    /// Check internal consistency.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency.
    pub fn check(&self, expected_features: usize) -> Result<(), String> {
        if self.data_min.len() != expected_features || self.data_max.len() != expected_features {
            return Err(format!(
                "scaler fit on {}/{} columns, expected {expected_features}",
                self.data_min.len(),
                self.data_max.len()
            ));
        }
        let [lo, hi] = self.feature_range;
        if lo >= hi {
            return Err(format!("invalid feature_range [{lo}, {hi}]"));
        }
        if let Some(i) = (0..expected_features).find(|&i| self.data_max[i] < self.data_min[i]) {
            return Err(format!("data_max below data_min in column {i}"));
        }
        Ok(())
    }

    /// Scale one feature vector.
    ///
    /// # Errors
    /// Returns error if the vector length differs from the fitted width.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, String> {
        if features.len() != self.n_features() {
            return Err(format!(
                "Feature count mismatch: got {}, expected {}",
                features.len(),
                self.n_features()
            ));
        }
        let [lo, hi] = self.feature_range;
        Ok(features
            .iter()
            .zip(self.data_min.iter().zip(&self.data_max))
            .map(|(&x, (&min, &max))| {
                let width = max - min;
                let width = if width == 0.0 { 1.0 } else { width };
                (x - min) / width * (hi - lo) + lo
            })
            .collect())
    }
}

/// Per-feature label encoders: the sorted class list seen during training.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoders {
    classes: BTreeMap<String, Vec<String>>,
}

impl LabelEncoders {
    #[must_use]
    pub fn new(classes: BTreeMap<String, Vec<String>>) -> Self {
        Self { classes }
    }

    /// Check that every required feature has a non-empty class list.
    ///
    /// # Errors
    /// Returns the first feature that is missing or empty.
    pub fn check(&self, required: &[&str]) -> Result<(), String> {
        for feature in required {
            match self.classes.get(*feature) {
                Some(classes) if !classes.is_empty() => {}
                Some(_) => return Err(format!("encoder for {feature} has no classes")),
                None => return Err(format!("no encoder for {feature}")),
            }
        }
        Ok(())
    }

    /// Index of `label` in the class list for `feature`.
    ///
    /// Unknown labels, unknown features and absent values all encode to 0.
    #[must_use]
    pub fn encode(&self, feature: &str, label: Option<&str>) -> usize {
        let Some(label) = label else {
            return 0;
        };
        self.classes
            .get(feature)
            .and_then(|classes| classes.iter().position(|c| c == label))
            .unwrap_or_else(|| {
                tracing::debug!(feature, "Unknown category, encoding as 0");
                0
            })
    }
}
