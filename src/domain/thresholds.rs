//! Clinical cut-offs used by intake and both classification strategies.
//!
//! The defaults reproduce the screening thresholds the service has always
//! used. A deployment can override any subset from a JSON file; fields not
//! present in the file keep their default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DiabetesCareError;

/// All tunable thresholds, grouped by the component that reads them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalThresholds {
    pub intake: IntakeLimits,
    pub rules: RuleThresholds,
    pub bands: RiskBands,
    pub typing: TypeHeuristic,
}

/// Accepted ranges for strict intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeLimits {
    pub age_min: f64,
    pub age_max: f64,
    pub bmi_min: f64,
    pub bmi_max: f64,
    pub hba1c_min: f64,
    pub hba1c_max: f64,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            age_min: 18.0,
            age_max: 120.0,
            bmi_min: 15.0,
            bmi_max: 60.0,
            hba1c_min: 3.5,
            hba1c_max: 9.0,
        }
    }
}

/// Cut-offs for the rule cascade.
///
/// Diabetes fires on `hba1c > diabetes_hba1c` (strict); prediabetes on the
/// inclusive band `[prediabetes_hba1c_min, prediabetes_hba1c_max]`; the BMI
/// bands are `[overweight_bmi, obese_bmi)` and `>= obese_bmi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub diabetes_hba1c: f64,
    pub prediabetes_hba1c_min: f64,
    pub prediabetes_hba1c_max: f64,
    pub young_onset_age: f64,
    pub overweight_bmi: f64,
    pub obese_bmi: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            diabetes_hba1c: 6.5,
            prediabetes_hba1c_min: 5.7,
            prediabetes_hba1c_max: 6.4,
            young_onset_age: 30.0,
            overweight_bmi: 25.0,
            obese_bmi: 30.0,
        }
    }
}

/// Lower bounds of the probability bands used by the model strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBands {
    pub high: f64,
    pub moderate: f64,
    pub low: f64,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            high: 0.8,
            moderate: 0.6,
            low: 0.4,
        }
    }
}

/// Cut-offs for deriving a diabetes type from the model probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeHeuristic {
    /// Below this probability the type is always "No Diabetes".
    pub diabetes_probability: f64,
    pub young_onset_age: f64,
    pub mature_onset_age: f64,
    pub overweight_bmi: f64,
    pub diabetes_hba1c: f64,
}

impl Default for TypeHeuristic {
    fn default() -> Self {
        Self {
            diabetes_probability: 0.5,
            young_onset_age: 30.0,
            mature_onset_age: 45.0,
            overweight_bmi: 25.0,
            diabetes_hba1c: 6.5,
        }
    }
}

impl ClinicalThresholds {
    /// Load overrides from a JSON file.
    ///
    /// # Errors
    /// Returns error if the file is unreadable, malformed, or describes
    /// inconsistent cut-offs.
    pub fn from_file(path: &Path) -> Result<Self, DiabetesCareError> {
        let content = std::fs::read_to_string(path)?;
        let thresholds: Self = serde_json::from_str(&content)?;
        thresholds.validate()?;
        tracing::info!("Loaded clinical thresholds from {:?}", path);
        Ok(thresholds)
    }

    /// Check the ordering constraints the classifiers rely on.
    ///
    /// # Errors
    /// Returns `DiabetesCareError::Config` naming the first violated constraint.
    pub fn validate(&self) -> Result<(), DiabetesCareError> {
        let i = &self.intake;
        if !(i.age_min < i.age_max && i.bmi_min < i.bmi_max && i.hba1c_min < i.hba1c_max) {
            return Err(DiabetesCareError::Config(
                "intake limits must satisfy min < max".into(),
            ));
        }
        if !(i.age_min > 0.0 && i.bmi_min > 0.0 && i.hba1c_min > 0.0) {
            return Err(DiabetesCareError::Config(
                "intake minimums must be strictly positive".into(),
            ));
        }

        let r = &self.rules;
        if !(r.prediabetes_hba1c_min <= r.prediabetes_hba1c_max
            && r.prediabetes_hba1c_max <= r.diabetes_hba1c)
        {
            return Err(DiabetesCareError::Config(
                "rule HbA1c cut-offs must be ordered: prediabetes_min <= prediabetes_max <= diabetes"
                    .into(),
            ));
        }
        if r.overweight_bmi >= r.obese_bmi {
            return Err(DiabetesCareError::Config(
                "overweight_bmi must be below obese_bmi".into(),
            ));
        }

        let b = &self.bands;
        if !(0.0 <= b.low && b.low <= b.moderate && b.moderate <= b.high && b.high <= 1.0) {
            return Err(DiabetesCareError::Config(
                "risk bands must satisfy 0 <= low <= moderate <= high <= 1".into(),
            ));
        }

        let t = &self.typing;
        if !(0.0..=1.0).contains(&t.diabetes_probability) {
            return Err(DiabetesCareError::Config(
                "typing.diabetes_probability must be within [0, 1]".into(),
            ));
        }

        Ok(())
    }
}
