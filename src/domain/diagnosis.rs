//! Classification result types.
//!
//! Represents the output of either classification strategy.

use serde::{Deserialize, Serialize};

use super::recommendation::RecommendationCategory;

/// Risk level attached to a classification.
///
/// The rule strategy only produces `Low`, `Moderate` and `High`; the model
/// strategy can also produce `VeryLow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Very Low Risk")]
    VeryLow,
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low Risk",
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    /// Human-readable description of the probability band.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => {
                "High probability of diabetes. Immediate medical consultation is strongly recommended."
            }
            Self::Moderate => {
                "Moderate probability of diabetes. Schedule a check-up and consider lifestyle changes."
            }
            Self::Low => {
                "Low probability of diabetes. Maintain healthy habits and routine screening."
            }
            Self::VeryLow => {
                "Very low probability of diabetes. Continue your current healthy lifestyle."
            }
        }
    }

    /// Alert style the band is rendered with.
    #[must_use]
    pub fn alert(&self) -> AlertClass {
        match self {
            Self::High => AlertClass::Danger,
            Self::Moderate => AlertClass::Warning,
            Self::Low => AlertClass::Info,
            Self::VeryLow => AlertClass::Success,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Diabetes type attached to a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiabetesType {
    #[serde(rename = "No Diabetes")]
    NoDiabetes,
    #[serde(rename = "Prediabetes")]
    Prediabetes,
    #[serde(rename = "Type 1 Diabetes")]
    Type1,
    #[serde(rename = "Type 2 Diabetes")]
    Type2,
}

impl DiabetesType {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoDiabetes => "No Diabetes",
            Self::Prediabetes => "Prediabetes",
            Self::Type1 => "Type 1 Diabetes",
            Self::Type2 => "Type 2 Diabetes",
        }
    }
}

impl std::fmt::Display for DiabetesType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation class for a result banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertClass {
    Danger,
    Warning,
    Info,
    Success,
}

/// Which classifier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Rule,
    Model,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rule => write!(f, "rule"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// Output of one classification. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub strategy: Strategy,

    /// Binary prediction (0 = no diabetes, 1 = diabetes)
    pub prediction: u8,

    pub risk_level: RiskLevel,

    pub diabetes_type: DiabetesType,

    /// Ordered rule citations (rule strategy)
    pub explanation: Vec<String>,

    /// P(class = 1) reported by the model (model strategy)
    pub probability: Option<f64>,

    /// Recommendation categories the matched rule emphasizes (rule strategy)
    pub focus: Vec<RecommendationCategory>,
}

impl ClassificationResult {
    /// Whether diabetes was detected.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.prediction == 1
    }

    /// One-line summary for display.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_positive() {
            format!(
                "Diabetes detected. Type: {}. Risk Level: {}.",
                self.diabetes_type, self.risk_level
            )
        } else {
            format!("No diabetes detected. Risk Level: {}.", self.risk_level)
        }
    }

    /// Banner class: the probability band for model results, otherwise
    /// danger/success by prediction.
    #[must_use]
    pub fn alert(&self) -> AlertClass {
        match self.strategy {
            Strategy::Model => self.risk_level.alert(),
            Strategy::Rule if self.is_positive() => AlertClass::Danger,
            Strategy::Rule => AlertClass::Success,
        }
    }
}
