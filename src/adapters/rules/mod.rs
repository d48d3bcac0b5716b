//! Rule adapter: threshold-cascade implementation of `RiskClassifier`.
//!
//! The cascade is an ordered table of `(predicate, outcome)` rows evaluated
//! first-match-wins. Every classification cites exactly one row, or the
//! default when nothing matches.
//!
//! Boundaries follow the screening guidance the table was written from:
//! diabetes requires HbA1c strictly above the cut-off, the prediabetes band
//! is inclusive on both ends, and the BMI bands are half-open. HbA1c values
//! that fall between the prediabetes ceiling and the diabetes cut-off (for
//! example 6.45 or exactly 6.5) match no row and take the default.

use crate::domain::thresholds::RuleThresholds;
use crate::domain::{
    ClassificationResult, ClinicalRecord, DiabetesType, RecommendationCategory, RiskLevel,
    Strategy,
};
use crate::ports::RiskClassifier;
use crate::DiabetesCareError;

use RecommendationCategory::{Dietary, Lifestyle, Medical, Monitoring};

/// Explanation used when no row matches.
pub const DEFAULT_EXPLANATION: &str =
    "Input does not match any specific rule. Defaulting to low risk.";

/// One row of the cascade.
struct Rule {
    id: &'static str,
    matches: fn(&RuleThresholds, &ClinicalRecord) -> bool,
    explain: fn(&RuleThresholds) -> String,
    diabetes_type: DiabetesType,
    risk_level: RiskLevel,
    prediction: u8,
    focus: &'static [RecommendationCategory],
}

const RULES: &[Rule] = &[
    Rule {
        id: "R1",
        matches: |t, r| r.hba1c > t.diabetes_hba1c && r.age < t.young_onset_age,
        explain: |t| {
            format!(
                "Rule R1: Age < {} and HbA1c > {}% suggests Type 1 Diabetes.",
                t.young_onset_age, t.diabetes_hba1c
            )
        },
        diabetes_type: DiabetesType::Type1,
        risk_level: RiskLevel::High,
        prediction: 1,
        focus: &[Medical, Monitoring],
    },
    Rule {
        id: "R2",
        matches: |t, r| r.hba1c > t.diabetes_hba1c && r.age >= t.young_onset_age,
        explain: |t| {
            format!(
                "Rule R2: Age >= {} and HbA1c > {}% suggests Type 2 Diabetes.",
                t.young_onset_age, t.diabetes_hba1c
            )
        },
        diabetes_type: DiabetesType::Type2,
        risk_level: RiskLevel::High,
        prediction: 1,
        focus: &[Medical, Lifestyle, Dietary],
    },
    Rule {
        id: "R3",
        matches: |t, r| t.prediabetes_hba1c_min <= r.hba1c && r.hba1c <= t.prediabetes_hba1c_max,
        explain: |t| {
            format!(
                "Rule R3: HbA1c between {}% and {}% indicates Prediabetes.",
                t.prediabetes_hba1c_min, t.prediabetes_hba1c_max
            )
        },
        diabetes_type: DiabetesType::Prediabetes,
        risk_level: RiskLevel::Moderate,
        prediction: 0,
        focus: &[Lifestyle, Dietary, Medical],
    },
    Rule {
        id: "R4",
        matches: |t, r| {
            r.hba1c < t.prediabetes_hba1c_min && t.overweight_bmi <= r.bmi && r.bmi < t.obese_bmi
        },
        explain: |t| {
            format!(
                "Rule R4: BMI {}-{} and HbA1c < {}% indicates Moderate Risk (Overweight).",
                t.overweight_bmi,
                t.obese_bmi - 0.1,
                t.prediabetes_hba1c_min
            )
        },
        diabetes_type: DiabetesType::NoDiabetes,
        risk_level: RiskLevel::Moderate,
        prediction: 0,
        focus: &[Lifestyle, Dietary],
    },
    Rule {
        id: "R5",
        matches: |t, r| r.hba1c < t.prediabetes_hba1c_min && r.bmi >= t.obese_bmi,
        explain: |t| {
            format!(
                "Rule R5: BMI >= {} and HbA1c < {}% indicates Moderate Risk (Obese).",
                t.obese_bmi, t.prediabetes_hba1c_min
            )
        },
        diabetes_type: DiabetesType::NoDiabetes,
        risk_level: RiskLevel::Moderate,
        prediction: 0,
        focus: &[Lifestyle, Dietary],
    },
    Rule {
        id: "R6",
        matches: |t, r| r.hba1c < t.prediabetes_hba1c_min && r.bmi < t.overweight_bmi,
        explain: |t| {
            format!(
                "Rule R6: BMI < {} and HbA1c < {}% indicates Low Risk.",
                t.overweight_bmi, t.prediabetes_hba1c_min
            )
        },
        diabetes_type: DiabetesType::NoDiabetes,
        risk_level: RiskLevel::Low,
        prediction: 0,
        focus: &[Lifestyle, Dietary],
    },
];

const DEFAULT_FOCUS: &[RecommendationCategory] = &[Lifestyle, Dietary];

/// Deterministic rule-table classifier. Needs no trained artifact.
#[derive(Debug, Clone, Default)]
pub struct RuleStrategy {
    thresholds: RuleThresholds,
}

impl RuleStrategy {
    #[must_use]
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self { thresholds }
    }

    /// Identifier of the row that fires for a record, or `None` for the default.
    #[must_use]
    pub fn matching_rule(&self, record: &ClinicalRecord) -> Option<&'static str> {
        RULES
            .iter()
            .find(|rule| (rule.matches)(&self.thresholds, record))
            .map(|rule| rule.id)
    }

    /// Evaluate the cascade. Total over every record.
    #[must_use]
    pub fn evaluate(&self, record: &ClinicalRecord) -> ClassificationResult {
        let t = &self.thresholds;
        match RULES.iter().find(|rule| (rule.matches)(t, record)) {
            Some(rule) => {
                tracing::debug!(rule = rule.id, "Rule cascade matched");
                ClassificationResult {
                    strategy: Strategy::Rule,
                    prediction: rule.prediction,
                    risk_level: rule.risk_level,
                    diabetes_type: rule.diabetes_type,
                    explanation: vec![(rule.explain)(t)],
                    probability: None,
                    focus: rule.focus.to_vec(),
                }
            }
            None => {
                tracing::debug!("Rule cascade fell through to default");
                ClassificationResult {
                    strategy: Strategy::Rule,
                    prediction: 0,
                    risk_level: RiskLevel::Low,
                    diabetes_type: DiabetesType::NoDiabetes,
                    explanation: vec![DEFAULT_EXPLANATION.to_string()],
                    probability: None,
                    focus: DEFAULT_FOCUS.to_vec(),
                }
            }
        }
    }
}

impl RiskClassifier for RuleStrategy {
    fn strategy(&self) -> Strategy {
        Strategy::Rule
    }

    fn classify(&self, record: &ClinicalRecord) -> Result<ClassificationResult, DiabetesCareError> {
        if !record.has_positive_biometrics() {
            return Err(crate::domain::IntakeError::NotPositive.into());
        }
        Ok(self.evaluate(record))
    }
}
