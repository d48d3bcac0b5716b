//! Assessment service: intake, classification and recommendations.
//!
//! This service coordinates:
//! - Intake validation under the configured policy
//! - Classification with the requested strategy
//! - Recommendation generation
//! - Report export
//!
//! Nothing is persisted; every call is independent.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::adapters::model::{ArtifactReport, BundleStatus, ModelStrategy, TrainedModelBundle};
use crate::adapters::report::{self, ReportRequest};
use crate::adapters::rules::RuleStrategy;
use crate::domain::{
    ClassificationResult, ClinicalRecord, ClinicalThresholds, EducationalContent, FieldSet,
    IntakeError, IntakePolicy, IntakeValidator, RawIntake, RecommendationSet, Strategy,
};
use crate::ports::RiskClassifier;
use crate::DiabetesCareError;

/// Outcome of one screening request.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub record: ClinicalRecord,
    pub result: ClassificationResult,
    pub recommendations: RecommendationSet,
    pub assessed_at: DateTime<Local>,
}

/// A rendered CSV attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub file_name: String,
    pub content: String,
}

/// Service for running screenings. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AssessmentService {
    validator: IntakeValidator,
    rules: RuleStrategy,
    model: ModelStrategy,
}

impl AssessmentService {
    #[must_use]
    pub fn new(validator: IntakeValidator, rules: RuleStrategy, model: ModelStrategy) -> Self {
        Self {
            validator,
            rules,
            model,
        }
    }

    /// Wire both strategies from one threshold set.
    #[must_use]
    pub fn from_thresholds(
        thresholds: &ClinicalThresholds,
        policy: IntakePolicy,
        bundle: Arc<TrainedModelBundle>,
    ) -> Self {
        Self::new(
            IntakeValidator::new(policy, thresholds.intake.clone()),
            RuleStrategy::new(thresholds.rules.clone()),
            ModelStrategy::new(bundle, thresholds.bands.clone(), thresholds.typing.clone()),
        )
    }

    #[must_use]
    pub fn policy(&self) -> IntakePolicy {
        self.validator.policy()
    }

    fn classifier(&self, strategy: Strategy) -> &dyn RiskClassifier {
        match strategy {
            Strategy::Rule => &self.rules,
            Strategy::Model => &self.model,
        }
    }

    /// Screen one request.
    ///
    /// The rule strategy needs the three biometrics; the model strategy
    /// needs every field.
    ///
    /// # Errors
    /// `Validation` when intake fails, `ComponentUnavailable` when the
    /// model bundle is incomplete.
    pub fn assess(&self, strategy: Strategy, raw: &RawIntake) -> Result<Assessment, DiabetesCareError> {
        let fields = match strategy {
            Strategy::Rule => FieldSet::Biometrics,
            Strategy::Model => FieldSet::Full,
        };

        let record = self.validator.validate(raw, fields).map_err(|e| {
            tracing::info!("{}", rejection_log(strategy, &e));
            e
        })?;

        let classifier = self.classifier(strategy);
        let result = classifier.classify(&record)?;
        let recommendations = RecommendationSet::generate(result.prediction, result.diabetes_type);

        tracing::info!(
            "Assessment complete: strategy={}, prediction={}, risk={}, type={}",
            classifier.strategy(),
            result.prediction,
            result.risk_level,
            result.diabetes_type
        );

        Ok(Assessment {
            record,
            result,
            recommendations,
            assessed_at: Local::now(),
        })
    }

    /// Educational content for a diabetes type label.
    #[must_use]
    pub fn education(&self, diabetes_type: &str) -> EducationalContent {
        EducationalContent::for_diabetes_type(diabetes_type)
    }

    #[must_use]
    pub fn model_status(&self) -> BundleStatus {
        self.model.bundle().status()
    }

    /// Directory the model bundle was loaded from.
    #[must_use]
    pub fn model_dir(&self) -> Option<&Path> {
        self.model.bundle().dir()
    }

    #[must_use]
    pub fn model_artifacts(&self) -> &[ArtifactReport] {
        self.model.bundle().reports()
    }

    /// Render an export request to CSV.
    #[must_use]
    pub fn export_report(&self, request: &ReportRequest) -> ExportedReport {
        let now = Local::now().naive_local();
        let exported = ExportedReport {
            file_name: report::file_name(request, now),
            content: report::render(request, now),
        };
        tracing::info!(
            "Exported report {} ({} bytes)",
            exported.file_name,
            exported.content.len()
        );
        exported
    }
}

/// Log line for a rejected intake. Names the field and failure kind only;
/// the submitted value stays out of the log.
fn rejection_log(strategy: Strategy, e: &IntakeError) -> String {
    format!(
        "Intake rejected: strategy={strategy}, field={}, reason={}",
        e.field().unwrap_or("body"),
        e.kind()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::model::{Artifact, BundleComponent};
    use crate::adapters::sanitize::sanitize;
    use crate::domain::{DiabetesType, RiskLevel};
    use serde_json::json;

    fn service(policy: IntakePolicy) -> AssessmentService {
        let bundle = TrainedModelBundle::from_parts(
            Artifact::Unavailable("model.json not found".into()),
            Artifact::Unavailable("scaler.json not found".into()),
            Artifact::Unavailable("label_encoders.json not found".into()),
            Artifact::Unavailable("feature_names.json not found".into()),
        );
        AssessmentService::from_thresholds(&ClinicalThresholds::default(), policy, Arc::new(bundle))
    }

    fn raw(value: serde_json::Value) -> RawIntake {
        RawIntake::from_json_bytes(value.to_string().as_bytes()).expect("object body")
    }

    #[test]
    fn test_rule_assessment() {
        let a = service(IntakePolicy::Strict)
            .assess(Strategy::Rule, &raw(json!({"Age": "45", "BMI": 32.0, "HbA1c": "7.2"})))
            .expect("assess");
        assert_eq!(a.result.prediction, 1);
        assert_eq!(a.result.diabetes_type, DiabetesType::Type2);
        assert_eq!(a.result.risk_level, RiskLevel::High);
        assert!(!a.recommendations.immediate.is_empty());
        assert!((a.record.age - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validation_short_circuits() {
        let err = service(IntakePolicy::Strict)
            .assess(Strategy::Rule, &raw(json!({"Age": "abc", "BMI": 22, "HbA1c": 5})))
            .expect_err("non-numeric age");
        assert!(matches!(
            err,
            DiabetesCareError::Validation(IntakeError::NotNumeric { field: "Age", .. })
        ));

        let err = service(IntakePolicy::Lenient)
            .assess(Strategy::Rule, &raw(json!({"Age": "abc", "BMI": 22, "HbA1c": 5})))
            .expect_err("zero age");
        assert!(matches!(err, DiabetesCareError::Validation(IntakeError::NotPositive)));
    }

    #[test]
    fn test_rejection_log_omits_submitted_values() {
        let svc = service(IntakePolicy::Strict);
        let cases = [
            (Strategy::Rule, json!({"Age": 150, "BMI": 22, "HbA1c": 5.0}), "150", "field=Age, reason=out_of_range"),
            (Strategy::Rule, json!({"Age": 40, "BMI": 22, "HbA1c": 9.7}), "9.7", "field=HbA1c, reason=out_of_range"),
            (Strategy::Rule, json!({"Age": 40, "BMI": "heavy", "HbA1c": 5.0}), "heavy", "field=BMI, reason=not_numeric"),
            (
                Strategy::Model,
                json!({
                    "Age": 40, "BMI": 22, "HbA1c": 5.0, "Gender": "Female",
                    "Hypertension": 0, "HeartDisease": 0, "SmokingHistory": "sometimes"
                }),
                "sometimes",
                "field=SmokingHistory, reason=invalid_category",
            ),
        ];
        for (strategy, body, value, expected) in cases {
            let fields = match strategy {
                Strategy::Rule => FieldSet::Biometrics,
                Strategy::Model => FieldSet::Full,
            };
            let e = svc
                .validator
                .validate(&raw(body), fields)
                .expect_err("must be rejected");
            let line = sanitize(&rejection_log(strategy, &e));
            assert!(!line.contains(value), "{line}");
            assert!(line.contains(expected), "{line}");
        }
        assert_eq!(
            rejection_log(Strategy::Rule, &IntakeError::Empty),
            "Intake rejected: strategy=rule, field=body, reason=empty"
        );
    }

    #[test]
    fn test_model_strategy_reports_missing_bundle() {
        let body = json!({
            "Age": 50, "BMI": 30, "HbA1c": 6.0, "Gender": "Male",
            "Hypertension": 0, "HeartDisease": 0, "SmokingHistory": "never"
        });
        let svc = service(IntakePolicy::Strict);
        let err = svc
            .assess(Strategy::Model, &raw(body))
            .expect_err("bundle missing");
        assert!(matches!(
            err,
            DiabetesCareError::ComponentUnavailable {
                component: BundleComponent::Classifier,
                ..
            }
        ));
        assert!(!svc.model_status().model_loaded);
        assert_eq!(svc.model_artifacts().len(), 4);
    }

    #[test]
    fn test_model_strategy_validates_before_checking_bundle() {
        let err = service(IntakePolicy::Strict)
            .assess(Strategy::Model, &raw(json!({"Age": 50, "BMI": 30, "HbA1c": 6.0})))
            .expect_err("missing gender");
        assert!(matches!(
            err,
            DiabetesCareError::Validation(IntakeError::Missing { field: "Gender" })
        ));
    }

    #[test]
    fn test_export_report() {
        let request = ReportRequest {
            risk_level: Some("Low Risk".into()),
            ..ReportRequest::default()
        };
        let exported = service(IntakePolicy::Strict).export_report(&request);
        assert!(exported.file_name.starts_with("diabetes_prediction_report_anonymous_"));
        assert!(exported.content.contains("Risk Level,Low Risk"));
    }
}
