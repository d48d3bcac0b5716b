//! Model adapter: pre-trained bundle implementation of `RiskClassifier`.
//!
//! Pipeline per request:
//! 1. Encode categoricals with the bundle's label encoders
//! 2. Assemble the feature vector in training order
//! 3. Min-max scale
//! 4. Predict class and probability
//! 5. Map probability to a risk band and a type heuristic
//!
//! The type heuristic reads age, BMI and HbA1c only and does not consult
//! the predicted class, so a negative prediction can still report a type
//! when the probability is at or above the cut-off.

mod bundle;
mod classifier;
mod preprocess;

use std::sync::Arc;

pub use bundle::{
    Artifact, ArtifactReport, BundleComponent, BundleStatus, TrainedModelBundle,
    FEATURE_NAMES_FILE, GENDER_ENCODER, LABEL_ENCODERS_FILE, MODEL_FILE, SCALER_FILE,
    SMOKING_ENCODER,
};
pub use classifier::{LinearClassifier, LinearKind};
pub use preprocess::{LabelEncoders, MinMaxScaler};

use crate::domain::thresholds::{RiskBands, TypeHeuristic};
use crate::domain::{ClassificationResult, ClinicalRecord, DiabetesType, RiskLevel, Strategy};
use crate::ports::{BinaryClassifier, RiskClassifier};
use crate::DiabetesCareError;

/// Probability reported when the classifier has no probability output.
pub const FALLBACK_PROBABILITY: f64 = 0.5;

/// Classifier backed by a [`TrainedModelBundle`].
#[derive(Debug, Clone)]
pub struct ModelStrategy {
    bundle: Arc<TrainedModelBundle>,
    bands: RiskBands,
    typing: TypeHeuristic,
}

impl ModelStrategy {
    #[must_use]
    pub fn new(bundle: Arc<TrainedModelBundle>, bands: RiskBands, typing: TypeHeuristic) -> Self {
        Self {
            bundle,
            bands,
            typing,
        }
    }

    #[must_use]
    pub fn bundle(&self) -> &TrainedModelBundle {
        &self.bundle
    }

    /// Build the raw (unscaled) feature vector in training order.
    fn features(encoders: &LabelEncoders, record: &ClinicalRecord) -> Vec<f64> {
        let gender = encoders.encode(GENDER_ENCODER, record.gender.map(|g| g.as_str()));
        let smoking =
            encoders.encode(SMOKING_ENCODER, record.smoking_history.map(|s| s.as_str()));
        let flag = |v: Option<bool>| if v.unwrap_or(false) { 1.0 } else { 0.0 };

        vec![
            record.age,
            gender as f64,
            record.bmi,
            record.hba1c,
            flag(record.hypertension),
            flag(record.heart_disease),
            smoking as f64,
        ]
    }

    /// Probability band. Bands are inclusive on their lower edge.
    #[must_use]
    pub fn risk_band(&self, probability: f64) -> RiskLevel {
        let b = &self.bands;
        if probability >= b.high {
            RiskLevel::High
        } else if probability >= b.moderate {
            RiskLevel::Moderate
        } else if probability >= b.low {
            RiskLevel::Low
        } else {
            RiskLevel::VeryLow
        }
    }

    /// Type heuristic over the raw inputs.
    #[must_use]
    pub fn infer_type(&self, record: &ClinicalRecord, probability: f64) -> DiabetesType {
        let t = &self.typing;
        if probability < t.diabetes_probability {
            return DiabetesType::NoDiabetes;
        }
        if record.age < t.young_onset_age && record.hba1c > t.diabetes_hba1c {
            DiabetesType::Type1
        } else if record.age > t.mature_onset_age && record.bmi > t.overweight_bmi {
            // Elevated HbA1c does not change the outcome once age and BMI qualify.
            DiabetesType::Type2
        } else {
            DiabetesType::Type1
        }
    }
}

impl RiskClassifier for ModelStrategy {
    fn strategy(&self) -> Strategy {
        Strategy::Model
    }

    fn classify(&self, record: &ClinicalRecord) -> Result<ClassificationResult, DiabetesCareError> {
        if !record.has_positive_biometrics() {
            return Err(crate::domain::IntakeError::NotPositive.into());
        }

        // Check every component up front so a partial bundle never predicts.
        let classifier = self.bundle.classifier()?;
        let scaler = self.bundle.scaler()?;
        let encoders = self.bundle.encoders()?;
        self.bundle.feature_names()?;

        let raw = Self::features(encoders, record);
        let scaled = scaler
            .transform(&raw)
            .map_err(|reason| DiabetesCareError::ComponentUnavailable {
                component: BundleComponent::Scaler,
                reason,
            })?;

        let prediction = classifier.predict(&scaled);
        let probability = classifier.predict_proba(&scaled).unwrap_or_else(|| {
            tracing::debug!("Classifier has no probability output, using {FALLBACK_PROBABILITY}");
            FALLBACK_PROBABILITY
        });

        let risk_level = self.risk_band(probability);
        let diabetes_type = self.infer_type(record, probability);

        tracing::debug!(
            "Model classification: prediction={}, probability={:.3}, risk={}",
            prediction,
            probability,
            risk_level
        );

        Ok(ClassificationResult {
            strategy: Strategy::Model,
            prediction,
            risk_level,
            diabetes_type,
            explanation: Vec::new(),
            probability: Some(probability),
            focus: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FEATURE_NAMES, Gender, SmokingHistory};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn strategy_from(bundle: TrainedModelBundle) -> ModelStrategy {
        ModelStrategy::new(
            Arc::new(bundle),
            RiskBands::default(),
            TypeHeuristic::default(),
        )
    }

    fn identity_scaler() -> MinMaxScaler {
        MinMaxScaler {
            data_min: vec![0.0; 7],
            data_max: vec![1.0; 7],
            feature_range: [0.0, 1.0],
        }
    }

    fn encoders() -> LabelEncoders {
        let mut classes = BTreeMap::new();
        classes.insert(
            GENDER_ENCODER.to_string(),
            vec!["Female".to_string(), "Male".to_string()],
        );
        classes.insert(
            SMOKING_ENCODER.to_string(),
            vec![
                "No Info".to_string(),
                "current".to_string(),
                "former".to_string(),
                "never".to_string(),
            ],
        );
        LabelEncoders::new(classes)
    }

    fn names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect()
    }

    /// Classifier that only looks at the smoking column.
    fn smoking_only(kind: LinearKind) -> LinearClassifier {
        LinearClassifier {
            kind,
            coefficients: vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            intercept: -0.5,
        }
    }

    #[test]
    fn test_loaded_bundle_classifies() {
        let temp = tempdir().expect("tempdir");
        bundle::tests::write_bundle(temp.path());
        let strategy = strategy_from(TrainedModelBundle::load(temp.path()));

        let high = strategy
            .classify(
                &ClinicalRecord::new(60.0, 34.0, 8.5)
                    .with_gender(Gender::Male)
                    .with_hypertension(true)
                    .with_heart_disease(true)
                    .with_smoking_history(SmokingHistory::Former),
            )
            .expect("classify");
        assert_eq!(high.strategy, Strategy::Model);
        assert_eq!(high.prediction, 1);
        assert!(high.probability.expect("probability") >= 0.5);
        assert_eq!(high.diabetes_type, DiabetesType::Type2);
        assert!(high.explanation.is_empty());

        let low = strategy
            .classify(&ClinicalRecord::new(25.0, 21.0, 4.8))
            .expect("classify");
        assert_eq!(low.prediction, 0);
        assert_eq!(low.diabetes_type, DiabetesType::NoDiabetes);
        assert_eq!(low.risk_level, RiskLevel::VeryLow);
    }

    #[test]
    fn test_repeat_classification_is_identical() {
        let temp = tempdir().expect("tempdir");
        bundle::tests::write_bundle(temp.path());
        let strategy = strategy_from(TrainedModelBundle::load(temp.path()));
        let record = ClinicalRecord::new(48.0, 29.5, 6.4)
            .with_gender(Gender::Female)
            .with_hypertension(false)
            .with_heart_disease(false)
            .with_smoking_history(SmokingHistory::Never);

        let first = strategy.classify(&record).expect("classify");
        for _ in 0..3 {
            assert_eq!(strategy.classify(&record).expect("classify"), first);
        }
    }

    #[test]
    fn test_unknown_smoking_encodes_as_first_class() {
        let strategy = strategy_from(TrainedModelBundle::from_parts(
            Artifact::Loaded(smoking_only(LinearKind::LogisticRegression)),
            Artifact::Loaded(identity_scaler()),
            Artifact::Loaded(encoders()),
            Artifact::Loaded(names()),
        ));

        // "No Info" sits at index 0, the same as an absent value.
        let absent = strategy
            .classify(&ClinicalRecord::new(40.0, 22.0, 5.0))
            .expect("classify");
        let no_info = strategy
            .classify(&ClinicalRecord::new(40.0, 22.0, 5.0).with_smoking_history(SmokingHistory::NoInfo))
            .expect("classify");
        assert_eq!(absent.probability, no_info.probability);
        assert_eq!(absent.prediction, 0);

        let never = strategy
            .classify(&ClinicalRecord::new(40.0, 22.0, 5.0).with_smoking_history(SmokingHistory::Never))
            .expect("classify");
        assert_eq!(never.prediction, 1);
    }

    #[test]
    fn test_missing_component_refuses() {
        let strategy = strategy_from(TrainedModelBundle::from_parts(
            Artifact::Loaded(smoking_only(LinearKind::LogisticRegression)),
            Artifact::Unavailable("scaler.json not found".into()),
            Artifact::Loaded(encoders()),
            Artifact::Loaded(names()),
        ));
        let err = strategy
            .classify(&ClinicalRecord::new(40.0, 22.0, 5.0))
            .expect_err("scaler missing");
        assert!(matches!(
            err,
            DiabetesCareError::ComponentUnavailable {
                component: BundleComponent::Scaler,
                ..
            }
        ));
    }

    #[test]
    fn test_refuses_non_positive_record() {
        let strategy = strategy_from(TrainedModelBundle::from_parts(
            Artifact::Unavailable("model.json not found".into()),
            Artifact::Unavailable("scaler.json not found".into()),
            Artifact::Loaded(encoders()),
            Artifact::Loaded(names()),
        ));
        let err = strategy
            .classify(&ClinicalRecord::new(40.0, 0.0, 5.0))
            .expect_err("must refuse");
        assert!(matches!(err, DiabetesCareError::Validation(_)));
    }

    #[test]
    fn test_no_probability_output_reports_half() {
        let strategy = strategy_from(TrainedModelBundle::from_parts(
            Artifact::Loaded(smoking_only(LinearKind::LinearSvm)),
            Artifact::Loaded(identity_scaler()),
            Artifact::Loaded(encoders()),
            Artifact::Loaded(names()),
        ));
        let r = strategy
            .classify(&ClinicalRecord::new(40.0, 22.0, 5.0))
            .expect("classify");
        assert_eq!(r.probability, Some(FALLBACK_PROBABILITY));
        assert_eq!(r.prediction, 0);
        assert_eq!(r.risk_level, RiskLevel::Low);
        // The heuristic ignores the class: p = 0.5 still yields a type.
        assert_eq!(r.diabetes_type, DiabetesType::Type1);
    }

    #[test]
    fn test_risk_bands() {
        let strategy = strategy_from(TrainedModelBundle::from_parts(
            Artifact::Unavailable(String::new()),
            Artifact::Unavailable(String::new()),
            Artifact::Unavailable(String::new()),
            Artifact::Unavailable(String::new()),
        ));
        assert_eq!(strategy.risk_band(0.85), RiskLevel::High);
        assert_eq!(strategy.risk_band(0.8), RiskLevel::High);
        assert_eq!(strategy.risk_band(0.65), RiskLevel::Moderate);
        assert_eq!(strategy.risk_band(0.6), RiskLevel::Moderate);
        assert_eq!(strategy.risk_band(0.45), RiskLevel::Low);
        assert_eq!(strategy.risk_band(0.4), RiskLevel::Low);
        assert_eq!(strategy.risk_band(0.2), RiskLevel::VeryLow);
    }

    #[test]
    fn test_type_heuristic() {
        let strategy = strategy_from(TrainedModelBundle::from_parts(
            Artifact::Unavailable(String::new()),
            Artifact::Unavailable(String::new()),
            Artifact::Unavailable(String::new()),
            Artifact::Unavailable(String::new()),
        ));
        let rec = ClinicalRecord::new;
        assert_eq!(strategy.infer_type(&rec(60.0, 35.0, 8.0), 0.3), DiabetesType::NoDiabetes);
        assert_eq!(strategy.infer_type(&rec(25.0, 22.0, 7.0), 0.9), DiabetesType::Type1);
        assert_eq!(strategy.infer_type(&rec(50.0, 30.0, 7.0), 0.9), DiabetesType::Type2);
        assert_eq!(strategy.infer_type(&rec(50.0, 30.0, 5.0), 0.9), DiabetesType::Type2);
        assert_eq!(strategy.infer_type(&rec(45.0, 30.0, 7.0), 0.9), DiabetesType::Type1);
        assert_eq!(strategy.infer_type(&rec(35.0, 22.0, 5.0), 0.5), DiabetesType::Type1);
    }
}
