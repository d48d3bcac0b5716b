//! Domain layer: Core screening types and logic.
//!
//! This module contains plain Rust types with no I/O. Classification
//! strategies live behind the ports; everything here is deterministic.

mod diagnosis;
mod education;
mod intake;
mod patient;
mod recommendation;
pub mod thresholds;

pub use diagnosis::{AlertClass, ClassificationResult, DiabetesType, RiskLevel, Strategy};
pub use education::EducationalContent;
pub use intake::{
    FieldSet, IntakeError, IntakePolicy, IntakeValidator, RawIntake, AGE_FIELD, BMI_FIELD,
    GENDER_FIELD, HBA1C_FIELD, HEART_DISEASE_FIELD, HYPERTENSION_FIELD, SMOKING_HISTORY_FIELD,
};
pub use patient::{ClinicalRecord, Gender, SmokingHistory, FEATURE_NAMES};
pub use recommendation::{RecommendationCategory, RecommendationSet};
pub use thresholds::ClinicalThresholds;
