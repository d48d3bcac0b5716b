//! Clinical record types for diabetes risk screening.
//!
//! Feature set follows the diabetes prediction dataset the model bundle was
//! trained on: age, gender, BMI, HbA1c, hypertension, heart disease and
//! smoking history.

use serde::{Deserialize, Serialize};

/// Patient gender as recorded at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Label used by the categorical encoders.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    /// Parse an intake label. Matching is exact.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Smoking history categories accepted at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmokingHistory {
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "former")]
    Former,
    #[serde(rename = "No Info")]
    NoInfo,
}

impl SmokingHistory {
    /// Label used by the categorical encoders.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Current => "current",
            Self::Former => "former",
            Self::NoInfo => "No Info",
        }
    }

    /// Parse an intake label. Matching is exact.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "never" => Some(Self::Never),
            "current" => Some(Self::Current),
            "former" => Some(Self::Former),
            "No Info" => Some(Self::NoInfo),
            _ => None,
        }
    }
}

/// Validated clinical inputs for one screening request.
///
/// Required fields are strictly positive once the record has passed intake
/// (see [`crate::domain::IntakeValidator`]). Optional fields are only
/// populated when the request carried them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    /// Age in years
    pub age: f64,

    /// Body-mass index in kg/m²
    pub bmi: f64,

    /// Glycated hemoglobin in %
    pub hba1c: f64,

    pub gender: Option<Gender>,

    /// Doctor-diagnosed hypertension
    pub hypertension: Option<bool>,

    /// Doctor-diagnosed heart disease
    pub heart_disease: Option<bool>,

    pub smoking_history: Option<SmokingHistory>,
}

impl ClinicalRecord {
    /// Create a record carrying only the three biometrics.
    #[must_use]
    pub fn new(age: f64, bmi: f64, hba1c: f64) -> Self {
        Self {
            age,
            bmi,
            hba1c,
            gender: None,
            hypertension: None,
            heart_disease: None,
            smoking_history: None,
        }
    }

    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    #[must_use]
    pub fn with_hypertension(mut self, present: bool) -> Self {
        self.hypertension = Some(present);
        self
    }

    #[must_use]
    pub fn with_heart_disease(mut self, present: bool) -> Self {
        self.heart_disease = Some(present);
        self
    }

    #[must_use]
    pub fn with_smoking_history(mut self, history: SmokingHistory) -> Self {
        self.smoking_history = Some(history);
        self
    }

    /// Whether all required biometrics are strictly positive.
    #[must_use]
    pub fn has_positive_biometrics(&self) -> bool {
        self.age > 0.0 && self.bmi > 0.0 && self.hba1c > 0.0
    }
}

/// Feature names in the order the model bundle expects them.
pub const FEATURE_NAMES: [&str; 7] = [
    "age",
    "gender",
    "bmi",
    "HbA1c_level",
    "hypertension",
    "heart_disease",
    "smoking_history",
];
