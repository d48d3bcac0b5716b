//! Intake: turns loosely-typed request fields into a [`ClinicalRecord`].
//!
//! Request values arrive as JSON strings or numbers under the form field
//! names (`Age`, `BMI`, `HbA1c`, `Gender`, `Hypertension`, `HeartDisease`,
//! `SmokingHistory`). The [`IntakePolicy`] decides how forgiving coercion is;
//! the same policy applies to both classification strategies.

use std::str::FromStr;

use serde_json::{Map, Value};

use super::patient::{ClinicalRecord, Gender, SmokingHistory};
use super::thresholds::IntakeLimits;

pub const AGE_FIELD: &str = "Age";
pub const BMI_FIELD: &str = "BMI";
pub const HBA1C_FIELD: &str = "HbA1c";
pub const GENDER_FIELD: &str = "Gender";
pub const HYPERTENSION_FIELD: &str = "Hypertension";
pub const HEART_DISEASE_FIELD: &str = "HeartDisease";
pub const SMOKING_HISTORY_FIELD: &str = "SmokingHistory";

const GENDER_CHOICES: &str = "Male, Female";
const SMOKING_CHOICES: &str = "never, current, former, No Info";

/// Validation failure. The first failing check is reported; errors are
/// never aggregated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeError {
    #[error("No data provided")]
    Empty,

    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a number, got {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("Please fill in all required fields (Age, BMI, HbA1c) with valid numbers.")]
    NotPositive,

    #[error("{field} {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be 0 or 1, got {value}")]
    NotBinary { field: &'static str, value: f64 },

    #[error("{field} must be one of {allowed}, got {value:?}")]
    InvalidCategory {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },
}

impl IntakeError {
    /// Offending field, if the failure is tied to one.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing { field }
            | Self::NotNumeric { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NotBinary { field, .. }
            | Self::InvalidCategory { field, .. } => Some(field),
            Self::Empty | Self::MalformedBody(_) | Self::NotPositive => None,
        }
    }

    /// Short failure tag that never carries the submitted value.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::MalformedBody(_) => "malformed_body",
            Self::Missing { .. } => "missing",
            Self::NotNumeric { .. } => "not_numeric",
            Self::NotPositive => "not_positive",
            Self::OutOfRange { .. } => "out_of_range",
            Self::NotBinary { .. } => "not_binary",
            Self::InvalidCategory { .. } => "invalid_category",
        }
    }
}

/// How strictly raw fields are coerced and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakePolicy {
    /// Unparseable numbers become `0.0`; only positivity is enforced.
    /// Unrecognized categorical values are dropped.
    Lenient,
    /// Unparseable numbers are rejected and every field is range-checked.
    #[default]
    Strict,
}

impl FromStr for IntakePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown intake policy {other:?} (expected lenient or strict)")),
        }
    }
}

/// Which fields a strategy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSet {
    /// Age, BMI and HbA1c. Other fields are parsed when present.
    Biometrics,
    /// Biometrics plus gender, hypertension, heart disease and smoking history.
    Full,
}

/// The raw request body: a JSON object keyed by form field name.
#[derive(Debug, Clone, Default)]
pub struct RawIntake {
    fields: Map<String, Value>,
}

impl RawIntake {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Parse a request body.
    ///
    /// # Errors
    /// `IntakeError::Empty` for an empty body, a non-object, or an empty
    /// object; `IntakeError::MalformedBody` when the body is not JSON.
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, IntakeError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(IntakeError::Empty);
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| IntakeError::MalformedBody(e.to_string()))?;
        match value {
            Value::Object(fields) if !fields.is_empty() => Ok(Self { fields }),
            _ => Err(IntakeError::Empty),
        }
    }

    /// Raw value of a field, if the request carried one.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }
}

/// Outcome of coercing one field to a number.
enum Coerced {
    Number(f64),
    Absent,
    Invalid(String),
}

fn coerce_number(value: Option<&Value>) -> Coerced {
    match value {
        None => Coerced::Absent,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(x) if x.is_finite() => Coerced::Number(x),
            _ => Coerced::Invalid(n.to_string()),
        },
        Some(Value::Bool(b)) => Coerced::Number(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Coerced::Absent;
            }
            match trimmed.parse::<f64>() {
                Ok(x) if x.is_finite() => Coerced::Number(x),
                _ => Coerced::Invalid(s.clone()),
            }
        }
        Some(other) => Coerced::Invalid(other.to_string()),
    }
}

fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Validates raw intake under a fixed policy and set of limits.
#[derive(Debug, Clone, Default)]
pub struct IntakeValidator {
    policy: IntakePolicy,
    limits: IntakeLimits,
}

impl IntakeValidator {
    #[must_use]
    pub fn new(policy: IntakePolicy, limits: IntakeLimits) -> Self {
        Self { policy, limits }
    }

    #[must_use]
    pub fn policy(&self) -> IntakePolicy {
        self.policy
    }

    /// Validate a request into a record.
    ///
    /// Checks run in field order (age, BMI, HbA1c, gender, hypertension,
    /// heart disease, smoking history) and stop at the first failure.
    ///
    /// # Errors
    /// Returns the first failing [`IntakeError`].
    pub fn validate(&self, raw: &RawIntake, fields: FieldSet) -> Result<ClinicalRecord, IntakeError> {
        let age = self.number(raw, AGE_FIELD)?;
        let bmi = self.number(raw, BMI_FIELD)?;
        let hba1c = self.number(raw, HBA1C_FIELD)?;

        let mut record = ClinicalRecord::new(age, bmi, hba1c);

        match self.policy {
            IntakePolicy::Lenient => {
                if !record.has_positive_biometrics() {
                    return Err(IntakeError::NotPositive);
                }
            }
            IntakePolicy::Strict => {
                let l = &self.limits;
                check_range(AGE_FIELD, age, l.age_min, l.age_max)?;
                check_range(BMI_FIELD, bmi, l.bmi_min, l.bmi_max)?;
                check_range(HBA1C_FIELD, hba1c, l.hba1c_min, l.hba1c_max)?;
            }
        }

        let required = fields == FieldSet::Full && self.policy == IntakePolicy::Strict;

        record.gender = self.category(raw, GENDER_FIELD, GENDER_CHOICES, required, Gender::parse)?;
        record.hypertension = self.flag(raw, HYPERTENSION_FIELD, required)?;
        record.heart_disease = self.flag(raw, HEART_DISEASE_FIELD, required)?;
        record.smoking_history = self.category(
            raw,
            SMOKING_HISTORY_FIELD,
            SMOKING_CHOICES,
            required,
            SmokingHistory::parse,
        )?;

        Ok(record)
    }

    fn number(&self, raw: &RawIntake, field: &'static str) -> Result<f64, IntakeError> {
        match (coerce_number(raw.get(field)), self.policy) {
            (Coerced::Number(x), _) => Ok(x),
            (_, IntakePolicy::Lenient) => Ok(0.0),
            (Coerced::Absent, IntakePolicy::Strict) => Err(IntakeError::Missing { field }),
            (Coerced::Invalid(value), IntakePolicy::Strict) => {
                Err(IntakeError::NotNumeric { field, value })
            }
        }
    }

    fn flag(
        &self,
        raw: &RawIntake,
        field: &'static str,
        required: bool,
    ) -> Result<Option<bool>, IntakeError> {
        let x = match coerce_number(raw.get(field)) {
            Coerced::Number(x) => x,
            Coerced::Absent if required => return Err(IntakeError::Missing { field }),
            Coerced::Absent => return Ok(None),
            Coerced::Invalid(value) => {
                if self.policy == IntakePolicy::Lenient {
                    return Ok(None);
                }
                return Err(IntakeError::NotNumeric { field, value });
            }
        };

        if x == 0.0 {
            Ok(Some(false))
        } else if x == 1.0 {
            Ok(Some(true))
        } else if self.policy == IntakePolicy::Lenient {
            Ok(None)
        } else {
            Err(IntakeError::NotBinary { field, value: x })
        }
    }

    fn category<T>(
        &self,
        raw: &RawIntake,
        field: &'static str,
        allowed: &'static str,
        required: bool,
        parse: fn(&str) -> Option<T>,
    ) -> Result<Option<T>, IntakeError> {
        let Some(value) = raw.get(field) else {
            return if required {
                Err(IntakeError::Missing { field })
            } else {
                Ok(None)
            };
        };

        let label = label_of(value);
        match parse(&label) {
            Some(parsed) => Ok(Some(parsed)),
            None if self.policy == IntakePolicy::Lenient => Ok(None),
            None => Err(IntakeError::InvalidCategory {
                field,
                value: label,
                allowed,
            }),
        }
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), IntakeError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(IntakeError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
