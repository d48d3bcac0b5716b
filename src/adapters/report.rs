//! CSV report rendering.
//!
//! The export request echoes a classification response together with the
//! patient fields that produced it. Nothing is re-classified here; the
//! report only reflects what the caller sends back.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::RecommendationSet;

const LINE_END: &str = "\r\n";
const MISSING: &str = "N/A";
const ANONYMOUS: &str = "Anonymous";

/// Export request rejected before rendering.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("No data provided for export")]
    Empty,

    #[error("Export data is not valid: {0}")]
    Malformed(String),
}

/// Echoed classification plus patient fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRequest {
    #[serde(rename = "Age")]
    pub age: Option<Value>,
    #[serde(rename = "BMI")]
    pub bmi: Option<Value>,
    #[serde(rename = "HbA1c")]
    pub hba1c: Option<Value>,
    #[serde(rename = "Gender")]
    pub gender: Option<Value>,
    #[serde(rename = "Hypertension")]
    pub hypertension: Option<Value>,
    #[serde(rename = "HeartDisease")]
    pub heart_disease: Option<Value>,
    #[serde(rename = "SmokingHistory")]
    pub smoking_history: Option<Value>,

    #[serde(default)]
    pub prediction: Value,
    pub risk_level: Option<String>,
    pub diabetes_type: Option<String>,
    pub prediction_probability: Option<f64>,
    #[serde(default)]
    pub recommendations: RecommendationSet,

    /// Name printed on the report and used in the file name
    pub generated_for: Option<String>,
}

impl ReportRequest {
    /// Parse an export body.
    ///
    /// # Errors
    /// `ReportError::Empty` for an empty body or empty object,
    /// `ReportError::Malformed` when the JSON does not fit the layout.
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, ReportError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ReportError::Empty);
        }
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ReportError::Malformed(e.to_string()))?;
        match &value {
            Value::Object(map) if !map.is_empty() => {}
            _ => return Err(ReportError::Empty),
        }
        serde_json::from_value(value).map_err(|e| ReportError::Malformed(e.to_string()))
    }

    /// Whether the echoed prediction reads as "diabetes".
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match &self.prediction {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
        }
    }

    fn subject(&self) -> Option<&str> {
        self.generated_for
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Quote a field when it contains a delimiter, a quote or a line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Row-oriented CSV builder.
#[derive(Default)]
struct CsvWriter {
    out: String,
}

impl CsvWriter {
    fn row<S: AsRef<str>>(&mut self, fields: &[S]) {
        let line = fields
            .iter()
            .map(|f| escape(f.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        self.out.push_str(&line);
        self.out.push_str(LINE_END);
    }

    fn blank(&mut self) {
        self.out.push_str(LINE_END);
    }
}

/// Render the report document.
#[must_use]
pub fn render(request: &ReportRequest, generated_at: NaiveDateTime) -> String {
    let mut w = CsvWriter::default();

    w.row(&["Diabetes Prediction Report"]);
    w.row(&[
        "Generated on".to_string(),
        generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    w.row(&["Generated for", request.subject().unwrap_or(ANONYMOUS)]);
    w.blank();

    w.row(&["Patient Information"]);
    w.row(&["Age".to_string(), cell(request.age.as_ref())]);
    w.row(&["BMI".to_string(), cell(request.bmi.as_ref())]);
    w.row(&["HbA1c (%)".to_string(), cell(request.hba1c.as_ref())]);
    let optional = [
        ("Gender", &request.gender),
        ("Hypertension", &request.hypertension),
        ("Heart Disease", &request.heart_disease),
        ("Smoking History", &request.smoking_history),
    ];
    for (label, value) in optional {
        if let Some(v) = value.as_ref().filter(|v| !v.is_null()) {
            w.row(&[label.to_string(), cell(Some(v))]);
        }
    }
    w.blank();

    w.row(&["Prediction Results"]);
    w.row(&[
        "Prediction",
        if request.is_positive() {
            "Diabetes"
        } else {
            "No Diabetes"
        },
    ]);
    w.row(&["Risk Level", request.risk_level.as_deref().unwrap_or(MISSING)]);
    w.row(&[
        "Diabetes Type",
        request.diabetes_type.as_deref().unwrap_or(MISSING),
    ]);
    if let Some(p) = request.prediction_probability {
        w.row(&["Probability".to_string(), format!("{:.1}%", p * 100.0)]);
    }
    w.blank();

    w.row(&["Recommendations"]);
    for (category, items) in request.recommendations.iter() {
        if items.is_empty() {
            continue;
        }
        w.row(&[category.title()]);
        for item in items {
            w.row(&["", item.as_str()]);
        }
        w.blank();
    }

    w.out
}

/// Attachment name: `diabetes_prediction_report_<subject>_<YYYYmmdd_HHMMSS>.csv`.
///
/// The subject is reduced to ASCII alphanumerics, `-` and `_`.
#[must_use]
pub fn file_name(request: &ReportRequest, generated_at: NaiveDateTime) -> String {
    let subject: String = request
        .subject()
        .unwrap_or("anonymous")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    let subject = if subject.is_empty() {
        "anonymous".to_string()
    } else {
        subject
    };
    format!(
        "diabetes_prediction_report_{subject}_{}.csv",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}
