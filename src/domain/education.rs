//! Educational content blocks shown alongside a result.

use serde::{Deserialize, Serialize};

const GENERAL: &[&str] = &[
    "Diabetes is a chronic condition affecting how your body processes glucose (sugar).",
    "Early detection and proper management can prevent or delay serious complications.",
    "Lifestyle changes, including diet and exercise, are crucial for diabetes management and prevention.",
    "Regular monitoring of blood sugar levels helps track progress and prevent complications.",
];

const PREVENTION: &[&str] = &[
    "Maintain a healthy weight through a balanced diet and regular exercise.",
    "Eat a balanced diet low in processed foods, sugary drinks, and unhealthy fats.",
    "Get at least 150 minutes of moderate physical activity each week.",
    "Monitor blood pressure and cholesterol levels regularly.",
    "Avoid smoking and limit alcohol consumption.",
];

const MANAGEMENT: &[&str] = &[
    "Work closely with your healthcare providers to develop a personalized care plan.",
    "Monitor blood glucose levels regularly as advised by your doctor.",
    "Take medications as prescribed and understand their purpose.",
    "Maintain a healthy lifestyle, including diet and exercise, as a cornerstone of management.",
    "Attend regular check-ups and screenings for diabetes complications.",
];

const TYPE1: &[&str] = &[
    "Type 1 diabetes is an autoimmune condition where the body does not produce insulin.",
    "Insulin therapy is essential for survival and must be administered daily.",
    "Regular blood glucose monitoring is crucial for adjusting insulin doses.",
    "Carbohydrate counting helps match insulin doses to food intake.",
    "Emergency preparedness for hypoglycemia (low blood sugar) is important.",
];

const TYPE2: &[&str] = &[
    "Type 2 diabetes is often related to insulin resistance and insufficient insulin production, frequently linked to lifestyle factors.",
    "Diet and exercise are powerful tools to help manage blood glucose levels.",
    "Oral medications or injectable non-insulin medications may be prescribed.",
    "Weight management is a key component in managing Type 2 diabetes.",
    "Regular screening for complications (eyes, kidneys, nerves, heart) is essential.",
];

const PREDIABETES: &[&str] = &[
    "Prediabetes means your blood sugar is higher than normal but not yet diabetes.",
    "This is a critical time for intervention; lifestyle changes can prevent Type 2 diabetes.",
    "Focus on increasing physical activity and making healthier food choices.",
    "Losing even a small amount of weight can make a big difference.",
    "Regular check-ups are important to monitor your blood sugar levels.",
];

/// Static educational blocks plus a type-specific block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationalContent {
    pub general: Vec<String>,
    pub prevention: Vec<String>,
    pub management: Vec<String>,
    /// Empty when the label names no known type.
    pub specific: Vec<String>,
}

impl EducationalContent {
    /// Content for a diabetes type label.
    ///
    /// The specific block is picked by substring: `Type 1`, then `Type 2`,
    /// then `Prediabetes`.
    #[must_use]
    pub fn for_diabetes_type(label: &str) -> Self {
        let specific: &[&str] = if label.contains("Type 1") {
            TYPE1
        } else if label.contains("Type 2") {
            TYPE2
        } else if label.contains("Prediabetes") {
            PREDIABETES
        } else {
            &[]
        };

        let owned = |lines: &[&str]| lines.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        Self {
            general: owned(GENERAL),
            prevention: owned(PREVENTION),
            management: owned(MANAGEMENT),
            specific: owned(specific),
        }
    }
}
