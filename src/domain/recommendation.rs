//! Treatment recommendations derived from a classification.
//!
//! Content is static: two top-level branches (diabetes detected or not),
//! with the dietary plan further split on whether the type is Type 2.

use serde::{Deserialize, Serialize};

use super::diagnosis::DiabetesType;

/// Advice category. Declaration order is presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Immediate,
    Lifestyle,
    Monitoring,
    Medical,
    Dietary,
    Exercise,
}

impl RecommendationCategory {
    pub const ALL: [Self; 6] = [
        Self::Immediate,
        Self::Lifestyle,
        Self::Monitoring,
        Self::Medical,
        Self::Dietary,
        Self::Exercise,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Lifestyle => "lifestyle",
            Self::Monitoring => "monitoring",
            Self::Medical => "medical",
            Self::Dietary => "dietary",
            Self::Exercise => "exercise",
        }
    }

    /// Title-cased name for reports.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Immediate => "Immediate",
            Self::Lifestyle => "Lifestyle",
            Self::Monitoring => "Monitoring",
            Self::Medical => "Medical",
            Self::Dietary => "Dietary",
            Self::Exercise => "Exercise",
        }
    }
}

/// Ordered advice per category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSet {
    pub immediate: Vec<String>,
    pub lifestyle: Vec<String>,
    pub monitoring: Vec<String>,
    pub medical: Vec<String>,
    pub dietary: Vec<String>,
    pub exercise: Vec<String>,
}

const DETECTED_IMMEDIATE: &[&str] = &[
    "Schedule an appointment with your healthcare provider immediately to confirm diagnosis and develop a treatment plan.",
    "Begin monitoring blood glucose levels regularly as advised by your doctor.",
    "Review current medications with your doctor to ensure they are appropriate for diabetes management.",
];

const DETECTED_LIFESTYLE: &[&str] = &[
    "Adopt a low-carbohydrate, high-fiber diet focusing on whole foods and portion control.",
    "Engage in at least 150 minutes of moderate-intensity aerobic exercise weekly (e.g., brisk walking, cycling).",
    "Maintain a healthy weight through balanced nutrition and regular physical activity.",
    "Limit alcohol consumption and quit smoking entirely, as both can worsen diabetes complications.",
    "Practice stress management techniques like meditation, yoga, or deep breathing exercises.",
];

const DETECTED_MONITORING: &[&str] = &[
    "Monitor blood glucose levels 2-4 times daily, or as recommended by your healthcare provider.",
    "Track HbA1c levels every 3-6 months to assess long-term blood sugar control.",
    "Perform regular foot examinations to check for cuts, sores, or infections.",
    "Undergo annual eye examinations to screen for diabetic retinopathy.",
    "Monitor blood pressure regularly and manage it within target ranges.",
];

const DETECTED_MEDICAL: &[&str] = &[
    "Discuss medication therapy options (e.g., Metformin, Insulin, SGLT2 inhibitors) with your doctor.",
    "Ensure regular HbA1c testing is performed as part of your diabetes management plan.",
    "Undergo cardiovascular risk assessment to manage heart health.",
    "Monitor kidney function regularly through blood and urine tests.",
];

const TYPE2_DIETARY: &[&str] = &[
    "Focus on a low-carbohydrate diet (e.g., 45-50% of total daily calories from carbs).",
    "Incorporate high fiber foods (25-30g daily) such as whole grains, fruits, and vegetables.",
    "Prioritize lean proteins (chicken, fish, beans) and healthy fats (avocado, nuts, olive oil).",
    "Strictly limit processed foods, sugary drinks, and added sugars.",
    "Maintain regular meal timing to help stabilize blood glucose levels.",
];

const INSULIN_DIETARY: &[&str] = &[
    "Implement balanced carbohydrate counting to match insulin doses.",
    "Ensure regular insulin timing in conjunction with meals.",
    "Maintain consistent meal patterns to avoid blood sugar fluctuations.",
    "Understand emergency glucose management for hypoglycemia.",
    "Seek professional nutrition counseling for personalized meal planning.",
];

const DETECTED_EXERCISE: &[&str] = &[
    "Aim for at least 150 minutes per week of moderate-intensity aerobic exercise.",
    "Include strength training exercises 2-3 sessions per week for all major muscle groups.",
    "Incorporate flexibility exercises (stretching, yoga) 2-3 sessions per week.",
    "Monitor blood glucose before and after exercise, especially if on insulin or certain medications.",
    "Stay well-hydrated during physical activity.",
];

const PREVENTION_LIFESTYLE: &[&str] = &[
    "Maintain a healthy lifestyle with regular exercise to prevent diabetes.",
    "Eat a balanced diet rich in whole grains, lean proteins, and plenty of fruits and vegetables.",
    "Monitor your weight and BMI regularly to stay within a healthy range.",
    "Get regular health check-ups, especially if you have risk factors for diabetes.",
    "Avoid smoking and limit alcohol consumption to support overall health.",
];

const PREVENTION_MONITORING: &[&str] = &[
    "Consider annual diabetes screening if you are over 45 years old or have other risk factors.",
    "Regularly monitor your BMI and weight.",
    "Have your blood pressure checked regularly.",
    "Monitor your cholesterol levels as part of routine health checks.",
];

const PREVENTION_DIETARY: &[&str] = &[
    "Follow a balanced diet with an emphasis on whole grains over refined grains.",
    "Consume plenty of fruits and vegetables daily.",
    "Include lean proteins and healthy fats in your meals.",
    "Limit processed foods, sugary drinks, and excessive saturated/trans fats.",
    "Stay well-hydrated by drinking adequate water throughout the day.",
];

const PREVENTION_EXERCISE: &[&str] = &[
    "Aim for at least 150 minutes of moderate-intensity exercise weekly.",
    "Incorporate strength training 2-3 times weekly.",
    "Include flexibility exercises in your routine.",
    "Find physical activities you enjoy to make exercise sustainable.",
    "Progress gradually in intensity and duration to avoid injury.",
];

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| (*s).to_string()).collect()
}

impl RecommendationSet {
    /// Build the advice for a `(prediction, diabetes_type)` pair.
    ///
    /// Only `prediction == 1` selects the treatment branch; the type only
    /// affects the dietary plan within that branch.
    #[must_use]
    pub fn generate(prediction: u8, diabetes_type: DiabetesType) -> Self {
        if prediction == 1 {
            let dietary = if diabetes_type == DiabetesType::Type2 {
                TYPE2_DIETARY
            } else {
                INSULIN_DIETARY
            };
            Self {
                immediate: owned(DETECTED_IMMEDIATE),
                lifestyle: owned(DETECTED_LIFESTYLE),
                monitoring: owned(DETECTED_MONITORING),
                medical: owned(DETECTED_MEDICAL),
                dietary: owned(dietary),
                exercise: owned(DETECTED_EXERCISE),
            }
        } else {
            Self {
                immediate: Vec::new(),
                lifestyle: owned(PREVENTION_LIFESTYLE),
                monitoring: owned(PREVENTION_MONITORING),
                medical: Vec::new(),
                dietary: owned(PREVENTION_DIETARY),
                exercise: owned(PREVENTION_EXERCISE),
            }
        }
    }

    /// Advice for one category.
    #[must_use]
    pub fn get(&self, category: RecommendationCategory) -> &[String] {
        match category {
            RecommendationCategory::Immediate => &self.immediate,
            RecommendationCategory::Lifestyle => &self.lifestyle,
            RecommendationCategory::Monitoring => &self.monitoring,
            RecommendationCategory::Medical => &self.medical,
            RecommendationCategory::Dietary => &self.dietary,
            RecommendationCategory::Exercise => &self.exercise,
        }
    }

    /// Categories in presentation order with their advice.
    pub fn iter(&self) -> impl Iterator<Item = (RecommendationCategory, &[String])> + '_ {
        RecommendationCategory::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
    }

    /// Total number of advice lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().map(|(_, items)| items.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
