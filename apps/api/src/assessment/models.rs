//! Wire and storage shapes for questions, answers and results.
//!
//! Everything the model produces is deserialized leniently: missing fields
//! fall back to defaults and unknown fields are carried in `extra` so a
//! generated payload survives a round trip through these types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Question sets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "mcq")]
    SingleChoice,
    #[serde(rename = "text")]
    FreeText,
    #[serde(rename = "scale")]
    Scale,
    #[serde(rename = "multi-select")]
    MultiChoice,
    /// Any type tag the model invents. Treated like free text.
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRange {
    pub min: i64,
    pub max: i64,
    #[serde(default)]
    pub min_label: String,
    #[serde(default)]
    pub max_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_range: Option<ScaleRange>,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentQuestionSet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Minutes.
    #[serde(default)]
    pub estimated_time: u32,
    pub questions: Vec<Question>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssessmentQuestionSet {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Responses
// ────────────────────────────────────────────────────────────────────────────

/// A recorded answer. The shape follows the question type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(Vec<String>),
    Number(f64),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Question id → answer.
pub type ResponseSet = BTreeMap<String, AnswerValue>;

// ────────────────────────────────────────────────────────────────────────────
// Raw analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedCareer {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "match", default, deserialize_with = "percentage")]
    pub match_percentage: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub growth_path: String,
    #[serde(default)]
    pub average_salary: String,
    #[serde(default)]
    pub key_skills: Vec<String>,
    #[serde(default)]
    pub education_path: String,
}

/// Reads a match score the way the model tends to write it: `85`, `85.4`
/// or `"85%"`. Anything else reads as 0. Clamped to 0..=100.
pub fn percentage_of(value: &Value) -> u32 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u32)
        .unwrap_or(0)
}

fn percentage<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(percentage_of(&Value::deserialize(deserializer)?))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecommendation {
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub eligibility: String,
    #[serde(default)]
    pub career_outcomes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPhase {
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Career guidance as produced by the model or a fallback tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub overall_analysis: String,
    #[serde(default)]
    pub recommended_careers: Vec<RecommendedCareer>,
    #[serde(default)]
    pub course_recommendations: Vec<CourseRecommendation>,
    #[serde(default)]
    pub skill_development: Vec<String>,
    #[serde(default)]
    pub action_plan: Vec<ActionPhase>,
    #[serde(default)]
    pub scholarships: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalized result
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryTrends {
    #[serde(default)]
    pub growth: String,
    #[serde(default)]
    pub demand: String,
    #[serde(default)]
    pub average_salary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerMatch {
    pub career: String,
    pub match_percentage: u32,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub industry_trends: IndustryTrends,
}

/// The reduced projection of an `AnalysisResult` read by report pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub top_career_matches: Vec<CareerMatch>,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
    #[serde(default)]
    pub recommended_learning_path: Vec<String>,
    #[serde(default)]
    pub personality_type: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_analysis: Option<AnalysisResult>,
}
