//! Projection of a raw analysis into the normalized result, migration of
//! older records, and the result lookup used by every report endpoint.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessment::models::{
    percentage_of, AnalysisResult, AssessmentResult, CareerMatch, IndustryTrends,
};
use crate::store::{AssessmentRecord, DocumentStore, StoreError};

const PERSONALITY_CHARS: usize = 100;
const DEFAULT_PERSONALITY: &str = "Analytical";
const DEFAULT_SALARY: &str = "Competitive";

const MIGRATED_CAREER: &str = "Unknown Career";
const MIGRATED_MATCH: u32 = 70;
const MIGRATED_ACTIONS: &str = "Continue learning";

/// First 100 characters of the narrative, or "Analytical" when there is none.
pub fn personality_type(narrative: &str) -> String {
    let head: String = narrative.chars().take(PERSONALITY_CHARS).collect();
    if head.is_empty() {
        DEFAULT_PERSONALITY.to_string()
    } else {
        head
    }
}

fn trends(average_salary: &str) -> IndustryTrends {
    IndustryTrends {
        growth: "Positive".to_string(),
        demand: "High".to_string(),
        average_salary: if average_salary.is_empty() {
            DEFAULT_SALARY.to_string()
        } else {
            average_salary.to_string()
        },
    }
}

/// Normalized result for a fresh submission. The raw analysis is kept in
/// `full_analysis`.
pub fn project(
    analysis: &AnalysisResult,
    interests: &[String],
    completed_at: DateTime<Utc>,
) -> AssessmentResult {
    AssessmentResult {
        top_career_matches: analysis
            .recommended_careers
            .iter()
            .map(|c| CareerMatch {
                career: c.title.clone(),
                match_percentage: c.match_percentage,
                required_skills: c.key_skills.clone(),
                industry_trends: trends(&c.average_salary),
            })
            .collect(),
        skill_gaps: analysis.skill_development.clone(),
        recommended_learning_path: analysis
            .action_plan
            .iter()
            .map(|p| format!("{}: {}", p.timeline, p.actions.join(", ")))
            .collect(),
        personality_type: personality_type(&analysis.overall_analysis),
        interests: interests.to_vec(),
        completed_at: Some(completed_at),
        full_analysis: Some(analysis.clone()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Migration
// ────────────────────────────────────────────────────────────────────────────

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn string_items(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn non_empty_or(s: &str, default: &str) -> String {
    if s.is_empty() {
        default.to_string()
    } else {
        s.to_string()
    }
}

/// Rebuilds a normalized result from a raw analysis of any age. Missing or
/// malformed pieces take defaults; this never fails.
pub fn migrate(analysis: Option<&Value>, completed_at: Option<DateTime<Utc>>) -> AssessmentResult {
    let completed_at = Some(completed_at.unwrap_or_else(Utc::now));

    let analysis = match analysis {
        Some(value) if value.is_object() => value,
        _ => {
            return AssessmentResult {
                personality_type: "Unknown".to_string(),
                completed_at,
                ..Default::default()
            }
        }
    };

    let top_career_matches = array_field(analysis, "recommendedCareers")
        .iter()
        .map(|career| {
            let score = career.get("match").map(percentage_of).unwrap_or_default();
            CareerMatch {
                career: non_empty_or(str_field(career, "title"), MIGRATED_CAREER),
                match_percentage: if score == 0 { MIGRATED_MATCH } else { score },
                required_skills: string_items(array_field(career, "keySkills")),
                industry_trends: trends(str_field(career, "averageSalary")),
            }
        })
        .collect();

    let recommended_learning_path = array_field(analysis, "actionPlan")
        .iter()
        .map(|phase| {
            let actions = string_items(array_field(phase, "actions")).join(", ");
            format!(
                "{}: {}",
                str_field(phase, "timeline"),
                non_empty_or(&actions, MIGRATED_ACTIONS)
            )
        })
        .collect();

    AssessmentResult {
        top_career_matches,
        skill_gaps: string_items(array_field(analysis, "skillDevelopment")),
        recommended_learning_path,
        personality_type: personality_type(str_field(analysis, "overallAnalysis")),
        interests: Vec::new(),
        completed_at,
        full_analysis: None,
    }
}

/// Whether an embedded document is in the current normalized shape.
fn is_current_shape(value: &Value) -> bool {
    value
        .get("topCareerMatches")
        .is_some_and(|v| !v.is_null())
}

async fn migrate_from_record(
    store: &dyn DocumentStore,
    user_id: Uuid,
) -> Result<Option<AssessmentResult>, StoreError> {
    let Some(AssessmentRecord {
        analysis,
        completed_at,
        ..
    }) = store.get_assessment_record(user_id).await?
    else {
        return Ok(None);
    };

    let migrated = migrate(analysis.as_ref(), completed_at);
    store.set_assessment_results(user_id, &migrated).await?;
    info!("Migrated stored assessment for user {user_id}");
    Ok(Some(migrated))
}

/// The user's normalized result.
///
/// 1. The embedded result when it is in the current shape.
/// 2. Otherwise the raw assessment record, migrated and written back.
/// 3. Otherwise (or when migration fails) whatever the user record holds.
pub async fn get_assessment_results(
    store: &dyn DocumentStore,
    user_id: Uuid,
) -> Result<Option<AssessmentResult>, StoreError> {
    let Some(user) = store.get_user(user_id).await? else {
        return Ok(None);
    };

    if let Some(value) = user.assessment_results.as_ref().filter(|v| is_current_shape(v)) {
        match serde_json::from_value::<AssessmentResult>(value.clone()) {
            Ok(result) => return Ok(Some(result)),
            Err(e) => warn!("Stored result for user {user_id} is unreadable: {e}"),
        }
    }

    match migrate_from_record(store, user_id).await {
        Ok(Some(result)) => return Ok(Some(result)),
        Ok(None) => {}
        Err(e) => warn!("Error migrating assessment results for user {user_id}: {e}"),
    }

    Ok(user
        .assessment_results
        .and_then(|v| serde_json::from_value(v).ok()))
}
