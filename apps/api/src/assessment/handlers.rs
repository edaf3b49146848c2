//! Axum route handlers for the Assessment API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assessment::insights::{AssessmentStatus, ReportInsights};
use crate::assessment::models::{AnalysisResult, AnswerValue, AssessmentResult};
use crate::assessment::normalize::get_assessment_results;
use crate::assessment::service::{AssessmentFlow, SessionView};
use crate::auth::extractor::CurrentUser;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub value: AnswerValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub results: AssessmentResult,
    pub analysis: Option<AnalysisResult>,
    pub insights: ReportInsights,
}

// ────────────────────────────────────────────────────────────────────────────
// Session handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/assessment
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(AssessmentFlow::new(&state).load(current.user_id).await?))
}

/// POST /api/v1/assessment/start
pub async fn handle_start(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(AssessmentFlow::new(&state).start(current.user_id).await?))
}

/// PUT /api/v1/assessment/responses/:question_id
pub async fn handle_answer(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(question_id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(
        AssessmentFlow::new(&state)
            .answer(current.user_id, &question_id, req.value)
            .await?,
    ))
}

/// POST /api/v1/assessment/next
pub async fn handle_next(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(AssessmentFlow::new(&state).next(current.user_id).await?))
}

/// POST /api/v1/assessment/previous
pub async fn handle_previous(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(AssessmentFlow::new(&state).previous(current.user_id).await?))
}

/// POST /api/v1/assessment/retake
pub async fn handle_retake(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(AssessmentFlow::new(&state).retake(current.user_id).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Result handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/assessment/results
pub async fn handle_results(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<AssessmentResult>, AppError> {
    get_assessment_results(state.store.as_ref(), current.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No assessment results".to_string()))
}

/// GET /api/v1/assessment/status
pub async fn handle_status(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<AssessmentStatus>, AppError> {
    let results = get_assessment_results(state.store.as_ref(), current.user_id).await?;
    Ok(Json(AssessmentStatus::of(results, Utc::now())))
}

/// GET /api/v1/assessment/report
/// Normalized result, the full analysis it came from, and derived insights.
pub async fn handle_report(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ReportResponse>, AppError> {
    let results = get_assessment_results(state.store.as_ref(), current.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No assessment results".to_string()))?;

    let analysis = match results.full_analysis.clone() {
        Some(analysis) => Some(analysis),
        None => state
            .store
            .get_assessment_record(current.user_id)
            .await?
            .and_then(|record| record.analysis)
            .and_then(|raw| match serde_json::from_value::<AnalysisResult>(raw) {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    warn!("Stored analysis for user {} is unreadable: {e}", current.user_id);
                    None
                }
            }),
    };

    Ok(Json(ReportResponse {
        insights: ReportInsights::build(&results, Utc::now()),
        analysis,
        results,
    }))
}
