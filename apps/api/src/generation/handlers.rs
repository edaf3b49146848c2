//! Axum route handlers for the internal Generation API.
//!
//! Both handlers follow the same protocol: reject missing input, call the
//! generation endpoint once, recover a JSON object from the reply and validate
//! its top-level keys. Unusable model output is answered with a fixed payload
//! and status 200; only missing input, missing configuration and upstream
//! transport failures are errors.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::assessment::models::{AnalysisResult, AssessmentQuestionSet};
use crate::errors::AppError;
use crate::generation::defaults::{fallback_analysis, fallback_question_set};
use crate::generation::parse::{parse_analysis, parse_question_set};
use crate::llm_client::TextGenerator;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAssessmentRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub user_profile: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAnalysisRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub user_profile: Option<Value>,
    #[serde(default)]
    pub responses: Option<Value>,
}

/// Either the model's object, verbatim, or the fixed payload.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Generated<T> {
    Model(Value),
    Fallback(T),
}

#[derive(Debug, Serialize)]
pub struct AssessmentEnvelope {
    pub assessment: Generated<AssessmentQuestionSet>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisEnvelope {
    pub analysis: Generated<AnalysisResult>,
}

fn present(value: &Option<Value>) -> bool {
    value.as_ref().is_some_and(|v| !v.is_null())
}

fn non_empty_prompt(prompt: Option<String>) -> Option<String> {
    prompt.filter(|p| !p.trim().is_empty())
}

/// One upstream call; returns the text of the first candidate part.
async fn generate_text(generator: &dyn TextGenerator, prompt: &str) -> Result<String, AppError> {
    let envelope = generator.generate(prompt).await?;
    envelope
        .text()
        .map(str::to_string)
        .ok_or_else(|| AppError::Llm("No content generated from Gemini".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate/assessment
pub async fn handle_generate_assessment(
    State(state): State<AppState>,
    Json(req): Json<GenerateAssessmentRequest>,
) -> Result<Json<AssessmentEnvelope>, AppError> {
    let prompt = match non_empty_prompt(req.prompt) {
        Some(prompt) if present(&req.user_profile) => prompt,
        _ => {
            return Err(AppError::Validation(
                "Prompt and user profile are required".to_string(),
            ))
        }
    };

    let text = generate_text(state.generator.as_ref(), &prompt).await?;

    let assessment = match parse_question_set(&text) {
        Ok(value) => {
            info!("Generated assessment question set");
            Generated::Model(value)
        }
        Err(e) => {
            warn!("Unusable question set from model ({e}); serving fallback set");
            Generated::Fallback(fallback_question_set())
        }
    };

    Ok(Json(AssessmentEnvelope { assessment }))
}

/// POST /api/v1/generate/analysis
pub async fn handle_generate_analysis(
    State(state): State<AppState>,
    Json(req): Json<GenerateAnalysisRequest>,
) -> Result<Json<AnalysisEnvelope>, AppError> {
    let prompt = match non_empty_prompt(req.prompt) {
        Some(prompt) if present(&req.user_profile) && present(&req.responses) => prompt,
        _ => {
            return Err(AppError::Validation(
                "Prompt, user profile, and responses are required".to_string(),
            ))
        }
    };

    let text = generate_text(state.generator.as_ref(), &prompt).await?;

    let analysis = match parse_analysis(&text) {
        Ok(value) => {
            info!("Generated career analysis");
            Generated::Model(value)
        }
        Err(e) => {
            warn!("Unusable analysis from model ({e}); serving stock analysis");
            Generated::Fallback(fallback_analysis())
        }
    };

    Ok(Json(AnalysisEnvelope { analysis }))
}
