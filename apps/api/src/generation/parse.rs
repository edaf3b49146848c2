//! Turns raw model text into a validated JSON payload.
//!
//! Validation only checks the top-level keys the pages depend on; the rest of
//! the payload is passed through untouched.

use serde_json::Value;
use thiserror::Error;

use crate::llm_client::extract::{extract_json_object, ExtractError};

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Invalid assessment structure: missing questions array")]
    InvalidQuestionSet,

    #[error("Invalid analysis structure: missing overallAnalysis or recommendedCareers")]
    InvalidAnalysis,
}

/// Valid when the object carries a `questions` array.
pub fn parse_question_set(text: &str) -> Result<Value, PayloadError> {
    let value = extract_json_object(text)?;
    match value.get("questions") {
        Some(Value::Array(_)) => Ok(value),
        _ => Err(PayloadError::InvalidQuestionSet),
    }
}

/// Valid when `overallAnalysis` is a non-empty string and `recommendedCareers`
/// is an array.
pub fn parse_analysis(text: &str) -> Result<Value, PayloadError> {
    let value = extract_json_object(text)?;
    let has_narrative = value
        .get("overallAnalysis")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    let has_careers = value
        .get("recommendedCareers")
        .is_some_and(Value::is_array);

    if has_narrative && has_careers {
        Ok(value)
    } else {
        Err(PayloadError::InvalidAnalysis)
    }
}
