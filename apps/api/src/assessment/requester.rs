//! HTTP client for this service's own generation handlers.
//!
//! The requester never fails: any transport error, non-2xx status or body
//! without a usable payload is replaced by the requester-side fallback.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::assessment::fallback::{default_question_set, heuristic_analysis};
use crate::assessment::models::{AnalysisResult, AssessmentQuestionSet, ResponseSet};
use crate::assessment::prompts::{build_analysis_prompt, build_question_prompt};
use crate::profile::models::UserProfile;

const ASSESSMENT_PATH: &str = "/api/v1/generate/assessment";
const ANALYSIS_PATH: &str = "/api/v1/generate/analysis";

/// Covers one upstream generation call plus the handler's own work.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(130);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRequest<'a> {
    prompt: String,
    user_profile: &'a UserProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisRequest<'a> {
    prompt: String,
    user_profile: &'a UserProfile,
    responses: &'a ResponseSet,
}

#[derive(Clone)]
pub struct AssessmentRequester {
    client: Client,
    base_url: String,
}

impl AssessmentRequester {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// POSTs `body` and returns the payload under `key`, or a reason why
    /// there is none.
    async fn post_for<B, T>(&self, path: &str, body: &B, key: &str) -> Result<T, String>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format!("handler returned {status}: {text}"));
        }

        let mut envelope: Value = response
            .json()
            .await
            .map_err(|e| format!("unreadable body: {e}"))?;

        match envelope.get_mut(key).map(Value::take) {
            Some(Value::Null) | None => Err(format!("no '{key}' in response")),
            Some(payload) => {
                serde_json::from_value(payload).map_err(|e| format!("unusable '{key}': {e}"))
            }
        }
    }

    /// Question set for `profile`; the five-question default on any failure.
    pub async fn request_question_set(&self, profile: &UserProfile) -> AssessmentQuestionSet {
        let body = QuestionRequest {
            prompt: build_question_prompt(profile),
            user_profile: profile,
        };

        match self
            .post_for::<_, AssessmentQuestionSet>(ASSESSMENT_PATH, &body, "assessment")
            .await
        {
            Ok(set) if !set.questions.is_empty() => {
                info!("Loaded {} assessment questions", set.questions.len());
                set
            }
            Ok(_) => {
                warn!("Generated question set is empty; using default questions");
                default_question_set()
            }
            Err(reason) => {
                warn!("Question generation unavailable ({reason}); using default questions");
                default_question_set()
            }
        }
    }

    /// Analysis of `responses`; the heuristic analysis on any failure.
    pub async fn request_analysis(
        &self,
        profile: &UserProfile,
        responses: &ResponseSet,
    ) -> AnalysisResult {
        let body = AnalysisRequest {
            prompt: build_analysis_prompt(profile, responses),
            user_profile: profile,
            responses,
        };

        match self
            .post_for::<_, AnalysisResult>(ANALYSIS_PATH, &body, "analysis")
            .await
        {
            Ok(analysis) => analysis,
            Err(reason) => {
                warn!("Analysis unavailable ({reason}); using heuristic analysis");
                heuristic_analysis(profile, responses)
            }
        }
    }
}
