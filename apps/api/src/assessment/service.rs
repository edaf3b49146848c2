//! Orchestration of the assessment session against the store and the
//! generation handlers.
//!
//! The session map is locked only around state changes. Requests to the
//! generation handlers and store writes run with the lock released; the
//! `submitting` step keeps concurrent calls for the same user out.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::assessment::models::{
    AnalysisResult, AnswerValue, AssessmentResult, Question, ResponseSet,
};
use crate::assessment::normalize::{get_assessment_results, project};
use crate::assessment::requester::AssessmentRequester;
use crate::assessment::session::{Advance, AssessmentSession, SessionError, Step};
use crate::errors::AppError;
use crate::profile::models::UserProfile;
use crate::state::AppState;
use crate::store::{AssessmentRecord, DocumentStore};

/// In-memory sessions, one per user.
#[derive(Default)]
pub struct AssessmentSessions {
    inner: Mutex<HashMap<Uuid, AssessmentSession>>,
}

impl AssessmentSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the user's session, if any.
    pub async fn evict(&self, user_id: Uuid) {
        if self.inner.lock().await.remove(&user_id).is_some() {
            debug!("Dropped assessment session for user {user_id}");
        }
    }

    /// Runs `f` against the user's session under the lock.
    async fn with_session<T>(
        &self,
        user_id: Uuid,
        f: impl FnOnce(&mut AssessmentSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.inner.lock().await;
        let session = sessions.get_mut(&user_id).ok_or(SessionError::NotLoaded)?;
        f(session)
    }
}

/// What the client sees of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub step: Step,
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<u32>,
    pub total_questions: usize,
    pub current_index: usize,
    pub current_question: Option<Question>,
    pub can_advance: bool,
    pub responses: ResponseSet,
    pub results: Option<AssessmentResult>,
    pub analysis: Option<AnalysisResult>,
}

impl From<&AssessmentSession> for SessionView {
    fn from(session: &AssessmentSession) -> Self {
        let set = session.questions();
        SessionView {
            step: session.step(),
            title: set.map(|s| s.title.clone()),
            description: set.map(|s| s.description.clone()),
            estimated_time: set.map(|s| s.estimated_time),
            total_questions: session.question_count(),
            current_index: session.current_index(),
            current_question: session.current_question().cloned(),
            can_advance: session.is_current_answered(),
            responses: session.responses().clone(),
            results: session.result().cloned(),
            analysis: session.analysis().cloned(),
        }
    }
}

/// The assessment operations for one request.
pub struct AssessmentFlow<'a> {
    store: &'a dyn DocumentStore,
    requester: &'a AssessmentRequester,
    sessions: &'a AssessmentSessions,
}

impl<'a> AssessmentFlow<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: state.store.as_ref(),
            requester: &state.requester,
            sessions: state.assessments.as_ref(),
        }
    }

    async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        user.profile.filter(|_| user.profile_completed).ok_or_else(|| {
            AppError::Conflict("Complete your profile before taking the assessment".to_string())
        })
    }

    /// Returns the live session, or opens one: `completed` when a stored
    /// result exists, otherwise `intro` with a freshly requested question set.
    pub async fn load(&self, user_id: Uuid) -> Result<SessionView, AppError> {
        if let Some(session) = self.sessions.inner.lock().await.get(&user_id) {
            return Ok(SessionView::from(session));
        }

        let profile = self.profile(user_id).await?;
        let session = match get_assessment_results(self.store, user_id).await? {
            Some(result) => AssessmentSession::completed(result),
            None => AssessmentSession::intro(self.requester.request_question_set(&profile).await),
        };

        let mut sessions = self.sessions.inner.lock().await;
        let session = sessions.entry(user_id).or_insert(session);
        Ok(SessionView::from(&*session))
    }

    pub async fn start(&self, user_id: Uuid) -> Result<SessionView, AppError> {
        Ok(self
            .sessions
            .with_session(user_id, |s| {
                s.start()?;
                Ok(SessionView::from(&*s))
            })
            .await?)
    }

    pub async fn answer(
        &self,
        user_id: Uuid,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<SessionView, AppError> {
        Ok(self
            .sessions
            .with_session(user_id, |s| {
                s.record_answer(question_id, value)?;
                Ok(SessionView::from(&*s))
            })
            .await?)
    }

    pub async fn previous(&self, user_id: Uuid) -> Result<SessionView, AppError> {
        Ok(self
            .sessions
            .with_session(user_id, |s| {
                s.previous()?;
                Ok(SessionView::from(&*s))
            })
            .await?)
    }

    /// Advances; on the last question runs the analysis and persists the result.
    pub async fn next(&self, user_id: Uuid) -> Result<SessionView, AppError> {
        let submission = self
            .sessions
            .with_session(user_id, |s| match s.advance()? {
                Advance::Moved => Ok(Err(SessionView::from(&*s))),
                Advance::Submit => Ok(Ok(s.responses().clone())),
            })
            .await?;

        let responses = match submission {
            Ok(responses) => responses,
            Err(view) => return Ok(view),
        };

        match self.submit(user_id, &responses).await {
            Ok((analysis, result)) => Ok(self
                .sessions
                .with_session(user_id, |s| {
                    s.finish(analysis, result)?;
                    Ok(SessionView::from(&*s))
                })
                .await?),
            Err(e) => {
                error!("Assessment submission failed for user {user_id}: {e}");
                // Ignore NotLoaded: nothing left to roll back.
                let _ = self
                    .sessions
                    .with_session(user_id, |s| {
                        s.abort_submit();
                        Ok(())
                    })
                    .await;
                Err(e)
            }
        }
    }

    async fn submit(
        &self,
        user_id: Uuid,
        responses: &ResponseSet,
    ) -> Result<(AnalysisResult, AssessmentResult), AppError> {
        let profile = self.profile(user_id).await?;
        let analysis = self.requester.request_analysis(&profile, responses).await;

        let completed_at = Utc::now();
        let result = project(&analysis, &profile.interests, completed_at);
        let record = AssessmentRecord::new(user_id, responses, &analysis, completed_at)?;

        self.store.put_assessment_record(&record).await?;
        self.store.set_assessment_results(user_id, &result).await?;
        info!(
            "Stored assessment for user {user_id}: {} career matches",
            result.top_career_matches.len()
        );
        Ok((analysis, result))
    }

    /// Back to intro with no answers. A session without a question set (one
    /// opened as `completed`) gets a fresh set first.
    pub async fn retake(&self, user_id: Uuid) -> Result<SessionView, AppError> {
        let needs_questions = self
            .sessions
            .with_session(user_id, |s| {
                if s.step() == Step::Submitting {
                    return Err(SessionError::InvalidTransition {
                        action: "retake",
                        step: s.step(),
                    });
                }
                Ok(s.questions().is_none())
            })
            .await?;

        let questions = if needs_questions {
            let profile = self.profile(user_id).await?;
            Some(self.requester.request_question_set(&profile).await)
        } else {
            None
        };

        Ok(self
            .sessions
            .with_session(user_id, |s| {
                s.retake(questions)?;
                Ok(SessionView::from(&*s))
            })
            .await?)
    }
}
