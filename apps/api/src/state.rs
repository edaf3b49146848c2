use std::sync::Arc;

use crate::assessment::requester::AssessmentRequester;
use crate::assessment::service::AssessmentSessions;
use crate::auth::sessions::SessionStore;
use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// Production: `GeminiClient`.
    pub generator: Arc<dyn TextGenerator>,
    /// Talks to this service's own `/api/v1/generate/*` handlers.
    pub requester: AssessmentRequester,
    pub assessments: Arc<AssessmentSessions>,
    pub config: Config,
}
