//! Router-level tests. The app is served on a loopback port so that the
//! assessment requesters reach the generation handlers over real HTTP.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::assessment::requester::AssessmentRequester;
use crate::assessment::service::AssessmentSessions;
use crate::auth::sessions::memory::MemorySessionStore;
use crate::config::Config;
use crate::llm_client::{GenerateContentResponse, LlmError, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryDocumentStore;

/// What the stub model does for one kind of prompt.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Status(u16),
    MissingKey,
}

impl Reply {
    fn answer(&self) -> Result<GenerateContentResponse, LlmError> {
        match self {
            Reply::Text(text) => Ok(GenerateContentResponse::from_text(text.clone())),
            Reply::Status(status) => Err(LlmError::Api {
                status: *status,
                message: "stubbed failure".to_string(),
            }),
            Reply::MissingKey => Err(LlmError::MissingApiKey),
        }
    }
}

/// Answers question prompts and analysis prompts separately.
pub struct StubGenerator {
    pub questions: Reply,
    pub analysis: Reply,
    pub calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(questions: Reply, analysis: Reply) -> Self {
        Self {
            questions,
            analysis,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains("assessment responses") {
            self.analysis.answer()
        } else {
            self.questions.answer()
        }
    }
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        redis_url: "redis://unused".to_string(),
        gemini_api_key: Some("test-key".to_string()),
        gemini_api_base: "http://127.0.0.1:9".to_string(),
        internal_api_url: base_url.to_string(),
        session_ttl_hours: 1,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: Arc<MemoryDocumentStore>,
    pub generator: Arc<StubGenerator>,
}

/// State over in-memory stores. The requester targets `base_url`.
pub fn test_state(
    base_url: &str,
    generator: Arc<StubGenerator>,
) -> (AppState, Arc<MemoryDocumentStore>) {
    let store = Arc::new(MemoryDocumentStore::new());
    let state = AppState {
        store: store.clone(),
        sessions: Arc::new(MemorySessionStore::default()),
        generator,
        requester: AssessmentRequester::new(base_url).unwrap(),
        assessments: Arc::new(AssessmentSessions::new()),
        config: test_config(base_url),
    };
    (state, store)
}

/// Binds first so the requester can be pointed at the app's own address.
pub async fn spawn_app(generator: StubGenerator) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let generator = Arc::new(generator);
    let (state, store) = test_state(&base_url, generator.clone());

    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    TestApp {
        base_url,
        client: reqwest::Client::new(),
        store,
        generator,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Registers a user and returns its bearer token.
    pub async fn register(&self, email: &str) -> String {
        let res = self
            .client
            .post(self.url("/api/v1/auth/register"))
            .json(&json!({"email": email, "password": "correct horse", "displayName": "Asha"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn save_profile(&self, token: &str, interests: &[&str]) {
        let res = self
            .client
            .put(self.url("/api/v1/profile"))
            .bearer_auth(token)
            .json(&json!({
                "name": "Asha",
                "age": 20,
                "course": "graduation-pursuing",
                "stream": "bsc",
                "interests": interests,
                "location": "Pune"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    /// A registered user with a completed profile.
    pub async fn student(&self, interests: &[&str]) -> String {
        let token = self.register("asha@example.com").await;
        self.save_profile(&token, interests).await;
        token
    }

    pub async fn call(&self, method: reqwest::Method, path: &str, token: &str) -> (StatusCode, Value) {
        let res = self
            .client
            .request(method, self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn answer(&self, token: &str, question_id: &str, value: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .put(self.url(&format!("/api/v1/assessment/responses/{question_id}")))
            .bearer_auth(token)
            .json(&json!({ "value": value }))
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    const TWO_QUESTIONS: &str = r#"{
        "title": "Ocean Careers",
        "description": "Tailored to you",
        "estimatedTime": 10,
        "questions": [
            {"id": "q1", "type": "mcq", "category": "Interests", "question": "Pick one", "options": ["Sea", "Land"], "required": true},
            {"id": "q2", "type": "scale", "category": "Work", "question": "Rate fieldwork",
             "scaleRange": {"min": 1, "max": 5, "minLabel": "Low", "maxLabel": "High"}, "required": true}
        ]
    }"#;

    const SEA_ANALYSIS: &str = r#"Here is the analysis you asked for:
{"overallAnalysis": "You are drawn to the sea.",
 "recommendedCareers": [{"title": "Marine Biologist", "match": "91%", "description": "Study ocean life",
   "growthPath": "Research Assistant → Scientist", "averageSalary": "₹5-12 LPA",
   "keySkills": ["Biology", "Fieldwork"], "educationPath": "B.Sc Zoology"}],
 "actionPlan": [{"timeline": "0-6 months", "actions": ["Volunteer at an aquarium", "Read papers"]}]}
Good luck!"#;

    fn stub(questions: Reply, analysis: Reply) -> StubGenerator {
        StubGenerator::new(questions, analysis)
    }

    async fn answer_two_questions(app: &TestApp, token: &str) {
        let (status, _) = app.call(Method::POST, "/api/v1/assessment/start", token).await;
        assert_eq!(status, StatusCode::OK);
        let (status, view) = app.answer(token, "q1", json!("Sea")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["canAdvance"], true);
        let (status, view) = app.call(Method::POST, "/api/v1/assessment/next", token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["currentIndex"], 1);
        let (status, _) = app.answer(token, "q2", json!(4)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let app = spawn_app(stub(Reply::MissingKey, Reply::MissingKey)).await;
        let body: Value = app
            .client
            .get(app.url("/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "skill-bridge-api");
    }

    #[tokio::test]
    async fn test_assessment_requires_login() {
        let app = spawn_app(stub(Reply::MissingKey, Reply::MissingKey)).await;
        let res = app
            .client
            .get(app.url("/api/v1/assessment"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_assessment_requires_profile() {
        let app = spawn_app(stub(Reply::MissingKey, Reply::MissingKey)).await;
        let token = app.register("new@example.com").await;
        let (status, body) = app.call(Method::GET, "/api/v1/assessment", &token).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Complete your profile"));
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let app = spawn_app(stub(Reply::MissingKey, Reply::MissingKey)).await;
        app.student(&["Design"]).await;

        let res = app
            .client
            .post(app.url("/api/v1/auth/login"))
            .json(&json!({"email": "ASHA@example.com", "password": "correct horse"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        let token = body["token"].as_str().unwrap().to_string();

        let (status, me) = app.call(Method::GET, "/api/v1/auth/me", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["profileCompleted"], true);
        assert_eq!(me["assessmentCompleted"], false);
        assert!(me["createdAt"].is_string());

        let res = app
            .client
            .post(app.url("/api/v1/auth/login"))
            .json(&json!({"email": "asha@example.com", "password": "wrong password"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_generated_question_set_passes_through_verbatim() {
        let model_object = json!({
            "title": "Tailored",
            "description": "d",
            "estimatedTime": 20,
            "questions": [{"id": "x1", "type": "text", "category": "c", "question": "Why?", "required": true}],
            "difficulty": "gentle"
        });
        let reply = format!("```json\n{model_object}\n```");
        let app = spawn_app(stub(Reply::Text(reply), Reply::MissingKey)).await;

        let res = app
            .client
            .post(app.url("/api/v1/generate/assessment"))
            .json(&json!({"prompt": "make questions", "userProfile": {"name": "Asha"}}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["assessment"], model_object);
    }

    #[tokio::test]
    async fn test_generation_rejects_missing_input() {
        let app = spawn_app(stub(Reply::MissingKey, Reply::MissingKey)).await;

        let res = app
            .client
            .post(app.url("/api/v1/generate/assessment"))
            .json(&json!({"prompt": "make questions"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["message"], "Prompt and user profile are required");

        let res = app
            .client
            .post(app.url("/api/v1/generate/analysis"))
            .json(&json!({"prompt": "p", "userProfile": {}}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unusable_model_text_serves_three_questions() {
        let app = spawn_app(stub(
            Reply::Text("I'd rather not answer in JSON.".to_string()),
            Reply::MissingKey,
        ))
        .await;
        let token = app.student(&["Design"]).await;

        let (status, view) = app.call(Method::GET, "/api/v1/assessment", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], "intro");
        assert_eq!(view["title"], "Career Assessment");
        assert_eq!(view["totalQuestions"], 3);
    }

    #[tokio::test]
    async fn test_upstream_failure_serves_five_questions() {
        let app = spawn_app(stub(Reply::Status(503), Reply::MissingKey)).await;

        let res = app
            .client
            .post(app.url("/api/v1/generate/assessment"))
            .json(&json!({"prompt": "make questions", "userProfile": {"name": "Asha"}}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

        let token = app.student(&["Design"]).await;
        let (_, view) = app.call(Method::GET, "/api/v1/assessment", &token).await;
        assert_eq!(view["totalQuestions"], 5);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_a_configuration_error() {
        let app = spawn_app(stub(Reply::MissingKey, Reply::MissingKey)).await;
        let res = app
            .client
            .post(app.url("/api/v1/generate/analysis"))
            .json(&json!({"prompt": "p", "userProfile": {}, "responses": {}}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_full_assessment_round_trip() {
        let app = spawn_app(stub(
            Reply::Text(TWO_QUESTIONS.to_string()),
            Reply::Text(SEA_ANALYSIS.to_string()),
        ))
        .await;
        let token = app.student(&["Biology"]).await;

        let (_, view) = app.call(Method::GET, "/api/v1/assessment", &token).await;
        assert_eq!(view["title"], "Ocean Careers");
        assert_eq!(view["totalQuestions"], 2);

        answer_two_questions(&app, &token).await;
        let (status, view) = app.call(Method::POST, "/api/v1/assessment/next", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], "results");
        assert_eq!(view["analysis"]["recommendedCareers"][0]["title"], "Marine Biologist");

        let (status, results) = app.call(Method::GET, "/api/v1/assessment/results", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["topCareerMatches"][0]["career"], "Marine Biologist");
        assert_eq!(results["topCareerMatches"][0]["matchPercentage"], 91);
        assert_eq!(
            results["recommendedLearningPath"][0],
            "0-6 months: Volunteer at an aquarium, Read papers"
        );
        assert_eq!(results["interests"], json!(["Biology"]));

        let (_, status_body) = app.call(Method::GET, "/api/v1/assessment/status", &token).await;
        assert_eq!(status_body["completed"], true);
        assert_eq!(status_body["needsRetake"], false);

        let (status, report) = app.call(Method::GET, "/api/v1/assessment/report", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["analysis"]["overallAnalysis"], "You are drawn to the sea.");
        assert_eq!(
            report["insights"]["careerRecommendations"][0]["career"],
            "Marine Biologist"
        );

        let (_, me) = app.call(Method::GET, "/api/v1/auth/me", &token).await;
        assert_eq!(me["assessmentCompleted"], true);
    }

    #[tokio::test]
    async fn test_analysis_failure_uses_heuristic() {
        let app = spawn_app(stub(
            Reply::Text(TWO_QUESTIONS.to_string()),
            Reply::Status(500),
        ))
        .await;
        let token = app.student(&["Design", "Art"]).await;

        app.call(Method::GET, "/api/v1/assessment", &token).await;
        answer_two_questions(&app, &token).await;
        let (status, view) = app.call(Method::POST, "/api/v1/assessment/next", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["results"]["topCareerMatches"][0]["career"], "UX/UI Designer");
        assert_eq!(view["results"]["topCareerMatches"][0]["matchPercentage"], 83);
    }

    #[tokio::test]
    async fn test_next_requires_an_answer() {
        let app = spawn_app(stub(
            Reply::Text(TWO_QUESTIONS.to_string()),
            Reply::MissingKey,
        ))
        .await;
        let token = app.student(&["Design"]).await;

        let (status, _) = app.call(Method::POST, "/api/v1/assessment/start", &token).await;
        assert_eq!(status, StatusCode::CONFLICT);

        app.call(Method::GET, "/api/v1/assessment", &token).await;
        app.call(Method::POST, "/api/v1/assessment/start", &token).await;
        let (status, _) = app.call(Method::POST, "/api/v1/assessment/next", &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.answer(&token, "q2", json!(9)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failed_persistence_returns_to_last_question() {
        let app = spawn_app(stub(
            Reply::Text(TWO_QUESTIONS.to_string()),
            Reply::Text(SEA_ANALYSIS.to_string()),
        ))
        .await;
        let token = app.student(&["Biology"]).await;

        app.call(Method::GET, "/api/v1/assessment", &token).await;
        answer_two_questions(&app, &token).await;

        app.store.set_fail_writes(true).await;
        let (status, body) = app.call(Method::POST, "/api/v1/assessment/next", &token).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");

        let (_, view) = app.call(Method::GET, "/api/v1/assessment", &token).await;
        assert_eq!(view["step"], "assessment");
        assert_eq!(view["currentIndex"], 1);
        assert_eq!(view["responses"]["q2"], 4.0);

        app.store.set_fail_writes(false).await;
        let (status, view) = app.call(Method::POST, "/api/v1/assessment/next", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], "results");
    }

    #[tokio::test]
    async fn test_retake_resets_to_intro() {
        let app = spawn_app(stub(
            Reply::Text(TWO_QUESTIONS.to_string()),
            Reply::Text(SEA_ANALYSIS.to_string()),
        ))
        .await;
        let token = app.student(&["Biology"]).await;

        app.call(Method::GET, "/api/v1/assessment", &token).await;
        answer_two_questions(&app, &token).await;
        app.call(Method::POST, "/api/v1/assessment/next", &token).await;

        let (status, view) = app.call(Method::POST, "/api/v1/assessment/retake", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], "intro");
        assert_eq!(view["totalQuestions"], 2);
        assert_eq!(view["responses"], json!({}));
        assert_eq!(view["results"], Value::Null);

        // Stored results survive a retake until the next submission.
        let (status, _) = app.call(Method::GET, "/api/v1/assessment/results", &token).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_logout_drops_assessment_session() {
        let app = spawn_app(stub(
            Reply::Text(TWO_QUESTIONS.to_string()),
            Reply::MissingKey,
        ))
        .await;
        let token = app.student(&["Biology"]).await;

        app.call(Method::GET, "/api/v1/assessment", &token).await;
        let (_, view) = app.call(Method::POST, "/api/v1/assessment/start", &token).await;
        assert_eq!(view["step"], "assessment");

        let res = app
            .client
            .post(app.url("/api/v1/auth/logout"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = app
            .client
            .post(app.url("/api/v1/auth/login"))
            .json(&json!({"email": "asha@example.com", "password": "correct horse"}))
            .send()
            .await
            .unwrap();
        let body: Value = res.json().await.unwrap();
        let token = body["token"].as_str().unwrap().to_string();

        let (status, _) = app.call(Method::POST, "/api/v1/assessment/next", &token).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (_, view) = app.call(Method::GET, "/api/v1/assessment", &token).await;
        assert_eq!(view["step"], "intro");
    }

    #[tokio::test]
    async fn test_results_missing_is_not_found() {
        let app = spawn_app(stub(Reply::MissingKey, Reply::MissingKey)).await;
        let token = app.student(&["Design"]).await;
        let (status, _) = app.call(Method::GET, "/api/v1/assessment/results", &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = app.call(Method::GET, "/api/v1/assessment/status", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["completed"], false);
    }
}
