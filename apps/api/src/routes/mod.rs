pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::auth::handlers as auth;
use crate::generation::handlers as generation;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Profile API
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_put_profile),
        )
        // Generation API (called by the assessment requesters)
        .route(
            "/api/v1/generate/assessment",
            post(generation::handle_generate_assessment),
        )
        .route(
            "/api/v1/generate/analysis",
            post(generation::handle_generate_analysis),
        )
        // Assessment API
        .route("/api/v1/assessment", get(assessment::handle_get_assessment))
        .route("/api/v1/assessment/start", post(assessment::handle_start))
        .route(
            "/api/v1/assessment/responses/:question_id",
            put(assessment::handle_answer),
        )
        .route("/api/v1/assessment/next", post(assessment::handle_next))
        .route(
            "/api/v1/assessment/previous",
            post(assessment::handle_previous),
        )
        .route("/api/v1/assessment/retake", post(assessment::handle_retake))
        .route("/api/v1/assessment/results", get(assessment::handle_results))
        .route("/api/v1/assessment/status", get(assessment::handle_status))
        .route("/api/v1/assessment/report", get(assessment::handle_report))
        .with_state(state)
}
