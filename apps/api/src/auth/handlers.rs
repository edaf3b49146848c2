//! Axum route handlers for the Auth API.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::{CurrentUser, SESSION_COOKIE};
use crate::auth::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::store::{NewUser, UserRecord};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, alias = "name")]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub profile_completed: bool,
    pub assessment_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserSummary {
    fn from(user: &UserRecord) -> Self {
        UserSummary {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            profile_completed: user.profile_completed,
            assessment_completed: user
                .assessment_results
                .as_ref()
                .is_some_and(|r| r.get("topCareerMatches").is_some()),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserSummary,
}

fn session_cookie(token: &str, max_age_secs: u64) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age_secs}"
    ))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid session cookie: {e}")))
}

async fn open_session(
    state: &AppState,
    user: &UserRecord,
) -> Result<(HeaderMap, Json<SessionResponse>), AppError> {
    let token = state.sessions.create(user.id).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&token, state.config.session_ttl_secs())?,
    );
    Ok((
        headers,
        Json(SessionResponse {
            token,
            user: UserSummary::from(user),
        }),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<SessionResponse>), AppError> {
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let display_name = match req.display_name.trim() {
        "" => email.split('@').next().unwrap_or_default().to_string(),
        name => name.to_string(),
    };

    let user = state
        .store
        .create_user(NewUser {
            email: email.to_string(),
            password_hash: hash_password(req.password).await?,
            display_name,
        })
        .await?;

    info!("Registered user {}", user.id);
    let (headers, body) = open_session(&state, &user).await?;
    Ok((StatusCode::CREATED, headers, body))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<SessionResponse>), AppError> {
    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(req.password, user.password_hash.clone()).await? {
        return Err(AppError::InvalidCredentials);
    }

    info!("User {} logged in", user.id);
    open_session(&state, &user).await
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<(StatusCode, HeaderMap), AppError> {
    state.sessions.revoke(&current.token).await?;
    state.assessments.evict(current.user_id).await;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, session_cookie("", 0)?);
    Ok((StatusCode::NO_CONTENT, headers))
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<UserSummary>, AppError> {
    let user = state
        .store
        .get_user(current.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(UserSummary::from(&user)))
}
