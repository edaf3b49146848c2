use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::extractor::CurrentUser;
use crate::errors::AppError;
use crate::profile::models::UserProfile;
use crate::profile::validation::{validate_profile, ProfileInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: Option<UserProfile>,
    pub profile_completed: bool,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state
        .store
        .get_user(current.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(ProfileResponse {
        profile_completed: user.profile_completed,
        profile: user.profile,
    }))
}

/// PUT /api/v1/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(input): Json<ProfileInput>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = validate_profile(input)?;
    state.store.save_profile(current.user_id, &profile).await?;
    info!("Saved profile for user {}", current.user_id);

    Ok(Json(ProfileResponse {
        profile: Some(profile),
        profile_completed: true,
    }))
}
