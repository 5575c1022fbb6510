//! User profile and preference routes

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    models::preferences::PreferencesInput,
    models::user::AuthUser,
    state::AppState,
};

/// Get the current user's full profile
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": { "user": profile },
    })))
}

/// Get the stored preferences; `preferences` is null before onboarding
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let preferences = state.user_repository.get_preferences(user.id).await?;

    let has_completed_onboarding = preferences
        .as_ref()
        .and_then(|p| p.get("onboardingCompleted"))
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    Ok(Json(json!({
        "success": true,
        "data": {
            "preferences": preferences,
            "hasCompletedOnboarding": has_completed_onboarding,
        },
    })))
}

/// Validate and store a new preferences document (onboarding)
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PreferencesInput>,
) -> ApiResult<impl IntoResponse> {
    let document = payload.validate().map_err(ApiError::Validation)?;

    let stored = state
        .user_repository
        .update_preferences(user.id, &document)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Preferences updated successfully",
        "data": { "preferences": stored },
    })))
}
