//! Vote routes

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult, FieldError},
    models::user::AuthUser,
    models::vote::is_valid_section,
    state::AppState,
};

/// Request for casting a vote
#[derive(Deserialize)]
pub struct CastVoteRequest {
    pub section: String,
    /// true for upvote, false for downvote
    pub vote: bool,
}

/// Cast a vote on a dashboard section
pub async fn cast(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CastVoteRequest>,
) -> ApiResult<impl IntoResponse> {
    if !is_valid_section(&payload.section) {
        return Err(ApiError::Validation(vec![FieldError::new(
            "section",
            "Section must be one of: prices, news, ai, memes",
        )]));
    }

    let vote = state
        .vote_repository
        .insert(user.id, &payload.section, payload.vote)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Vote recorded",
            "data": { "vote": vote },
        })),
    ))
}

/// Get the current user's voting history, most recent first
pub async fn my_votes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let votes = state.vote_repository.list_by_user(user.id).await?;
    let count = votes.len();

    Ok(Json(json!({
        "success": true,
        "data": { "votes": votes, "count": count },
    })))
}

/// Get voting statistics for all four sections
pub async fn stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = state.vote_repository.stats().await?;

    Ok(Json(json!({
        "success": true,
        "data": { "stats": stats },
    })))
}
