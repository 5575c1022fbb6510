//! Authentication routes: register and login

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult, FieldError},
    repositories::user::is_unique_violation,
    state::AppState,
    validation::{validate_email, validate_name, validate_password},
};

/// Identical message for unknown email and wrong password, so responses
/// cannot be used to enumerate accounts
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Request for user registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = Vec::new();
    if let Err(message) = validate_email(&payload.email) {
        errors.push(FieldError::new("email", message));
    }
    if let Err(message) = validate_name(&payload.name) {
        errors.push(FieldError::new("name", message));
    }
    if let Err(message) = validate_password(&payload.password) {
        errors.push(FieldError::new("password", message));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let email = payload.email.trim().to_lowercase();
    let name = payload.name.trim().to_string();

    if state.user_repository.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let user = match state
        .user_repository
        .create(&email, &name, &payload.password)
        .await
    {
        Ok(user) => user,
        // The store's unique-email enforcement is authoritative
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        Err(e) => return Err(ApiError::Internal(e)),
    };

    let token = state.jwt_service.issue_token(user.id, &user.email)?;

    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "data": {
                "user": {
                    "id": user.id,
                    "email": user.email,
                    "name": user.name,
                    "createdAt": user.created_at,
                },
                "token": token,
            },
        })),
    ))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = payload.email.trim().to_lowercase();

    let user = state
        .user_repository
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let valid = state
        .user_repository
        .verify_password(&user, &payload.password)
        .await?;
    if !valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.jwt_service.issue_token(user.id, &user.email)?;

    info!("User {} logged in", user.id);

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "user": {
                    "id": user.id,
                    "email": user.email,
                    "name": user.name,
                    "preferences": user.preferences,
                },
                "token": token,
            },
        })),
    ))
}
