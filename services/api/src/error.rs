//! Custom error types for the API service
//!
//! The taxonomy maps one-to-one to HTTP statuses at the response boundary;
//! every error path produces the uniform `{success: false, message, errors?}`
//! JSON envelope. Third-party failures never reach this type: they are
//! absorbed inside the providers module.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single field-scoped validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input, one entry per violated field
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Missing/invalid/expired token or bad credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Duplicate unique key
    #[error("{0}")]
    Conflict(String),

    /// Referenced entity absent
    #[error("{0}")]
    NotFound(String),

    /// Anything unclassified
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message, None),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    internal_message(&format!("{:#}", e)),
                    None,
                )
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    internal_message(&e.to_string()),
                    None,
                )
            }
        };

        let mut body = json!({
            "success": false,
            "message": message,
        });
        if let Some(errors) = errors {
            body["errors"] = json!(errors);
        }

        (status, Json(body)).into_response()
    }
}

/// Production responses carry a generic message; development includes the
/// underlying error detail.
fn internal_message(detail: &str) -> String {
    let production = std::env::var("APP_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    if production {
        "Internal server error".to_string()
    } else {
        format!("Internal server error: {}", detail)
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
