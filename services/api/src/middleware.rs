//! Authentication middleware for bearer-token validation
//!
//! Every protected request re-confirms the user against the store: the
//! token payload alone is never trusted, so a deleted or mutated account is
//! reflected immediately at the cost of one store round trip per request.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::warn;

use crate::{error::ApiError, jwt::TokenError, models::user::AuthUser, state::AppState};

/// Split an Authorization header value into its bearer token
///
/// The header must be exactly two space-separated parts with a `Bearer`
/// scheme; anything else is rejected.
fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;

    if scheme != "Bearer" || token.is_empty() || parts.next().is_some() {
        return None;
    }

    Some(token)
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract the Authorization header
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Authorization header missing".to_string()))?;

    let token = parse_bearer(auth_header).ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        )
    })?;

    // Validate the token
    let claims = state.jwt_service.verify_token(token).map_err(|e| {
        match e {
            TokenError::Expired => warn!("Rejected expired token"),
            TokenError::Invalid => warn!("Rejected invalid token"),
        }
        ApiError::Unauthorized(e.to_string())
    })?;

    // Check that the user still exists in the store
    let profile = state
        .user_repository
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    // Expose the identity to downstream handlers
    req.extensions_mut().insert(AuthUser {
        id: profile.id,
        email: profile.email,
        name: profile.name,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer_accepts_exactly_two_parts() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn test_parse_bearer_rejects_wrong_scheme() {
        assert_eq!(parse_bearer("Basic abc"), None);
        assert_eq!(parse_bearer("bearer abc"), None);
    }

    #[test]
    fn test_parse_bearer_rejects_wrong_arity() {
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Bearer a b"), None);
        assert_eq!(parse_bearer("Bearer  a"), None);
        assert_eq!(parse_bearer(""), None);
    }
}
