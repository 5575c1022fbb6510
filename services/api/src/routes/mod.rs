//! HTTP surface: route wiring, CORS, request tracing, and the 404 fallback

pub mod auth;
pub mod dashboard;
pub mod user;
pub mod votes;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, Uri, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::{middleware::auth_middleware, state::AppState};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);

    let protected = Router::new()
        .route("/api/user/me", get(user::me))
        .route(
            "/api/user/preferences",
            get(user::get_preferences).put(user::update_preferences),
        )
        .route("/api/dashboard/prices", get(dashboard::prices))
        .route("/api/dashboard/news", get(dashboard::news))
        .route("/api/dashboard/ai", get(dashboard::ai_insight))
        .route("/api/dashboard/memes", get(dashboard::memes))
        .route("/api/votes", post(votes::cast))
        .route("/api/votes/my-votes", get(votes::my_votes))
        .route("/api/votes/stats", get(votes::stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(api_root))
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .fallback(route_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to the configured frontend origin, with credentials
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!("Invalid FRONTEND_URL, cross-origin requests will be denied: {}", e);
            layer
        }
    }
}

/// API root
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "AI Crypto Advisor API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "api": "/api",
        },
    }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.config.environment,
    }))
}

/// Handler for unmatched routes
async fn route_not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": format!("Route {} {} not found", method, uri.path()),
        })),
    )
}
