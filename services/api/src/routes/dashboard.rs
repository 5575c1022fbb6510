//! Dashboard routes: preference-driven aggregation of third-party data
//!
//! Each handler reads the user's stored preferences, calls exactly one
//! provider, and returns whatever that provider produced; providers never
//! fail, they degrade to fallback data.

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    error::ApiResult, models::user::AuthUser, providers::news::filter_by_coins, state::AppState,
};

/// Articles fetched before preference filtering
const NEWS_FETCH_LIMIT: usize = 50;
/// Articles returned to the client after filtering
const NEWS_PAGE_SIZE: usize = 10;
const MEME_COUNT: usize = 10;
const MEME_KEYWORDS: &str = "bitcoin";

/// Get cryptocurrency prices for the user's selected coins
pub async fn prices(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let coins = state.user_repository.get_user_coins(user.id).await?;
    let prices = state.providers.fetch_prices(&coins).await;
    let count = prices.len();

    Ok(Json(json!({
        "success": true,
        "data": { "prices": prices, "count": count },
    })))
}

/// Get news filtered by the user's selected coins
pub async fn news(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let coins = state.user_repository.get_user_coins(user.id).await?;
    let all_news = state.providers.fetch_news(NEWS_FETCH_LIMIT).await;

    let filtered = filter_by_coins(&all_news, &coins);
    let was_filtered = filtered.len() < all_news.len();
    let news: Vec<_> = filtered.into_iter().take(NEWS_PAGE_SIZE).collect();
    let count = news.len();

    Ok(Json(json!({
        "success": true,
        "data": { "news": news, "count": count, "filtered": was_filtered },
    })))
}

/// Get a personalized AI insight for the user's archetype and coins
pub async fn ai_insight(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let (coins, investor_type) = state.user_repository.dashboard_preferences(user.id).await?;
    let insight = state.providers.generate_insight(&investor_type, &coins).await;

    Ok(Json(json!({
        "success": true,
        "data": { "insight": insight },
    })))
}

/// Get crypto memes
pub async fn memes(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let memes = state.providers.fetch_memes(MEME_COUNT, MEME_KEYWORDS).await;
    let count = memes.len();

    Ok(Json(json!({
        "success": true,
        "data": { "memes": memes, "count": count },
    })))
}
