//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    config::AppConfig,
    jwt::JwtService,
    providers::Providers,
    repositories::{UserRepository, VoteRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub vote_repository: VoteRepository,
    pub jwt_service: JwtService,
    pub providers: Providers,
    pub config: AppConfig,
}
