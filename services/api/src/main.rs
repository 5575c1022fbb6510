use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod config;
mod error;
mod jwt;
mod middleware;
mod models;
mod providers;
mod repositories;
mod routes;
mod state;
mod validation;

use common::database::{DatabaseConfig, health_check, init_pool};
use tokio::net::TcpListener;
use tokio::signal;

use crate::{
    config::{AppConfig, ProviderConfig},
    jwt::{JwtConfig, JwtService},
    providers::Providers,
    repositories::{UserRepository, VoteRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting AI Crypto Advisor API");

    let app_config = AppConfig::from_env();

    // The signing secret is a required startup precondition; provider API
    // keys are not (their absence selects fallback data instead).
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!("./migrations").run(&pool).await?;

    let provider_config = ProviderConfig::from_env();
    let providers = Providers::new(provider_config)?;

    let user_repository = UserRepository::new(pool.clone());
    let vote_repository = VoteRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool.clone(),
        user_repository,
        vote_repository,
        jwt_service,
        providers,
        config: app_config.clone(),
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = format!("0.0.0.0:{}", app_config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API listening on {} | env={}", addr, app_config.environment);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, releasing database pool");
    pool.close().await;

    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM, letting in-flight
/// requests finish before the server returns.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
