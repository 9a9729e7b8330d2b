//! League Server Library
//!
//! This module exposes the server components for integration testing.

pub mod api;
pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod scheduler;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use config::Config;
use scheduler::{levels::LevelRegistry, orchestrator::TournamentScheduler};

/// Creates the application router with all endpoints
pub fn create_app(state: Arc<api::AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(|| async { "League Server" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/cron", api::cron_router().with_state(state.clone()))
        .nest(
            "/api/automated-tournaments",
            api::automated_router().with_state(state),
        )
        .layer(cors)
}

/// Test helper to create an in-memory database and run migrations
pub async fn create_test_db() -> db::DbPool {
    let pool = sqlx::sqlite::SqlitePool::connect(":memory:")
        .await
        .expect("Failed to create in-memory database");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Test helper to create a fully configured test app
pub async fn create_test_app() -> (Router, Arc<api::AppState>) {
    create_test_app_with(Config::for_tests(), LevelRegistry::default()).await
}

/// Test helper with custom config and level registry
pub async fn create_test_app_with(
    config: Config,
    registry: LevelRegistry,
) -> (Router, Arc<api::AppState>) {
    let pool = create_test_db().await;

    let scheduler = Arc::new(TournamentScheduler::new(Arc::new(pool.clone()), registry));

    let state = Arc::new(api::AppState {
        pool,
        scheduler,
        config,
    });

    (create_app(state.clone()), state)
}
