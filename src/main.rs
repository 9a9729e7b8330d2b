use league_server::scheduler::{levels::LevelRegistry, orchestrator::TournamentScheduler};
use league_server::{api, config, create_app, db};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load config
    let config = config::Config::from_env();
    tracing::info!("Starting league server on {}", config.server_addr());

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    // Run migrations
    db::run_migrations(&pool).await?;

    // Create the tournament scheduler with the production level registry
    let scheduler = Arc::new(TournamentScheduler::new(
        Arc::new(pool.clone()),
        LevelRegistry::default(),
    ));

    // Shared state for the API
    let state = Arc::new(api::AppState {
        pool: pool.clone(),
        scheduler: scheduler.clone(),
        config: config.clone(),
    });

    let app = create_app(state);

    // Spawn the periodic scheduler tick. Failed ticks are logged and
    // retried on the next interval; every entry point is idempotent per
    // level, so a truncated tick is safe.
    let tick_scheduler = scheduler.clone();
    let tick_secs = config.scheduler_tick_secs;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(tick_secs));
        loop {
            interval.tick().await;
            let results = tick_scheduler.run_scheduler(chrono::Utc::now()).await;
            for result in results.iter().filter(|r| !r.success) {
                tracing::warn!(
                    "Scheduler action {} failed for level {:?}: {}",
                    result.action,
                    result.level,
                    result.message
                );
            }
        }
    });

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server_addr()).await?;
    tracing::info!("Server listening on {}", config.server_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
