pub mod automated;
pub mod cron;

use axum::http::HeaderMap;
use std::sync::Arc;

use crate::{
    config::Config,
    db::DbPool,
    error::{AppError, Result},
    scheduler::orchestrator::TournamentScheduler,
};

/// Shared state for the scheduler endpoints
pub struct AppState {
    pub pool: DbPool,
    pub scheduler: Arc<TournamentScheduler>,
    pub config: Config,
}

pub use automated::router as automated_router;
pub use cron::router as cron_router;

/// Check a bearer token against an optional configured secret. When no
/// secret is configured the endpoint is open (development only; config
/// refuses to start production without secrets).
pub(crate) fn require_bearer(headers: &HeaderMap, expected: &Option<String>) -> Result<()> {
    let expected = match expected {
        Some(expected) => expected,
        None => return Ok(()),
    };

    let token = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    if token != expected {
        return Err(AppError::Unauthorized);
    }

    Ok(())
}
