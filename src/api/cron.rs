use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::{error::Result, scheduler::ActionResult};

use super::{require_bearer, AppState};

#[derive(Debug, Serialize)]
pub struct CronResponse {
    pub success: bool,
    pub results: Vec<ActionResult>,
    pub timestamp: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/scheduler", get(run_scheduler).post(run_scheduler))
}

/// Periodic scheduler trigger, intended for an external cron caller.
/// Gated by a shared-secret bearer header when one is configured.
async fn run_scheduler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CronResponse>> {
    require_bearer(&headers, &state.config.cron_secret)?;

    let now = Utc::now();
    let results = state.scheduler.run_scheduler(now).await;

    let failures = results.iter().filter(|r| !r.success).count();
    tracing::info!(
        "Scheduler tick: {} actions, {} failures",
        results.len(),
        failures
    );

    Ok(Json(CronResponse {
        success: true,
        results,
        timestamp: now.to_rfc3339(),
    }))
}
