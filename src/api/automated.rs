use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    scheduler::{levels::Level, ActionResult},
};

use super::{require_bearer, AppState};

// ==================== Request/Response Types ====================

#[derive(Debug, Serialize)]
pub struct ManualRunResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<ActionResult>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub level: String,
    /// "stop" cancels the level's active tournaments; "start" defers to
    /// the next scheduler run
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub message: String,
}

// ==================== Router ====================

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(run_manual_scheduler))
        .route("/toggle", post(toggle_level))
}

// ==================== Handlers ====================

/// Admin trigger: create tournaments for every idle level at its next
/// scheduled time, without waiting for the periodic job.
async fn run_manual_scheduler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ManualRunResponse>> {
    require_bearer(&headers, &state.config.admin_token)?;

    let results = state.scheduler.run_manual_scheduler(Utc::now()).await;
    let created = results
        .iter()
        .filter(|r| r.action == "create" && r.success)
        .count();

    Ok(Json(ManualRunResponse {
        success: true,
        message: format!("Manual scheduler run complete: {} tournaments created", created),
        results,
    }))
}

/// Admin override for a single level. Stopping cancels the level's active
/// tournaments without refunds; starting is a placeholder that defers to
/// the next scheduler tick.
async fn toggle_level(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>> {
    require_bearer(&headers, &state.config.admin_token)?;

    let level: Level = req
        .level
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown level: {}", req.level)))?;

    match req.action.as_str() {
        "stop" => {
            let cancelled = state.scheduler.stop_level(level).await?;
            Ok(Json(ToggleResponse {
                success: true,
                message: format!(
                    "Stopped level {}: {} tournaments cancelled",
                    level.as_str(),
                    cancelled
                ),
            }))
        }
        "start" => Ok(Json(ToggleResponse {
            success: true,
            message: state.scheduler.start_level(level),
        })),
        other => Err(AppError::Validation(format!(
            "Action must be 'stop' or 'start', got '{}'",
            other
        ))),
    }
}
