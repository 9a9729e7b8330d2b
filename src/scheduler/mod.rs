pub mod factory;
pub mod levels;
pub mod lifecycle;
pub mod orchestrator;
pub mod refunds;
pub mod schedule;
pub mod store;

use serde::Serialize;

/// One scheduler action and its outcome, returned to callers for
/// logging and the admin UI.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament_id: Option<String>,
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn success(
        action: &str,
        level: Option<String>,
        tournament_id: Option<String>,
        message: String,
    ) -> Self {
        Self {
            action: action.to_string(),
            level,
            tournament_id,
            success: true,
            message,
        }
    }

    pub fn failure(
        action: &str,
        level: Option<String>,
        tournament_id: Option<String>,
        message: String,
    ) -> Self {
        Self {
            action: action.to_string(),
            level,
            tournament_id,
            success: false,
            message,
        }
    }
}
