//! Structured audit logging for money-moving and scheduler events.
//!
//! Balance credits, refunds, and tournament status changes are logged
//! with a dedicated target for structured output.

/// Log a scheduler action (create, stop_level, ...)
pub fn log_scheduler_action(action: &str, level: &str, details: &str) {
    tracing::info!(
        target: "audit",
        event = "scheduler",
        scheduler_action = action,
        level = level,
        details = details,
        "Scheduler {}: level {} - {}",
        action,
        level,
        details
    );
}

/// Log a tournament status transition
pub fn log_status_change(tournament_id: &str, from: &str, to: &str) {
    tracing::info!(
        target: "audit",
        event = "status_change",
        tournament_id = tournament_id,
        from = from,
        to = to,
        "Tournament {} status: {} -> {}",
        tournament_id,
        from,
        to
    );
}

/// Log a refund issued to a participant
pub fn log_refund(tournament_id: &str, user_id: &str, amount: i64, currency: &str) {
    tracing::info!(
        target: "audit",
        event = "refund",
        tournament_id = tournament_id,
        user_id = user_id,
        amount = amount,
        currency = currency,
        "Refund: {} {} to user {} for tournament {}",
        amount,
        currency,
        user_id,
        tournament_id
    );
}
