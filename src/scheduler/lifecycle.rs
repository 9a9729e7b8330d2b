//! Lifecycle Manager
//!
//! Status transitions for automated tournaments, run as three passes in a
//! fixed order on every scheduler tick:
//!
//! 1. cancel-unfilled: expired without filling -> cancelled, with refunds
//! 2. expire-filled: expired at capacity -> completed
//! 3. promote-upcoming: scheduled start passed -> ongoing
//!
//! The cancel pass runs before the expire pass so an expired-but-unfilled
//! tournament can never also be marked completed. Participant counts are
//! bounded by max_players at join time, which makes the two passes
//! mutually exclusive and jointly exhaustive over expired tournaments.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;

use crate::{
    audit,
    db::models::{Tournament, TournamentStatus},
};

use super::{
    refunds::{RefundEngine, RefundReason},
    store::SchedulerStore,
    ActionResult,
};

pub struct LifecycleService {
    ctx: Arc<SchedulerStore>,
    refunds: RefundEngine,
}

impl LifecycleService {
    pub fn new(ctx: Arc<SchedulerStore>) -> Self {
        let refunds = RefundEngine::new(ctx.clone());
        Self { ctx, refunds }
    }

    /// Run all three passes in order, collecting per-tournament results.
    /// A failing pass records its failure and never blocks the next pass.
    pub async fn run_passes(&self, now: DateTime<Utc>) -> Vec<ActionResult> {
        let mut results = Vec::new();

        if let Err(e) = self.cancel_unfilled(now, &mut results).await {
            tracing::error!("cancel-unfilled pass failed: {}", e);
            results.push(ActionResult::failure(
                "cancel_unfilled",
                None,
                None,
                e.to_string(),
            ));
        }

        if let Err(e) = self.expire_filled(now, &mut results).await {
            tracing::error!("expire pass failed: {}", e);
            results.push(ActionResult::failure("expire", None, None, e.to_string()));
        }

        if let Err(e) = self.promote_upcoming(now, &mut results).await {
            tracing::error!("promote pass failed: {}", e);
            results.push(ActionResult::failure("promote", None, None, e.to_string()));
        }

        results
    }

    /// Cancel expired tournaments that never filled, refunding everyone
    /// who paid. Empty tournaments skip refunding but still cancel.
    async fn cancel_unfilled(
        &self,
        now: DateTime<Utc>,
        results: &mut Vec<ActionResult>,
    ) -> crate::error::Result<()> {
        let expired = self.ctx.find_expired_automated_tournaments(now).await?;

        for tournament in expired {
            match self.cancel_one_unfilled(&tournament).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {} // filled; the expire pass owns it
                Err(e) => {
                    tracing::error!(
                        "Failed to cancel tournament {}: {}",
                        tournament.id,
                        e
                    );
                    results.push(ActionResult::failure(
                        "cancel_unfilled",
                        Some(tournament.level.clone()),
                        Some(tournament.id.clone()),
                        e.to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    async fn cancel_one_unfilled(
        &self,
        tournament: &Tournament,
    ) -> crate::error::Result<Option<ActionResult>> {
        let count = self.ctx.participant_count(&tournament.id).await?;
        if count >= tournament.max_players as i64 {
            return Ok(None);
        }

        let refunded = if count > 0 {
            self.refunds
                .refund_all(tournament, RefundReason::NotEnoughPlayers)
                .await
        } else {
            0
        };

        self.ctx
            .update_tournament_status(&tournament.id, TournamentStatus::Cancelled)
            .await?;

        audit::log_status_change(&tournament.id, &tournament.status, "cancelled");

        Ok(Some(ActionResult::success(
            "cancel_unfilled",
            Some(tournament.level.clone()),
            Some(tournament.id.clone()),
            format!(
                "Cancelled {} ({} of {} players, {} refunds issued)",
                tournament.title, count, tournament.max_players, refunded
            ),
        )))
    }

    /// Complete expired tournaments that reached capacity. No refunds:
    /// a filled tournament is assumed to have run.
    async fn expire_filled(
        &self,
        now: DateTime<Utc>,
        results: &mut Vec<ActionResult>,
    ) -> crate::error::Result<()> {
        let expired = self.ctx.find_expired_automated_tournaments(now).await?;

        for tournament in expired {
            let count = match self.ctx.participant_count(&tournament.id).await {
                Ok(count) => count,
                Err(e) => {
                    results.push(ActionResult::failure(
                        "expire",
                        Some(tournament.level.clone()),
                        Some(tournament.id.clone()),
                        e.to_string(),
                    ));
                    continue;
                }
            };

            if count != tournament.max_players as i64 {
                continue;
            }

            match self
                .ctx
                .update_tournament_status(&tournament.id, TournamentStatus::Completed)
                .await
            {
                Ok(()) => {
                    audit::log_status_change(&tournament.id, &tournament.status, "completed");
                    results.push(ActionResult::success(
                        "expire",
                        Some(tournament.level.clone()),
                        Some(tournament.id.clone()),
                        format!("Completed {} at capacity", tournament.title),
                    ));
                }
                Err(e) => {
                    results.push(ActionResult::failure(
                        "expire",
                        Some(tournament.level.clone()),
                        Some(tournament.id.clone()),
                        e.to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Move upcoming tournaments whose scheduled start has passed (and
    /// which have not yet expired) into ongoing.
    async fn promote_upcoming(
        &self,
        now: DateTime<Utc>,
        results: &mut Vec<ActionResult>,
    ) -> crate::error::Result<()> {
        let upcoming = self.ctx.find_upcoming_automated_tournaments().await?;

        for tournament in upcoming {
            let start = match scheduled_start(&tournament) {
                Some(start) => start,
                None => {
                    tracing::warn!(
                        "Tournament {} has unparseable start {} {}",
                        tournament.id,
                        tournament.date,
                        tournament.time
                    );
                    continue;
                }
            };

            if start > now || is_expired(&tournament, now) {
                continue;
            }

            match self
                .ctx
                .update_tournament_status(&tournament.id, TournamentStatus::Ongoing)
                .await
            {
                Ok(()) => {
                    audit::log_status_change(&tournament.id, "upcoming", "ongoing");
                    results.push(ActionResult::success(
                        "promote",
                        Some(tournament.level.clone()),
                        Some(tournament.id.clone()),
                        format!("{} is now ongoing", tournament.title),
                    ));
                }
                Err(e) => {
                    results.push(ActionResult::failure(
                        "promote",
                        Some(tournament.level.clone()),
                        Some(tournament.id.clone()),
                        e.to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Scheduled start instant from the stored date and time columns.
fn scheduled_start(tournament: &Tournament) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(
        &format!("{} {}", tournament.date, tournament.time),
        "%Y-%m-%d %H:%M",
    )
    .ok()
    .map(|ndt| ndt.and_utc())
}

fn is_expired(tournament: &Tournament, now: DateTime<Utc>) -> bool {
    match &tournament.expires_at {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(expires) => expires.with_timezone(&Utc) <= now,
            Err(_) => false,
        },
        None => false,
    }
}
