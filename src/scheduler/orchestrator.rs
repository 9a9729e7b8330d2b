//! Scheduler Orchestrator
//!
//! The periodic entry point. Every invocation runs the lifecycle passes
//! first, then walks the level registry deciding whether each level is
//! due a new tournament. Repeated invocations are safe: a level with an
//! active automated tournament is always skipped, which is the sole
//! duplicate-creation guard (reinforced by a partial unique index at the
//! persistence layer).

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::{
    audit,
    db::{models::Tournament, DbPool},
    error::{AppError, Result},
};

use super::{
    factory,
    levels::{Level, LevelRegistry},
    lifecycle::LifecycleService,
    schedule,
    store::SchedulerStore,
    ActionResult,
};

pub struct TournamentScheduler {
    ctx: Arc<SchedulerStore>,
    registry: LevelRegistry,
    lifecycle: LifecycleService,
}

impl TournamentScheduler {
    pub fn new(pool: Arc<DbPool>, registry: LevelRegistry) -> Self {
        let ctx = Arc::new(SchedulerStore::new(pool));
        let lifecycle = LifecycleService::new(ctx.clone());
        Self {
            ctx,
            registry,
            lifecycle,
        }
    }

    /// Periodic tick. Runs the lifecycle passes, then creates a tournament
    /// for each level whose trigger window contains `now` and which has no
    /// active tournament. One level's failure never blocks the others.
    pub async fn run_scheduler(&self, now: DateTime<Utc>) -> Vec<ActionResult> {
        let mut results = self.lifecycle.run_passes(now).await;

        for level in self.registry.all() {
            match self.process_level(level, now).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {} // not due yet
                Err(e) => {
                    tracing::error!("Scheduler failed for level {}: {}", level.as_str(), e);
                    results.push(ActionResult::failure(
                        "create",
                        Some(level.as_str().to_string()),
                        None,
                        e.to_string(),
                    ));
                }
            }
        }

        results
    }

    /// On-demand admin trigger. Skips the trigger-window check entirely:
    /// every level without an active tournament gets one created at its
    /// next scheduled time, pre-populating the schedule.
    pub async fn run_manual_scheduler(&self, now: DateTime<Utc>) -> Vec<ActionResult> {
        let mut results = self.lifecycle.run_passes(now).await;

        for level in self.registry.all() {
            let result = async {
                if self
                    .ctx
                    .find_active_automated_tournament(level)
                    .await?
                    .is_some()
                {
                    return Ok(ActionResult::failure(
                        "create",
                        Some(level.as_str().to_string()),
                        None,
                        "Active tournament already exists".to_string(),
                    ));
                }

                let config = self
                    .registry
                    .get(level)
                    .ok_or_else(|| AppError::BadRequest("Unknown level".to_string()))?;

                let start = schedule::next_scheduled_time(config, now);
                let tournament = self.create_for_level(level, start).await?;

                Ok::<_, AppError>(ActionResult::success(
                    "create",
                    Some(level.as_str().to_string()),
                    Some(tournament.id.clone()),
                    format!("Created {} starting {} {}", tournament.title, tournament.date, tournament.time),
                ))
            }
            .await;

            match result {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(
                        "Manual scheduler failed for level {}: {}",
                        level.as_str(),
                        e
                    );
                    results.push(ActionResult::failure(
                        "create",
                        Some(level.as_str().to_string()),
                        None,
                        e.to_string(),
                    ));
                }
            }
        }

        results
    }

    /// Manual override: cancel every active automated tournament for a
    /// level. Deliberately does not run the refund engine; only the
    /// lifecycle cancel-unfilled pass refunds.
    pub async fn stop_level(&self, level: Level) -> Result<u64> {
        let cancelled = self.ctx.cancel_active_automated(level).await?;
        audit::log_scheduler_action(
            "stop_level",
            level.as_str(),
            &format!("{} tournaments cancelled", cancelled),
        );
        Ok(cancelled)
    }

    /// Manual override counterpart to stop: a no-op placeholder. The next
    /// periodic tick recreates the level's tournament when due.
    pub fn start_level(&self, level: Level) -> String {
        format!(
            "Level {} will resume on the next scheduler run",
            level.as_str()
        )
    }

    async fn process_level(
        &self,
        level: Level,
        now: DateTime<Utc>,
    ) -> Result<Option<ActionResult>> {
        if self
            .ctx
            .find_active_automated_tournament(level)
            .await?
            .is_some()
        {
            return Ok(Some(ActionResult::failure(
                "create",
                Some(level.as_str().to_string()),
                None,
                "Active tournament already exists".to_string(),
            )));
        }

        let config = match self.registry.get(level) {
            Some(config) => config,
            None => return Ok(None),
        };

        if !schedule::should_create_now(config, now) {
            return Ok(None);
        }

        let start = schedule::normalize_start(config, now);
        let tournament = self.create_for_level(level, start).await?;

        Ok(Some(ActionResult::success(
            "create",
            Some(level.as_str().to_string()),
            Some(tournament.id.clone()),
            format!("Created {}", tournament.title),
        )))
    }

    async fn create_for_level(&self, level: Level, start: DateTime<Utc>) -> Result<Tournament> {
        let tournament = factory::create_tournament_record(&self.registry, level, start)
            .ok_or_else(|| AppError::BadRequest("Unknown level".to_string()))?;

        self.ctx.insert_automated_tournament(&tournament).await?;

        audit::log_scheduler_action(
            "create",
            level.as_str(),
            &format!("{} ({})", tournament.title, tournament.id),
        );
        tracing::info!(
            "Created automated tournament {} for level {} starting {} {}",
            tournament.id,
            level.as_str(),
            tournament.date,
            tournament.time
        );

        Ok(tournament)
    }
}
