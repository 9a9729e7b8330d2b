//! Persistence port for the scheduler.
//!
//! Every database touch the scheduler needs goes through this store; the
//! rest of the subsystem stays pure or orchestration-only. Any backing
//! store satisfying these operations would do — tests run it against an
//! in-memory SQLite pool.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::{
    db::{
        models::{Currency, Tournament, TournamentStatus, Transaction, TransactionType},
        DbPool,
    },
    error::{AppError, Result},
};

use super::levels::Level;

pub struct SchedulerStore {
    pool: Arc<DbPool>,
}

impl SchedulerStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// The active (upcoming or ongoing) automated tournament for a level,
    /// if one exists. This is the duplicate-creation guard.
    pub async fn find_active_automated_tournament(
        &self,
        level: Level,
    ) -> Result<Option<Tournament>> {
        Ok(sqlx::query_as::<_, Tournament>(
            "SELECT * FROM tournaments
             WHERE level = ? AND is_automated = 1 AND status IN ('upcoming', 'ongoing')
             LIMIT 1",
        )
        .bind(level.as_str())
        .fetch_optional(&*self.pool)
        .await?)
    }

    pub async fn insert_automated_tournament(&self, tournament: &Tournament) -> Result<()> {
        sqlx::query(
            "INSERT INTO tournaments (
                id, title, level, status, display_type, is_automated, accepts_tickets,
                max_players, min_rank, entry_fee, entry_fee_usd,
                prize_pool, prize_pool_usd,
                prize_first, prize_second, prize_third,
                prize_first_usd, prize_second_usd, prize_third_usd,
                date, time, expires_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&tournament.id)
        .bind(&tournament.title)
        .bind(&tournament.level)
        .bind(&tournament.status)
        .bind(&tournament.display_type)
        .bind(tournament.is_automated)
        .bind(tournament.accepts_tickets)
        .bind(tournament.max_players)
        .bind(&tournament.min_rank)
        .bind(tournament.entry_fee)
        .bind(tournament.entry_fee_usd)
        .bind(tournament.prize_pool)
        .bind(tournament.prize_pool_usd)
        .bind(tournament.prize_first)
        .bind(tournament.prize_second)
        .bind(tournament.prize_third)
        .bind(tournament.prize_first_usd)
        .bind(tournament.prize_second_usd)
        .bind(tournament.prize_third_usd)
        .bind(&tournament.date)
        .bind(&tournament.time)
        .bind(&tournament.expires_at)
        .bind(&tournament.created_at)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    /// Automated tournaments still in an active status whose expiry has
    /// passed. Expiry comparison happens here after parsing, so rows with
    /// a malformed or missing expiry are never picked up.
    pub async fn find_expired_automated_tournaments(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Tournament>> {
        let candidates = sqlx::query_as::<_, Tournament>(
            "SELECT * FROM tournaments
             WHERE is_automated = 1
               AND status IN ('upcoming', 'ongoing')
               AND expires_at IS NOT NULL",
        )
        .fetch_all(&*self.pool)
        .await?;

        Ok(candidates
            .into_iter()
            .filter(|t| match &t.expires_at {
                Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                    Ok(expires) => expires.with_timezone(&Utc) <= now,
                    Err(_) => false,
                },
                None => false,
            })
            .collect())
    }

    /// All automated tournaments still waiting to start.
    pub async fn find_upcoming_automated_tournaments(&self) -> Result<Vec<Tournament>> {
        Ok(sqlx::query_as::<_, Tournament>(
            "SELECT * FROM tournaments WHERE is_automated = 1 AND status = 'upcoming'",
        )
        .fetch_all(&*self.pool)
        .await?)
    }

    pub async fn update_tournament_status(
        &self,
        tournament_id: &str,
        status: TournamentStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE tournaments SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(tournament_id)
            .execute(&*self.pool)
            .await?;

        Ok(())
    }

    /// Cancel every active automated tournament for a level. Used by the
    /// manual stop override, which deliberately skips the refund engine.
    pub async fn cancel_active_automated(&self, level: Level) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tournaments SET status = 'cancelled'
             WHERE level = ? AND is_automated = 1 AND status IN ('upcoming', 'ongoing')",
        )
        .bind(level.as_str())
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn participant_ids(&self, tournament_id: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM tournament_participants
             WHERE tournament_id = ? ORDER BY joined_at",
        )
        .bind(tournament_id)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

    pub async fn participant_count(&self, tournament_id: &str) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tournament_participants WHERE tournament_id = ?",
        )
        .bind(tournament_id)
        .fetch_one(&*self.pool)
        .await?;

        Ok(count)
    }

    /// The most recent entry-fee transaction for a participant in a
    /// tournament. None means the participant never paid (free entry).
    pub async fn find_latest_entry_transaction(
        &self,
        tournament_id: &str,
        user_id: &str,
    ) -> Result<Option<Transaction>> {
        Ok(sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions
             WHERE tournament_id = ? AND user_id = ? AND transaction_type = ?
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(tournament_id)
        .bind(user_id)
        .bind(TransactionType::TournamentEntry.as_str())
        .fetch_optional(&*self.pool)
        .await?)
    }

    /// Credit a user's balance in the given currency. Errors when the user
    /// row does not exist so refund failures surface per participant.
    pub async fn credit_user_balance(
        &self,
        user_id: &str,
        currency: Currency,
        amount: i64,
    ) -> Result<()> {
        let query = match currency {
            Currency::Diamonds => {
                "UPDATE users SET diamond_balance = diamond_balance + ? WHERE id = ?"
            }
            Currency::Usd => "UPDATE users SET cash_balance = cash_balance + ? WHERE id = ?",
        };

        let result = sqlx::query(query)
            .bind(amount)
            .bind(user_id)
            .execute(&*self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User not found: {}", user_id)));
        }

        Ok(())
    }

    pub async fn insert_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            "INSERT INTO transactions (
                id, user_id, transaction_type, amount, currency,
                tournament_id, description, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&transaction.id)
        .bind(&transaction.user_id)
        .bind(&transaction.transaction_type)
        .bind(transaction.amount)
        .bind(&transaction.currency)
        .bind(&transaction.tournament_id)
        .bind(&transaction.description)
        .bind(&transaction.created_at)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }
}
