//! Refund Engine
//!
//! Reverses entry-fee transactions for participants of tournaments that
//! never ran. Each participant is refunded independently; one failure
//! never aborts the rest.

use std::sync::Arc;

use crate::{
    audit,
    db::models::{Currency, Tournament, Transaction, TransactionType},
    error::Result,
};

use super::store::SchedulerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundReason {
    NotEnoughPlayers,
    CancelledByHost,
}

impl RefundReason {
    pub fn describe(&self) -> &'static str {
        match self {
            RefundReason::NotEnoughPlayers => "not enough players joined",
            RefundReason::CancelledByHost => "cancelled by host",
        }
    }
}

/// Outcome of a single participant refund attempt.
#[derive(Debug, Clone, Copy)]
pub struct RefundOutcome {
    /// False when the participant had no entry transaction to reverse
    pub refunded: bool,
    pub amount: i64,
    pub currency: Currency,
}

pub struct RefundEngine {
    ctx: Arc<SchedulerStore>,
}

impl RefundEngine {
    pub fn new(ctx: Arc<SchedulerStore>) -> Self {
        Self { ctx }
    }

    /// Refund one participant's entry fee.
    ///
    /// The most recent entry transaction for (tournament, user) determines
    /// both the currency and the amount. A participant with no entry
    /// transaction joined for free; nothing is reversed.
    pub async fn refund_participant(
        &self,
        tournament: &Tournament,
        user_id: &str,
        reason: RefundReason,
    ) -> Result<RefundOutcome> {
        let entry = self
            .ctx
            .find_latest_entry_transaction(&tournament.id, user_id)
            .await?;

        let entry = match entry {
            Some(entry) => entry,
            None => {
                tracing::debug!(
                    "No entry transaction for user {} in tournament {}; nothing to refund",
                    user_id,
                    tournament.id
                );
                return Ok(RefundOutcome {
                    refunded: false,
                    amount: 0,
                    currency: Currency::Diamonds,
                });
            }
        };

        let currency = Currency::parse_or_default(&entry.currency);
        let amount = entry.amount.abs();

        self.ctx.credit_user_balance(user_id, currency, amount).await?;

        let refund = Transaction::new(
            user_id.to_string(),
            TransactionType::TournamentRefund,
            amount,
            currency,
            Some(tournament.id.clone()),
            Some(format!(
                "Refund for {}: {}",
                tournament.title,
                reason.describe()
            )),
        );
        self.ctx.insert_transaction(&refund).await?;

        audit::log_refund(&tournament.id, user_id, amount, currency.as_str());

        Ok(RefundOutcome {
            refunded: true,
            amount,
            currency,
        })
    }

    /// Refund every participant of a tournament, best-effort.
    ///
    /// Returns the number of refunds actually issued. Participant-level
    /// failures are logged and skipped; free entries count as processed
    /// but not refunded.
    pub async fn refund_all(&self, tournament: &Tournament, reason: RefundReason) -> usize {
        let participants = match self.ctx.participant_ids(&tournament.id).await {
            Ok(participants) => participants,
            Err(e) => {
                tracing::error!(
                    "Failed to load participants for tournament {}: {}",
                    tournament.id,
                    e
                );
                return 0;
            }
        };

        let mut refunded = 0;
        for user_id in &participants {
            match self.refund_participant(tournament, user_id, reason).await {
                Ok(outcome) if outcome.refunded => refunded += 1,
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(
                        "Failed to refund user {} for tournament {}: {}",
                        user_id,
                        tournament.id,
                        e
                    );
                }
            }
        }

        tracing::info!(
            "Refunded {} of {} participants for tournament {} ({})",
            refunded,
            participants.len(),
            tournament.title,
            tournament.id
        );

        refunded
    }
}
