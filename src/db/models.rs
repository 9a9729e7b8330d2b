use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Diamond balance (whole diamonds)
    pub diamond_balance: i64,
    /// Cash balance in cents
    pub cash_balance: i64,
    pub created_at: String,
}

impl User {
    pub fn new(username: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            diamond_balance: 0,
            cash_balance: 0,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

// ============================================================================
// Tournament Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "upcoming",
            TournamentStatus::Ongoing => "ongoing",
            TournamentStatus::Completed => "completed",
            TournamentStatus::Cancelled => "cancelled",
        }
    }

    /// Active means the tournament still occupies its level's slot.
    pub fn is_active(&self) -> bool {
        matches!(self, TournamentStatus::Upcoming | TournamentStatus::Ongoing)
    }
}

impl std::str::FromStr for TournamentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(TournamentStatus::Upcoming),
            "ongoing" => Ok(TournamentStatus::Ongoing),
            "completed" => Ok(TournamentStatus::Completed),
            "cancelled" => Ok(TournamentStatus::Cancelled),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tournament {
    pub id: String,
    pub title: String,
    pub level: String,
    pub status: String,
    pub display_type: String,
    pub is_automated: bool,
    pub accepts_tickets: bool,
    pub max_players: i32,
    pub min_rank: String,
    /// Entry fee in diamonds
    pub entry_fee: i64,
    /// Entry fee in cents
    pub entry_fee_usd: i64,
    pub prize_pool: i64,
    pub prize_pool_usd: i64,
    pub prize_first: i64,
    pub prize_second: i64,
    pub prize_third: i64,
    pub prize_first_usd: i64,
    pub prize_second_usd: i64,
    pub prize_third_usd: i64,
    /// Scheduled start date, "YYYY-MM-DD"
    pub date: String,
    /// Scheduled start time of day, "HH:MM"
    pub time: String,
    /// RFC 3339; None means the tournament never auto-expires
    pub expires_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TournamentParticipant {
    pub tournament_id: String,
    pub user_id: String,
    pub joined_at: String,
}

impl TournamentParticipant {
    pub fn new(tournament_id: String, user_id: String) -> Self {
        Self {
            tournament_id,
            user_id,
            joined_at: Utc::now().to_rfc3339(),
        }
    }
}

// ============================================================================
// Transaction Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    TournamentEntry,
    TournamentRefund,
    PrizeWin,
    WalletTopup,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::TournamentEntry => "tournament_entry",
            TransactionType::TournamentRefund => "tournament_refund",
            TransactionType::PrizeWin => "prize_win",
            TransactionType::WalletTopup => "wallet_topup",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tournament_entry" => Ok(TransactionType::TournamentEntry),
            "tournament_refund" => Ok(TransactionType::TournamentRefund),
            "prize_win" => Ok(TransactionType::PrizeWin),
            "wallet_topup" => Ok(TransactionType::WalletTopup),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Diamonds,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Diamonds => "diamonds",
            Currency::Usd => "usd",
        }
    }

    /// Ledger rows default to diamonds when the currency column is
    /// missing or unrecognized.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "usd" => Currency::Usd,
            _ => Currency::Diamonds,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub transaction_type: String,
    /// Signed amount: negative for debits, positive for credits
    pub amount: i64,
    pub currency: String,
    pub tournament_id: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

impl Transaction {
    pub fn new(
        user_id: String,
        transaction_type: TransactionType,
        amount: i64,
        currency: Currency,
        tournament_id: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            transaction_type: transaction_type.as_str().to_string(),
            amount,
            currency: currency.as_str().to_string(),
            tournament_id,
            description,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for status in [
            TournamentStatus::Upcoming,
            TournamentStatus::Ongoing,
            TournamentStatus::Completed,
            TournamentStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<TournamentStatus>(), Ok(status));
        }
    }

    #[test]
    fn only_upcoming_and_ongoing_are_active() {
        assert!(TournamentStatus::Upcoming.is_active());
        assert!(TournamentStatus::Ongoing.is_active());
        assert!(!TournamentStatus::Completed.is_active());
        assert!(!TournamentStatus::Cancelled.is_active());
    }

    #[test]
    fn unknown_currency_defaults_to_diamonds() {
        assert_eq!(Currency::parse_or_default("usd"), Currency::Usd);
        assert_eq!(Currency::parse_or_default("diamonds"), Currency::Diamonds);
        assert_eq!(Currency::parse_or_default(""), Currency::Diamonds);
    }
}
