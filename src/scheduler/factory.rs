//! Tournament Factory
//!
//! Builds fully populated automated tournament records. Pure: persistence
//! is the orchestrator's job, guarded there by the active-tournament check.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::models::{Tournament, TournamentStatus};

use super::{
    levels::{Level, LevelRegistry},
    schedule,
};

/// Prize split across first/second/third place, in percent. Fixed for all
/// levels.
pub const PRIZE_SPLIT: [i64; 3] = [50, 30, 20];

/// Fallback prize pool when a level has no fixed pool configured:
/// entry fee times this multiplier.
pub const PRIZE_POOL_MULTIPLIER: i64 = 10;

/// Exchange rate used to mirror a single-currency prize pool into the
/// other currency: 100 diamonds per USD.
pub const DIAMONDS_PER_USD: i64 = 100;

fn usd_cents_to_diamonds(cents: i64) -> i64 {
    cents * DIAMONDS_PER_USD / 100
}

fn diamonds_to_usd_cents(diamonds: i64) -> i64 {
    diamonds * 100 / DIAMONDS_PER_USD
}

fn split(pool: i64) -> (i64, i64, i64) {
    (
        pool * PRIZE_SPLIT[0] / 100,
        pool * PRIZE_SPLIT[1] / 100,
        pool * PRIZE_SPLIT[2] / 100,
    )
}

/// Build the tournament record for `level` starting at `start`.
///
/// Returns None when the level is not in the registry; callers treat that
/// as a no-op.
pub fn create_tournament_record(
    registry: &LevelRegistry,
    level: Level,
    start: DateTime<Utc>,
) -> Option<Tournament> {
    let config = registry.get(level)?;

    let mut prize_pool = config
        .fixed_prize_pool_diamonds
        .unwrap_or(config.entry_fee_diamonds * PRIZE_POOL_MULTIPLIER);
    let mut prize_pool_usd = config
        .fixed_prize_pool_usd
        .unwrap_or(config.entry_fee_usd * PRIZE_POOL_MULTIPLIER);

    // A level denominated in one currency still advertises the other at
    // the fixed exchange rate.
    if prize_pool == 0 && prize_pool_usd > 0 {
        prize_pool = usd_cents_to_diamonds(prize_pool_usd);
    } else if prize_pool_usd == 0 && prize_pool > 0 {
        prize_pool_usd = diamonds_to_usd_cents(prize_pool);
    }

    let (prize_first, prize_second, prize_third) = split(prize_pool);
    let (prize_first_usd, prize_second_usd, prize_third_usd) = split(prize_pool_usd);

    let expires_at = schedule::expiry_time(start, config);

    Some(Tournament {
        id: Uuid::new_v4().to_string(),
        title: format!("{} League", level.display_name()),
        level: level.as_str().to_string(),
        status: TournamentStatus::Upcoming.as_str().to_string(),
        display_type: "tournament".to_string(),
        is_automated: true,
        accepts_tickets: true,
        max_players: config.max_players,
        min_rank: config.min_rank.clone(),
        entry_fee: config.entry_fee_diamonds,
        entry_fee_usd: config.entry_fee_usd,
        prize_pool,
        prize_pool_usd,
        prize_first,
        prize_second,
        prize_third,
        prize_first_usd,
        prize_second_usd,
        prize_third_usd,
        date: start.format("%Y-%m-%d").to_string(),
        time: start.format("%H:%M").to_string(),
        expires_at: Some(expires_at.to_rfc3339()),
        created_at: Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::levels::{LevelConfig, ScheduleKind};
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 19, 30, 0).unwrap()
    }

    #[test]
    fn builds_upcoming_automated_record() {
        let registry = LevelRegistry::default();
        let t = create_tournament_record(&registry, Level::Platinum, start()).unwrap();

        assert_eq!(t.title, "Platinum League");
        assert_eq!(t.level, "platinum");
        assert_eq!(t.status, "upcoming");
        assert!(t.is_automated);
        assert!(t.accepts_tickets);
        assert_eq!(t.display_type, "tournament");
        assert_eq!(t.date, "2025-03-10");
        assert_eq!(t.time, "19:30");
    }

    #[test]
    fn prize_split_is_fifty_thirty_twenty() {
        let registry = LevelRegistry::default();
        let t = create_tournament_record(&registry, Level::Platinum, start()).unwrap();

        assert_eq!(t.prize_pool, 20_000);
        assert_eq!(t.prize_first, 10_000);
        assert_eq!(t.prize_second, 6_000);
        assert_eq!(t.prize_third, 4_000);
    }

    #[test]
    fn usd_level_mirrors_pool_into_diamonds() {
        let registry = LevelRegistry::default();
        let t = create_tournament_record(&registry, Level::Diamond, start()).unwrap();

        // $450.00 fixed pool
        assert_eq!(t.prize_pool_usd, 45_000);
        assert_eq!(t.prize_pool, 45_000 * DIAMONDS_PER_USD / 100);
        assert_eq!(t.prize_first_usd, 22_500);
    }

    #[test]
    fn missing_fixed_pool_falls_back_to_fee_multiplier() {
        let registry = LevelRegistry::new(vec![(
            Level::Gold,
            LevelConfig {
                schedule: ScheduleKind::Hourly,
                duration_ms: 60_000,
                entry_fee_diamonds: 30,
                entry_fee_usd: 0,
                fixed_prize_pool_diamonds: None,
                fixed_prize_pool_usd: None,
                max_players: 10,
                min_rank: "bronze".to_string(),
            },
        )]);
        let t = create_tournament_record(&registry, Level::Gold, start()).unwrap();

        assert_eq!(t.prize_pool, 30 * PRIZE_POOL_MULTIPLIER);
        assert_eq!(t.prize_pool_usd, diamonds_to_usd_cents(t.prize_pool));
    }

    #[test]
    fn unknown_level_returns_none() {
        let registry = LevelRegistry::new(vec![]);
        assert!(create_tournament_record(&registry, Level::Gold, start()).is_none());
    }

    #[test]
    fn expiry_derives_from_level_duration() {
        let registry = LevelRegistry::default();
        let t = create_tournament_record(&registry, Level::Platinum, start()).unwrap();

        let expires = t.expires_at.unwrap();
        let expires = chrono::DateTime::parse_from_rfc3339(&expires).unwrap();
        assert_eq!(
            expires.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2025, 3, 10, 21, 30, 0).unwrap()
        );
    }
}
