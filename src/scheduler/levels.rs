//! Level Registry
//!
//! Static configuration for each tournament tier. The registry is plain
//! read-only data handed to the scheduler at construction time, so tests
//! can substitute alternate tiers (including a minutely test cadence)
//! without touching production config.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Gold,
    Platinum,
    Diamond,
    Master,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Gold => "gold",
            Level::Platinum => "platinum",
            Level::Diamond => "diamond",
            Level::Master => "master",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Level::Gold => "Gold",
            Level::Platinum => "Platinum",
            Level::Diamond => "Diamond",
            Level::Master => "Master",
        }
    }
}

impl std::str::FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(Level::Gold),
            "platinum" => Ok(Level::Platinum),
            "diamond" => Ok(Level::Diamond),
            "master" => Ok(Level::Master),
            _ => Err(()),
        }
    }
}

/// When tournaments for a level are triggered.
///
/// Fixed times are naive wall-clock times of day; the configured order is
/// insertion order, but trigger selection compares minutes since midnight.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleKind {
    /// A new tournament every hour, on the hour
    Hourly,
    /// A new tournament at each configured time of day
    FixedTimes(Vec<NaiveTime>),
    /// Every minute; only used by tests
    Minutely,
}

#[derive(Debug, Clone)]
pub struct LevelConfig {
    pub schedule: ScheduleKind,
    /// Tournament lifetime after its scheduled start
    pub duration_ms: i64,
    /// Entry fee in diamonds (0 = free in diamonds)
    pub entry_fee_diamonds: i64,
    /// Entry fee in cents (0 = free in USD)
    pub entry_fee_usd: i64,
    /// Fixed prize pool in diamonds; None falls back to fee * multiplier
    pub fixed_prize_pool_diamonds: Option<i64>,
    /// Fixed prize pool in cents; None falls back to fee * multiplier
    pub fixed_prize_pool_usd: Option<i64>,
    pub max_players: i32,
    pub min_rank: String,
}

/// Ordered collection of level configurations.
///
/// Iteration order is fixed (gold, platinum, diamond, master for the
/// production registry); display tie-breaks rely on it, scheduling
/// correctness does not.
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    levels: Vec<(Level, LevelConfig)>,
}

impl LevelRegistry {
    pub fn new(levels: Vec<(Level, LevelConfig)>) -> Self {
        Self { levels }
    }

    /// Look up a level's configuration. Unknown levels are a no-op for
    /// callers, never an error.
    pub fn get(&self, level: Level) -> Option<&LevelConfig> {
        self.levels
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, config)| config)
    }

    /// All configured levels in registry order.
    pub fn all(&self) -> impl Iterator<Item = Level> + '_ {
        self.levels.iter().map(|(level, _)| *level)
    }
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::new(vec![
            (
                Level::Gold,
                LevelConfig {
                    schedule: ScheduleKind::Hourly,
                    duration_ms: 55 * 60 * 1000,
                    entry_fee_diamonds: 50,
                    entry_fee_usd: 0,
                    fixed_prize_pool_diamonds: Some(5_000),
                    fixed_prize_pool_usd: None,
                    max_players: 100,
                    min_rank: "bronze".to_string(),
                },
            ),
            (
                Level::Platinum,
                LevelConfig {
                    schedule: ScheduleKind::FixedTimes(vec![
                        at(12, 30),
                        at(16, 30),
                        at(20, 30),
                    ]),
                    duration_ms: 2 * 60 * 60 * 1000,
                    entry_fee_diamonds: 200,
                    entry_fee_usd: 0,
                    fixed_prize_pool_diamonds: Some(20_000),
                    fixed_prize_pool_usd: None,
                    max_players: 100,
                    min_rank: "silver".to_string(),
                },
            ),
            (
                Level::Diamond,
                LevelConfig {
                    schedule: ScheduleKind::FixedTimes(vec![at(19, 30)]),
                    duration_ms: 3 * 60 * 60 * 1000,
                    entry_fee_diamonds: 0,
                    entry_fee_usd: 500,
                    fixed_prize_pool_diamonds: None,
                    fixed_prize_pool_usd: Some(45_000),
                    max_players: 100,
                    min_rank: "gold".to_string(),
                },
            ),
            (
                Level::Master,
                LevelConfig {
                    schedule: ScheduleKind::FixedTimes(vec![at(21, 0)]),
                    duration_ms: 3 * 60 * 60 * 1000,
                    entry_fee_diamonds: 0,
                    entry_fee_usd: 1_000,
                    fixed_prize_pool_diamonds: None,
                    fixed_prize_pool_usd: Some(90_000),
                    max_players: 50,
                    min_rank: "platinum".to_string(),
                },
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_order_is_fixed() {
        let registry = LevelRegistry::default();
        let order: Vec<Level> = registry.all().collect();
        assert_eq!(
            order,
            vec![Level::Gold, Level::Platinum, Level::Diamond, Level::Master]
        );
    }

    #[test]
    fn lookup_returns_config_for_known_levels() {
        let registry = LevelRegistry::default();
        let gold = registry.get(Level::Gold).unwrap();
        assert_eq!(gold.schedule, ScheduleKind::Hourly);
        assert_eq!(gold.max_players, 100);
    }

    #[test]
    fn missing_level_lookup_is_none() {
        let registry = LevelRegistry::new(vec![]);
        assert!(registry.get(Level::Gold).is_none());
    }

    #[test]
    fn level_keys_round_trip() {
        for level in [Level::Gold, Level::Platinum, Level::Diamond, Level::Master] {
            assert_eq!(level.as_str().parse::<Level>(), Ok(level));
        }
        assert!("bronze".parse::<Level>().is_err());
    }
}
