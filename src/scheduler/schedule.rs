//! Schedule Calculator
//!
//! Pure time arithmetic for the scheduler. Every function takes `now` as
//! an explicit parameter so scheduling behavior is deterministic across
//! hour and day boundaries in tests.

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};

use super::levels::{LevelConfig, ScheduleKind};

/// Scheduler invocations within this many minutes at or after a scheduled
/// instant count as "on time" for creation purposes.
pub const TRIGGER_WINDOW_MINS: i64 = 5;

fn minutes_of_day(t: NaiveTime) -> i64 {
    (t.hour() * 60 + t.minute()) as i64
}

fn floor_to_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(now.hour(), 0, 0)
        .map(|ndt| ndt.and_utc())
        .unwrap_or(now)
}

fn floor_to_minute(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(now.hour(), now.minute(), 0)
        .map(|ndt| ndt.and_utc())
        .unwrap_or(now)
}

fn at_time_of_day(now: DateTime<Utc>, t: NaiveTime, days_ahead: i64) -> DateTime<Utc> {
    (now.date_naive() + Duration::days(days_ahead))
        .and_time(t)
        .and_utc()
}

/// Next instant strictly after `now` at which a tournament for this level
/// is scheduled to start.
///
/// Hourly levels trigger at the next top of the hour; fixed-times levels
/// trigger at the earliest configured time of day later than `now`'s time
/// of day (compared as minutes since midnight), wrapping to the earliest
/// configured time tomorrow when none remain today.
pub fn next_scheduled_time(config: &LevelConfig, now: DateTime<Utc>) -> DateTime<Utc> {
    match &config.schedule {
        ScheduleKind::Hourly => floor_to_hour(now) + Duration::hours(1),
        ScheduleKind::Minutely => floor_to_minute(now) + Duration::minutes(1),
        ScheduleKind::FixedTimes(times) => {
            let now_mins = minutes_of_day(now.time());

            let later_today = times
                .iter()
                .filter(|t| minutes_of_day(**t) > now_mins)
                .min_by_key(|t| minutes_of_day(**t));

            match later_today {
                Some(t) => at_time_of_day(now, *t, 0),
                None => {
                    // Nothing left today; wrap to the earliest time tomorrow
                    match times.iter().min_by_key(|t| minutes_of_day(**t)) {
                        Some(t) => at_time_of_day(now, *t, 1),
                        None => floor_to_hour(now) + Duration::hours(1),
                    }
                }
            }
        }
    }
}

/// When a tournament started at `start` stops accepting play.
pub fn expiry_time(start: DateTime<Utc>, config: &LevelConfig) -> DateTime<Utc> {
    start + Duration::milliseconds(config.duration_ms)
}

/// Whether `now` falls inside the trigger window of one of this level's
/// scheduled instants.
///
/// The window absorbs invocation jitter (a cron firing at :01 instead of
/// :00); it is deliberately tolerant of repeat invocations. Duplicate
/// creation is prevented by the orchestrator's active-tournament check,
/// not here.
pub fn should_create_now(config: &LevelConfig, now: DateTime<Utc>) -> bool {
    match &config.schedule {
        ScheduleKind::Hourly => (now.minute() as i64) <= TRIGGER_WINDOW_MINS,
        ScheduleKind::Minutely => true,
        ScheduleKind::FixedTimes(times) => {
            let now_mins = minutes_of_day(now.time());
            times.iter().any(|t| {
                let elapsed = now_mins - minutes_of_day(*t);
                (0..=TRIGGER_WINDOW_MINS).contains(&elapsed)
            })
        }
    }
}

/// Start time recorded on a tournament created by the periodic entry
/// point: hourly levels snap back to the top of the hour the trigger
/// window belongs to, fixed-times levels keep `now` as-is.
pub fn normalize_start(config: &LevelConfig, now: DateTime<Utc>) -> DateTime<Utc> {
    match &config.schedule {
        ScheduleKind::Hourly => floor_to_hour(now),
        ScheduleKind::Minutely => floor_to_minute(now),
        ScheduleKind::FixedTimes(_) => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hourly() -> LevelConfig {
        LevelConfig {
            schedule: ScheduleKind::Hourly,
            duration_ms: 55 * 60 * 1000,
            entry_fee_diamonds: 50,
            entry_fee_usd: 0,
            fixed_prize_pool_diamonds: Some(5_000),
            fixed_prize_pool_usd: None,
            max_players: 100,
            min_rank: "bronze".to_string(),
        }
    }

    fn fixed(times: &[(u32, u32)]) -> LevelConfig {
        LevelConfig {
            schedule: ScheduleKind::FixedTimes(
                times
                    .iter()
                    .map(|(h, m)| NaiveTime::from_hms_opt(*h, *m, 0).unwrap())
                    .collect(),
            ),
            duration_ms: 2 * 60 * 60 * 1000,
            entry_fee_diamonds: 200,
            entry_fee_usd: 0,
            fixed_prize_pool_diamonds: Some(20_000),
            fixed_prize_pool_usd: None,
            max_players: 100,
            min_rank: "silver".to_string(),
        }
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn hourly_next_time_is_next_top_of_hour() {
        let now = utc(2025, 3, 10, 10, 31, 12);
        let next = next_scheduled_time(&hourly(), now);
        assert_eq!(next, utc(2025, 3, 10, 11, 0, 0));
    }

    #[test]
    fn hourly_next_time_at_exact_hour_is_strictly_later() {
        let now = utc(2025, 3, 10, 10, 0, 0);
        let next = next_scheduled_time(&hourly(), now);
        assert_eq!(next, utc(2025, 3, 10, 11, 0, 0));
    }

    #[test]
    fn fixed_next_time_picks_earliest_remaining_today() {
        let config = fixed(&[(19, 30), (20, 30), (21, 30)]);
        let now = utc(2025, 3, 10, 19, 32, 0);
        let next = next_scheduled_time(&config, now);
        assert_eq!(next, utc(2025, 3, 10, 20, 30, 0));
    }

    #[test]
    fn fixed_next_time_wraps_to_tomorrow() {
        let config = fixed(&[(12, 30), (16, 30), (20, 30)]);
        let now = utc(2025, 3, 10, 22, 0, 0);
        let next = next_scheduled_time(&config, now);
        assert_eq!(next, utc(2025, 3, 11, 12, 30, 0));
    }

    #[test]
    fn fixed_next_time_ignores_configured_order() {
        let config = fixed(&[(21, 30), (19, 30), (20, 30)]);
        let now = utc(2025, 3, 10, 18, 0, 0);
        let next = next_scheduled_time(&config, now);
        assert_eq!(next, utc(2025, 3, 10, 19, 30, 0));
    }

    #[test]
    fn next_time_is_strictly_after_now() {
        let configs = [hourly(), fixed(&[(19, 30), (20, 30)])];
        let nows = [
            utc(2025, 3, 10, 0, 0, 0),
            utc(2025, 3, 10, 19, 30, 0),
            utc(2025, 3, 10, 23, 59, 59),
        ];
        for config in &configs {
            for now in nows {
                assert!(next_scheduled_time(config, now) > now);
            }
        }
    }

    #[test]
    fn hourly_trigger_window_covers_first_five_minutes() {
        let config = hourly();
        assert!(should_create_now(&config, utc(2025, 3, 10, 10, 0, 0)));
        assert!(should_create_now(&config, utc(2025, 3, 10, 10, 5, 59)));
        assert!(!should_create_now(&config, utc(2025, 3, 10, 10, 6, 0)));
        assert!(!should_create_now(&config, utc(2025, 3, 10, 10, 31, 0)));
    }

    #[test]
    fn fixed_trigger_window_matches_recent_scheduled_time() {
        let config = fixed(&[(19, 30), (20, 30), (21, 30)]);
        // Two minutes past 19:30 is inside the window
        assert!(should_create_now(&config, utc(2025, 3, 10, 19, 32, 0)));
        // Exactly on a scheduled instant
        assert!(should_create_now(&config, utc(2025, 3, 10, 20, 30, 0)));
        // Six minutes past is outside
        assert!(!should_create_now(&config, utc(2025, 3, 10, 19, 36, 0)));
        // Before the instant is outside; the window only opens at it
        assert!(!should_create_now(&config, utc(2025, 3, 10, 19, 29, 0)));
    }

    #[test]
    fn minutely_cadence_fires_every_minute() {
        let mut config = hourly();
        config.schedule = ScheduleKind::Minutely;

        let now = utc(2025, 3, 10, 10, 31, 12);
        assert_eq!(
            next_scheduled_time(&config, now),
            utc(2025, 3, 10, 10, 32, 0)
        );
        assert!(should_create_now(&config, now));
        assert_eq!(normalize_start(&config, now), utc(2025, 3, 10, 10, 31, 0));
    }

    #[test]
    fn expiry_is_start_plus_duration() {
        let config = fixed(&[(19, 30)]);
        let start = utc(2025, 3, 10, 19, 30, 0);
        assert_eq!(expiry_time(start, &config), utc(2025, 3, 10, 21, 30, 0));
    }

    #[test]
    fn normalize_floors_hourly_but_not_fixed() {
        let now = utc(2025, 3, 10, 10, 3, 45);
        assert_eq!(normalize_start(&hourly(), now), utc(2025, 3, 10, 10, 0, 0));
        let config = fixed(&[(10, 0)]);
        assert_eq!(normalize_start(&config, now), now);
    }
}
