use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub cron_secret: Option<String>,
    pub admin_token: Option<String>,
    pub scheduler_tick_secs: u64,
    pub is_production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let is_production = env::var("LEAGUE_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let cron_secret = match env::var("CRON_SECRET") {
            Ok(secret) if !secret.is_empty() => Some(secret),
            _ => {
                if is_production {
                    panic!("CRON_SECRET environment variable must be set in production");
                }
                tracing::warn!(
                    "WARNING: CRON_SECRET is not set; the scheduler endpoint is unauthenticated."
                );
                None
            }
        };

        let admin_token = match env::var("ADMIN_TOKEN") {
            Ok(token) if !token.is_empty() => Some(token),
            _ => {
                if is_production {
                    panic!("ADMIN_TOKEN environment variable must be set in production");
                }
                tracing::warn!(
                    "WARNING: ADMIN_TOKEN is not set; admin endpoints are unauthenticated."
                );
                None
            }
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:league.db".to_string()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            cron_secret,
            admin_token,
            scheduler_tick_secs: env::var("SCHEDULER_TICK_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("SCHEDULER_TICK_SECS must be a number"),
            is_production,
        }
    }

    /// Configuration used by the test helpers: in-memory database, open endpoints.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            cron_secret: None,
            admin_token: None,
            scheduler_tick_secs: 60,
            is_production: false,
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
