//! Configuration loaded from environment variables, with a `.env` file
//! honoured when present.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://jobboard.db?mode=rwc";
pub const DEFAULT_RUST_LOG: &str = "jobboard=debug,tower_http=info";
/// Requests allowed per client address in one window.
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow!("APP_ENV must be development or production, got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Production switches log output to JSON lines.
    pub environment: Environment,
    pub rust_log: String,
    pub rate_limit: RateLimit,
}

/// Per-client request quota: `max_requests` every `window_secs`, refilled
/// evenly across the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX,
            window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
        }
    }
}

impl RateLimit {
    /// Time to earn back one request.
    #[must_use]
    pub fn replenish_period(&self) -> Duration {
        Duration::from_secs(self.window_secs) / self.max_requests.max(1)
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails on an unparseable `PORT` or an unknown `APP_ENV`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable when it is set.
    ///
    /// # Errors
    ///
    /// Fails on an unparseable `PORT`, an unknown `APP_ENV`, or a rate limit
    /// setting that is not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow!("PORT must be a port number, got '{port}'"))?,
            None => DEFAULT_PORT,
        };

        let rate_limit = RateLimit {
            max_requests: parse_positive(&lookup, "RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX)?,
            window_secs: parse_positive(&lookup, "RATE_LIMIT_WINDOW_SECS", DEFAULT_RATE_LIMIT_WINDOW_SECS)?,
        };

        let environment = match lookup("APP_ENV") {
            Some(value) => Environment::parse(&value)?,
            None => Environment::Development,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port,
            environment,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_RUST_LOG.to_string()),
            rate_limit,
        })
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn parse_positive<T>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|value| *value > T::default())
        .ok_or_else(|| anyhow!("{key} must be a positive integer, got '{raw}'"))
}
