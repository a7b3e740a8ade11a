//! Runtime settings read from the environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:orphanage.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 480;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// One year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 525_600;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub session_ttl_minutes: i64,
    pub max_connections: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Settings {
    /// `DATABASE_URL`, `BIND_ADDR`, `SESSION_TTL_MINUTES`, `MAX_CONNECTIONS`; unset keys take defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let session_ttl_minutes = parse_or("SESSION_TTL_MINUTES", lookup("SESSION_TTL_MINUTES"), defaults.session_ttl_minutes)?;
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&session_ttl_minutes) {
            return Err(ConfigError::InvalidValue {
                key: "SESSION_TTL_MINUTES",
                value: session_ttl_minutes.to_string(),
            });
        }
        Ok(Settings {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            session_ttl_minutes,
            max_connections: parse_or("MAX_CONNECTIONS", lookup("MAX_CONNECTIONS"), defaults.max_connections)?,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: s }),
    }
}
