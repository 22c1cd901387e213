//! API configuration module.
//!
//! Configuration is loaded from environment variables (optionally seeded from
//! a `.env` file) with fallback to defaults.

use std::env;

use bazaar_db::DbConfig;

/// Signing key used by debug builds when `JWT_KEY` is unset.
const DEV_JWT_KEY: &str = "bazaar-dev-key-change-in-production";

/// Upper bound for token lifetimes: ten years.
const MAX_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite file path (`:memory:` for a throwaway database)
    pub database_path: String,

    /// Maximum pooled connections
    pub database_max_connections: u32,

    /// HS256 signing key for access tokens
    pub jwt_key: String,

    /// Access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_lifetime_secs: i64,

    /// Add `Secure` to the refresh token cookie
    pub cookie_secure: bool,

    /// Balance (minor units) credited to new accounts
    pub signup_balance: i64,
}

impl ApiConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(e) = dotenv_failure(dotenvy::dotenv()) {
            tracing::warn!(error = %e, "Ignoring unreadable .env file");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_key = match lookup("JWT_KEY") {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::MissingRequired("JWT_KEY".to_string()))
            }
            Some(key) => key,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_KEY not set, using the development key");
                DEV_JWT_KEY.to_string()
            }
            None => return Err(ConfigError::MissingRequired("JWT_KEY".to_string())),
        };

        let config = ApiConfig {
            port: parse_or(&lookup, "PORT", 8080)?,
            database_path: lookup("DATABASE_PATH")
                .unwrap_or_else(|| "./data/bazaar.db".to_string()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_key,
            jwt_access_lifetime_secs: parse_or(&lookup, "JWT_ACCESS_LIFETIME_SECS", 900)?, // 15 minutes
            refresh_token_lifetime_secs: parse_or(&lookup, "REFRESH_TOKEN_LIFETIME_SECS", 604_800)?, // 7 days
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", false)?,
            signup_balance: parse_or(&lookup, "SIGNUP_BALANCE", 0)?,
        };

        if config.database_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()));
        }
        if !(1..=MAX_LIFETIME_SECS).contains(&config.jwt_access_lifetime_secs) {
            return Err(ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()));
        }
        if !(1..=MAX_LIFETIME_SECS).contains(&config.refresh_token_lifetime_secs) {
            return Err(ConfigError::InvalidValue("REFRESH_TOKEN_LIFETIME_SECS".to_string()));
        }
        if config.signup_balance < 0 {
            return Err(ConfigError::InvalidValue("SIGNUP_BALANCE".to_string()));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.database_max_connections)
        }
    }

    /// Settings for tests: in-memory database, fixed key, no signup credit.
    pub fn for_tests() -> Self {
        ApiConfig {
            port: 0,
            database_path: ":memory:".to_string(),
            database_max_connections: 1,
            jwt_key: "test-key".to_string(),
            jwt_access_lifetime_secs: 900,
            refresh_token_lifetime_secs: 604_800,
            cookie_secure: false,
            signup_balance: 0,
        }
    }
}

/// The error from loading `.env`, unless the file simply does not exist.
fn dotenv_failure<T>(result: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
