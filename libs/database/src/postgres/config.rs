use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

use core_config::{ConfigError, FromEnv, env_or_default, env_required};

/// PostgreSQL connection pool settings
///
/// Construct manually with [`PostgresConfig::new`] or load from environment
/// variables via [`FromEnv`].
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    /// Database connection URL (required)
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,

    /// Enable SQL query logging
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 100,
            min_connections: 5,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            sqlx_logging: true,
        }
    }

    /// Convert this config into SeaORM ConnectOptions
    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(&self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(LevelFilter::Info); // SeaORM requires log::LevelFilter
        opt
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e| ConfigError::ParseError {
            key: key.to_string(),
            details: format!("{}", e),
        })
}

/// Load PostgresConfig from environment variables
///
/// - `DATABASE_URL` (required)
/// - `DB_MAX_CONNECTIONS` (default: 100)
/// - `DB_MIN_CONNECTIONS` (default: 5)
/// - `DB_CONNECT_TIMEOUT_SECS` (default: 8)
/// - `DB_ACQUIRE_TIMEOUT_SECS` (default: 8)
/// - `DB_SQLX_LOGGING` (default: true)
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("DATABASE_URL")?,
            max_connections: parse_env("DB_MAX_CONNECTIONS", "100")?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", "5")?,
            connect_timeout_secs: parse_env("DB_CONNECT_TIMEOUT_SECS", "8")?,
            acquire_timeout_secs: parse_env("DB_ACQUIRE_TIMEOUT_SECS", "8")?,
            sqlx_logging: parse_env("DB_SQLX_LOGGING", "true")?,
        })
    }
}
