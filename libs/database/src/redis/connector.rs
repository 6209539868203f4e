use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use super::RedisConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};

/// Connect to Redis and return a ConnectionManager
///
/// The ConnectionManager handles reconnection after transient failures.
///
/// # Example
/// ```ignore
/// use database::redis::connect;
/// use redis::AsyncCommands;
///
/// let mut conn = connect("redis://127.0.0.1:6379").await?;
/// conn.set::<_, _, ()>("key", "value").await?;
/// ```
pub async fn connect(url: &str) -> redis::RedisResult<ConnectionManager> {
    info!("Attempting to connect to Redis at {}", url);

    let client = Client::open(url)?;
    let manager = ConnectionManager::new(client).await?;

    // Verify connection with PING
    let mut conn = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;

    info!("Successfully connected to Redis");
    Ok(manager)
}

/// Connect using a RedisConfig
pub async fn connect_from_config(config: RedisConfig) -> redis::RedisResult<ConnectionManager> {
    connect(&config.url).await
}

/// Connect from config with automatic retry on failure
///
/// # Example
/// ```ignore
/// use database::redis::{RedisConfig, connect_from_config_with_retry};
/// use database::common::RetryConfig;
///
/// let config = RedisConfig::from_env()?;
/// let retry_config = RetryConfig::new().with_max_retries(5);
/// let conn = connect_from_config_with_retry(config, Some(retry_config)).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: RedisConfig,
    retry_config: Option<RetryConfig>,
) -> redis::RedisResult<ConnectionManager> {
    let url = config.url;

    match retry_config {
        Some(retry_config) => retry_with_backoff(|| connect(&url), retry_config).await,
        None => retry(|| connect(&url)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires actual Redis
    async fn test_connect() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let result = connect(&redis_url).await;
        assert!(result.is_ok());
    }
}
