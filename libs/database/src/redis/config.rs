use core_config::{ConfigError, FromEnv};

/// Redis connection settings
#[derive(Clone, Debug)]
pub struct RedisConfig {
    /// Redis connection URL (required)
    pub url: String,
}

impl RedisConfig {
    /// Create a new RedisConfig
    ///
    /// # Example
    /// ```ignore
    /// let config = RedisConfig::new("redis://127.0.0.1:6379");
    /// ```
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

/// Load RedisConfig from `REDIS_URL`, falling back to `REDIS_HOST`
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("REDIS_URL")
            .or_else(|_| std::env::var("REDIS_HOST"))
            .map_err(|_| ConfigError::MissingEnvVar("REDIS_URL or REDIS_HOST".to_string()))?;

        Ok(Self { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_new() {
        let config = RedisConfig::new("redis://localhost:6379");
        assert_eq!(config.url, "redis://localhost:6379");
    }

    #[test]
    fn test_redis_config_default() {
        let config = RedisConfig::default();
        assert_eq!(config.url, "redis://127.0.0.1:6379");
    }

    #[test]
    fn test_redis_config_from_env_with_redis_url() {
        temp_env::with_var("REDIS_URL", Some("redis://localhost:6379"), || {
            let config = RedisConfig::from_env().unwrap();
            assert_eq!(config.url, "redis://localhost:6379");
        });
    }

    #[test]
    fn test_redis_config_from_env_with_redis_host() {
        temp_env::with_vars(
            [
                ("REDIS_URL", None::<&str>),
                ("REDIS_HOST", Some("redis://prod:6379")),
            ],
            || {
                let config = RedisConfig::from_env().unwrap();
                assert_eq!(config.url, "redis://prod:6379");
            },
        );
    }

    #[test]
    fn test_redis_config_from_env_missing() {
        temp_env::with_vars(
            [("REDIS_URL", None::<&str>), ("REDIS_HOST", None::<&str>)],
            || {
                let err = RedisConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("REDIS"));
            },
        );
    }
}
