use redis::{AsyncCommands, RedisResult, aio::ConnectionManager};

/// Redis-backed revocation store for JWT refresh tokens.
///
/// Revoked token ids are kept under `jwt:blacklist:{jti}` with a TTL equal
/// to the token's remaining lifetime, so entries expire on their own once
/// the token would have expired anyway.
#[derive(Clone)]
pub struct RedisAuthStore {
    client: ConnectionManager,
}

impl RedisAuthStore {
    pub fn new(manager: ConnectionManager) -> Self {
        tracing::info!("Redis auth store initialized");
        Self { client: manager }
    }

    /// Add a token id to the blacklist with TTL
    pub async fn blacklist_jwt(&mut self, jti: &str, ttl_seconds: u64) -> RedisResult<()> {
        let key = format!("jwt:blacklist:{}", jti);
        self.client
            .set_ex::<_, _, ()>(&key, "1", ttl_seconds)
            .await?;
        Ok(())
    }

    /// Check if a token id is blacklisted
    pub async fn check_jwt_blacklist(&mut self, jti: &str) -> RedisResult<bool> {
        let key = format!("jwt:blacklist:{}", jti);
        let exists: bool = self.client.exists(&key).await?;
        Ok(exists)
    }
}
