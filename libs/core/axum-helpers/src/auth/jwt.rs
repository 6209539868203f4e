use super::config::JwtConfig;
use super::store::RedisAuthStore;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT token time-to-live constants
pub const ACCESS_TOKEN_TTL: i64 = 900; // 15 minutes
pub const REFRESH_TOKEN_TTL: i64 = 604800; // 7 days

/// Distinguishes access tokens from refresh tokens in the claims.
///
/// A refresh token presented where an access token is expected (or vice
/// versa) is rejected during verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,           // Subject (user ID)
    pub email: String,         // User email
    pub username: String,      // User display name
    pub roles: Vec<String>,    // User roles ("admin" for staff)
    pub token_type: TokenType, // Access or refresh
    pub exp: i64,              // Expiration time
    pub iat: i64,              // Issued at
    pub jti: String,           // JWT ID (for the revocation list)
}

impl JwtClaims {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == "admin")
    }

    /// Remaining lifetime in seconds, zero if already expired
    pub fn remaining_ttl(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(0) as u64
    }
}

/// JWT + Redis authentication.
///
/// Access tokens are stateless and verified by signature alone. Refresh
/// tokens are additionally checked against the Redis revocation list, so
/// logout can invalidate them before expiry.
#[derive(Clone)]
pub struct JwtRedisAuth {
    secret: String,
    store: RedisAuthStore,
}

impl JwtRedisAuth {
    /// Create a new JWT + Redis auth instance.
    ///
    /// # Example
    /// ```ignore
    /// use axum_helpers::{JwtConfig, JwtRedisAuth};
    /// use core_config::FromEnv;
    ///
    /// let config = JwtConfig::from_env()?;
    /// let jwt_auth = JwtRedisAuth::new(redis_manager, &config);
    /// ```
    pub fn new(manager: ConnectionManager, config: &JwtConfig) -> Self {
        let store = RedisAuthStore::new(manager);
        let secret = config.secret.clone();

        tracing::info!("JWT + Redis auth initialized");
        Self { secret, store }
    }

    /// Create access token (15 min)
    pub fn create_access_token(
        &self,
        user_id: &str,
        email: &str,
        username: &str,
        roles: &[String],
    ) -> eyre::Result<String> {
        self.create_token(user_id, email, username, roles, TokenType::Access)
    }

    /// Create refresh token (7 days)
    pub fn create_refresh_token(
        &self,
        user_id: &str,
        email: &str,
        username: &str,
        roles: &[String],
    ) -> eyre::Result<String> {
        self.create_token(user_id, email, username, roles, TokenType::Refresh)
    }

    fn create_token(
        &self,
        user_id: &str,
        email: &str,
        username: &str,
        roles: &[String],
        token_type: TokenType,
    ) -> eyre::Result<String> {
        let ttl_seconds = match token_type {
            TokenType::Access => ACCESS_TOKEN_TTL,
            TokenType::Refresh => REFRESH_TOKEN_TTL,
        };

        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            roles: roles.to_vec(),
            token_type,
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify JWT token signature and decode claims
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Add a token to the revocation list for its remaining lifetime
    pub async fn blacklist_token(&self, jti: &str, ttl: u64) -> eyre::Result<()> {
        let mut store = self.store.clone();
        store
            .blacklist_jwt(jti, ttl)
            .await
            .map_err(|e| eyre::eyre!("Failed to blacklist token: {}", e))?;
        Ok(())
    }

    /// Check if a token has been revoked
    pub async fn is_token_blacklisted(&self, jti: &str) -> eyre::Result<bool> {
        let mut store = self.store.clone();
        store
            .check_jwt_blacklist(jti)
            .await
            .map_err(|e| eyre::eyre!("Failed to check blacklist: {}", e))
    }
}
