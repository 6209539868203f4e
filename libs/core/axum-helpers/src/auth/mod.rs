//! Authentication and authorization module.
//!
//! This module provides:
//! - JWT access/refresh token creation and verification
//! - Redis-backed revocation list for refresh tokens
//! - Authentication middleware for protected routes
//! - `AuthUser` / `AdminUser` extractors for handler signatures
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtConfig, JwtRedisAuth, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let config = JwtConfig::from_env()?;
//! let auth = JwtRedisAuth::new(redis_manager, &config);
//!
//! let protected = Router::new()
//!     .route("/api/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod extract;
pub mod jwt;
pub mod middleware;
pub mod store;

// Re-export commonly used types
pub use config::JwtConfig;
pub use extract::{AdminUser, AuthUser};
pub use jwt::{ACCESS_TOKEN_TTL, JwtClaims, JwtRedisAuth, REFRESH_TOKEN_TTL, TokenType};
pub use middleware::jwt_auth_middleware;
pub use store::RedisAuthStore;
