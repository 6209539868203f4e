//! # Axum Helpers
//!
//! Shared utilities and middleware for the storefront HTTP surface.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT authentication with a Redis-backed revocation list
//! - **[`server`]**: Router assembly, health endpoint, graceful shutdown
//! - **[`errors`]**: Structured error responses
//! - **[`extractors`]**: Custom extractors (validated JSON, caller identity)
//! - **[`pagination`]**: Page-number pagination params and envelope
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes).await?;
//!
//!     let config = ServerConfig::default();
//!     create_app(router, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod pagination;
pub mod server;

// Re-export auth types
pub use auth::{
    ACCESS_TOKEN_TTL, AdminUser, AuthUser, JwtClaims, JwtConfig, JwtRedisAuth, REFRESH_TOKEN_TTL,
    RedisAuthStore, TokenType, jwt_auth_middleware,
};

// Re-export server types
pub use server::{HealthResponse, create_app, create_router, health_router, shutdown_signal};

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::ValidatedJson;

// Re-export pagination types
pub use pagination::{Page, Pagination};
