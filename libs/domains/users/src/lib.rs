//! Users Domain
//!
//! Accounts, JWT authentication and user profiles.
//!
//! Login issues an access/refresh token pair. Logout revokes the refresh
//! token through a Redis blacklist; access tokens simply expire. Profiles
//! are created lazily on first read.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_users::{handlers, postgres::PgUserRepository, service::UserService};
//!
//! # async fn example(db: sea_orm::DatabaseConnection, auth: axum_helpers::JwtRedisAuth) {
//! let repository = PgUserRepository::new(db);
//! let service = UserService::new(Arc::new(repository));
//! let router = handlers::router(service, auth);
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    AccessTokenResponse, ChangePasswordRequest, Gender, LoginRequest, LogoutRequest,
    ProfileResponse, RefreshRequest, RegisterRequest, TokenPairResponse, UpdateProfileRequest,
    User, UserProfile, UserResponse,
};
pub use postgres::PgUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
