//! Redis connector and utilities
//!
//! Connection management over `ConnectionManager`, which reconnects on its
//! own after transient failures.

mod config;
mod connector;
mod health;

pub use config::RedisConfig;
pub use connector::{connect, connect_from_config, connect_from_config_with_retry};
pub use health::check_health;

// Re-export redis types for convenience
pub use redis::aio::ConnectionManager;
pub use redis::{AsyncCommands, Client, RedisResult};
