//! Catalog Domain
//!
//! Categories, brands, products and product reviews behind a REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_catalog::{handlers, postgres::PgCatalogRepository, service::CatalogService};
//!
//! # async fn example(db: sea_orm::DatabaseConnection, auth: axum_helpers::JwtRedisAuth) {
//! let repository = PgCatalogRepository::new(db);
//! let service = CatalogService::new(Arc::new(repository));
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
pub use error::{CatalogError, CatalogResult};
pub use handlers::ApiDoc;
pub use models::{
    Brand, Category, CategoryNode, CreateBrand, CreateCategory, CreateProduct, CreateReview,
    Product, ProductDetail, ProductFilter, ProductListItem, Review, UpdateBrand, UpdateCategory,
    UpdateProduct,
};
pub use postgres::PgCatalogRepository;
pub use repository::CatalogRepository;
pub use service::CatalogService;
