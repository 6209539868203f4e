use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Brand not found: {0}")]
    BrandNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    #[error("SKU already in use: {0}")]
    DuplicateSku(String),

    #[error("You have already reviewed this product")]
    DuplicateReview,

    #[error("Category cannot be its own ancestor")]
    CategoryCycle,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(_)
            | CatalogError::BrandNotFound(_)
            | CatalogError::ProductNotFound(_) => AppError::NotFound(err.to_string()),
            CatalogError::DuplicateSlug(_)
            | CatalogError::DuplicateSku(_)
            | CatalogError::DuplicateReview => AppError::Conflict(err.to_string()),
            CatalogError::CategoryCycle | CatalogError::Validation(_) => {
                AppError::BadRequest(err.to_string())
            }
            CatalogError::Database(db_err) => AppError::Database(db_err),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
