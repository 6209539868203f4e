use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

pub type UserResult<T> = Result<T, UserError>;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("A user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Refresh token is required")]
    RefreshTokenRequired,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Token has already been revoked")]
    TokenAlreadyRevoked,

    #[error("Token is invalid or expired")]
    TokenNotValid,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            UserError::DuplicateEmail(_) => AppError::Conflict(err.to_string()),
            UserError::InvalidCredentials
            | UserError::AccountDisabled
            | UserError::TokenNotValid => AppError::Unauthorized(err.to_string()),
            UserError::WrongPassword
            | UserError::RefreshTokenRequired
            | UserError::InvalidRefreshToken
            | UserError::TokenAlreadyRevoked
            | UserError::Validation(_) => AppError::BadRequest(err.to_string()),
            UserError::PasswordHash(_) | UserError::Token(_) => {
                AppError::InternalServerError(err.to_string())
            }
            UserError::Database(db_err) => AppError::Database(db_err),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
