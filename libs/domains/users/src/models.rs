use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A registered account. The password hash never leaves the domain layer;
/// [`UserResponse`] is the serializable view.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub is_email_verified: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Roles carried in issued tokens. Staff accounts get the admin role.
    pub fn roles(&self) -> Vec<String> {
        if self.is_staff {
            vec!["admin".to_string()]
        } else {
            vec!["user".to_string()]
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub is_email_verified: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            phone_number: user.phone_number,
            address: user.address,
            is_email_verified: user.is_email_verified,
            is_staff: user.is_staff,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gender")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Extended profile data, created lazily on first access.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub avatar: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

impl UserProfile {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            avatar: None,
            date_of_birth: None,
            gender: None,
        }
    }
}

/// Combined account and profile view for the profile endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn new(user: User, profile: UserProfile) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            phone_number: user.phone_number,
            address: user.address,
            avatar: profile.avatar,
            date_of_birth: profile.date_of_birth,
            gender: profile.gender,
            is_email_verified: user.is_email_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        must_match(other = "confirm_password", message = "Passwords do not match")
    )]
    pub password: String,
    pub confirm_password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Issued on login: both tokens plus the authenticated user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LogoutRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub avatar: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
}
