use async_trait::async_trait;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{UpdateProfileRequest, User, UserProfile};

/// Persistence operations for accounts and profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(
        &self,
        email: String,
        username: String,
        password_hash: String,
        phone_number: Option<String>,
        address: Option<String>,
    ) -> UserResult<User>;
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;
    async fn update_password(&self, id: Uuid, password_hash: String) -> UserResult<()>;
    async fn update_contact(
        &self,
        id: Uuid,
        phone_number: Option<String>,
        address: Option<String>,
    ) -> UserResult<()>;
    async fn get_profile(&self, user_id: Uuid) -> UserResult<Option<UserProfile>>;
    async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileRequest,
    ) -> UserResult<UserProfile>;
}
