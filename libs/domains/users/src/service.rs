use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{ProfileResponse, RegisterRequest, UpdateProfileRequest, User, UserProfile};
use crate::repository::UserRepository;

/// Account business logic on top of a [`UserRepository`].
///
/// Token issuance lives in the handlers; this layer owns credentials and
/// profile data.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Registers a new account with a hashed password.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<User> {
        let password_hash = self.hash_password(&input.password)?;
        self.repository
            .create(
                input.email,
                input.username,
                password_hash,
                input.phone_number,
                input.address,
            )
            .await
    }

    /// Checks email and password for login. Disabled accounts are rejected
    /// even with the right password.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<User> {
        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(UserError::AccountDisabled);
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Replaces the password after verifying the current one.
    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> UserResult<()> {
        let user = self.get_user(id).await?;
        if !self.verify_password(old_password, &user.password_hash)? {
            return Err(UserError::WrongPassword);
        }
        let password_hash = self.hash_password(new_password)?;
        self.repository.update_password(id, password_hash).await
    }

    /// Account plus profile. A user who has never edited their profile
    /// gets an empty one rather than a 404.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, id: Uuid) -> UserResult<ProfileResponse> {
        let user = self.get_user(id).await?;
        let profile = self
            .repository
            .get_profile(id)
            .await?
            .unwrap_or_else(|| UserProfile::empty(id));
        Ok(ProfileResponse::new(user, profile))
    }

    #[instrument(skip(self, input))]
    pub async fn update_profile(
        &self,
        id: Uuid,
        input: UpdateProfileRequest,
    ) -> UserResult<ProfileResponse> {
        self.get_user(id).await?;
        if input.phone_number.is_some() || input.address.is_some() {
            self.repository
                .update_contact(id, input.phone_number.clone(), input.address.clone())
                .await?;
        }
        let profile = self.repository.upsert_profile(id, input).await?;
        let user = self.get_user(id).await?;
        Ok(ProfileResponse::new(user, profile))
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::repository::MockUserRepository;
    use chrono::Utc;

    fn user_with_hash(password_hash: &str, is_active: bool) -> User {
        User {
            id: Uuid::now_v7(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            password_hash: password_hash.to_string(),
            phone_number: None,
            address: None,
            is_email_verified: false,
            is_active,
            is_staff: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn hash(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_register_stores_a_hash_not_the_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|_, _, password_hash, _, _| {
                password_hash != "hunter2hunter2" && password_hash.starts_with("$argon2")
            })
            .returning(|email, username, password_hash, phone_number, address| {
                let mut user = user_with_hash(&password_hash, true);
                user.email = email;
                user.username = username;
                user.phone_number = phone_number;
                user.address = address;
                Ok(user)
            });
        let service = UserService::new(Arc::new(repo));

        let input = RegisterRequest {
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            password: "hunter2hunter2".to_string(),
            confirm_password: "hunter2hunter2".to_string(),
            phone_number: None,
            address: None,
        };
        let user = service.register(input).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_rejected() {
        let stored = hash("correct-horse-battery");
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user_with_hash(&stored, true))));
        let service = UserService::new(Arc::new(repo));

        let err = service
            .verify_credentials("ada@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_on_disabled_account_is_rejected() {
        let stored = hash("correct-horse-battery");
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(move |_| Ok(Some(user_with_hash(&stored, false))));
        let service = UserService::new(Arc::new(repo));

        let err = service
            .verify_credentials("ada@example.com", "correct-horse-battery")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::AccountDisabled));
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid_credentials() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email().returning(|_| Ok(None));
        let service = UserService::new(Arc::new(repo));

        let err = service
            .verify_credentials("nobody@example.com", "whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_change_password_requires_current_password() {
        let stored = hash("old-password-123");
        let user = user_with_hash(&stored, true);
        let id = user.id;
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update_password().never();
        let service = UserService::new(Arc::new(repo));

        let err = service
            .change_password(id, "not-the-old-one", "new-password-123")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::WrongPassword));
    }

    #[tokio::test]
    async fn test_profile_is_lazily_empty() {
        let user = user_with_hash(&hash("irrelevant"), true);
        let id = user.id;
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_get_profile().returning(|_| Ok(None));
        let service = UserService::new(Arc::new(repo));

        let profile = service.get_profile(id).await.unwrap();
        assert_eq!(profile.id, id);
        assert!(profile.avatar.is_none());
        assert!(profile.gender.is_none());
    }

    #[tokio::test]
    async fn test_update_profile_round_trip() {
        let user = user_with_hash(&hash("irrelevant"), true);
        let id = user.id;
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_upsert_profile().returning(|user_id, input| {
            Ok(UserProfile {
                user_id,
                avatar: input.avatar,
                date_of_birth: input.date_of_birth,
                gender: input.gender,
            })
        });
        let service = UserService::new(Arc::new(repo));

        let input = UpdateProfileRequest {
            phone_number: None,
            address: None,
            avatar: Some("avatar.webp".to_string()),
            date_of_birth: None,
            gender: Some(Gender::Other),
        };
        let profile = service.update_profile(id, input).await.unwrap();
        assert_eq!(profile.avatar.as_deref(), Some("avatar.webp"));
        assert_eq!(profile.gender, Some(Gender::Other));
    }
}
