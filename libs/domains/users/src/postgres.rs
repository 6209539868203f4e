use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, SqlErr,
};
use uuid::Uuid;

use crate::entity::{profile, user};
use crate::error::{UserError, UserResult};
use crate::models::{UpdateProfileRequest, User, UserProfile};
use crate::repository::UserRepository;

/// Sea-ORM backed implementation of [`UserRepository`].
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(
        &self,
        email: String,
        username: String,
        password_hash: String,
        phone_number: Option<String>,
        address: Option<String>,
    ) -> UserResult<User> {
        let active = user::ActiveModel::new_account(
            email.clone(),
            username,
            password_hash,
            phone_number,
            address,
        );
        let model = active.insert(&self.db).await.map_err(|err| {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                UserError::DuplicateEmail(email)
            } else {
                UserError::Database(err)
            }
        })?;
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let row = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let row = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(row.map(User::from))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> UserResult<()> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(UserError::NotFound(id));
        };
        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn update_contact(
        &self,
        id: Uuid,
        phone_number: Option<String>,
        address: Option<String>,
    ) -> UserResult<()> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(UserError::NotFound(id));
        };
        let mut active: user::ActiveModel = existing.into();
        if let Some(phone_number) = phone_number {
            active.phone_number = Set(Some(phone_number));
        }
        if let Some(address) = address {
            active.address = Set(Some(address));
        }
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> UserResult<Option<UserProfile>> {
        let row = profile::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(row.map(UserProfile::from))
    }

    async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfileRequest,
    ) -> UserResult<UserProfile> {
        let existing = profile::Entity::find_by_id(user_id).one(&self.db).await?;
        let model = match existing {
            Some(model) => {
                let mut active: profile::ActiveModel = model.into();
                if let Some(avatar) = input.avatar {
                    active.avatar = Set(Some(avatar));
                }
                if let Some(date_of_birth) = input.date_of_birth {
                    active.date_of_birth = Set(Some(date_of_birth));
                }
                if let Some(gender) = input.gender {
                    active.gender = Set(Some(gender));
                }
                active.update(&self.db).await?
            }
            None => {
                let active = profile::ActiveModel {
                    user_id: Set(user_id),
                    avatar: Set(input.avatar),
                    date_of_birth: Set(input.date_of_birth),
                    gender: Set(input.gender),
                };
                active.insert(&self.db).await?
            }
        };
        Ok(model.into())
    }
}
