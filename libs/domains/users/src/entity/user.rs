use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub is_email_verified: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
            phone_number: model.phone_number,
            address: model.address,
            is_email_verified: model.is_email_verified,
            is_active: model.is_active,
            is_staff: model.is_staff,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl ActiveModel {
    pub fn new_account(
        email: String,
        username: String,
        password_hash: String,
        phone_number: Option<String>,
        address: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Set(Uuid::now_v7()),
            email: Set(email),
            username: Set(username),
            password_hash: Set(password_hash),
            phone_number: Set(phone_number),
            address: Set(address),
            is_email_verified: Set(false),
            is_active: Set(true),
            is_staff: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
