use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::Gender;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub avatar: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<Gender>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::UserProfile {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            avatar: model.avatar,
            date_of_birth: model.date_of_birth,
            gender: model.gender,
        }
    }
}
