use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub user_id: Uuid,
    pub rating: i16,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Review {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            rating: model.rating,
            title: model.title,
            comment: model.comment,
            is_approved: model.is_approved,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl ActiveModel {
    pub fn from_create(product_id: i32, user_id: Uuid, input: crate::models::CreateReview) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Default::default(),
            product_id: Set(product_id),
            user_id: Set(user_id),
            rating: Set(input.rating),
            title: Set(input.title),
            comment: Set(input.comment),
            is_approved: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
