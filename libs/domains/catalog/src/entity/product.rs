use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(unique)]
    pub sku: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price_cents: i64,
    pub discounted_price_cents: Option<i64>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id"
    )]
    Brand,
    #[sea_orm(has_many = "super::product_image::Entity")]
    Image,
    #[sea_orm(has_many = "super::product_review::Entity")]
    Review,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl Related<super::product_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            sku: model.sku,
            description: model.description,
            price_cents: model.price_cents,
            discounted_price_cents: model.discounted_price_cents,
            category_id: model.category_id,
            brand_id: model.brand_id,
            stock_quantity: model.stock_quantity,
            is_active: model.is_active,
            is_featured: model.is_featured,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl ActiveModel {
    pub fn from_create(input: crate::models::CreateProduct, slug: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Default::default(),
            name: Set(input.name),
            slug: Set(slug),
            sku: Set(input.sku),
            description: Set(input.description),
            price_cents: Set(input.price_cents),
            discounted_price_cents: Set(input.discounted_price_cents),
            category_id: Set(input.category_id),
            brand_id: Set(input.brand_id),
            stock_quantity: Set(input.stock_quantity),
            is_active: Set(input.is_active),
            is_featured: Set(input.is_featured),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
