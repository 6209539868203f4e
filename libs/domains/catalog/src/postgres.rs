use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use crate::entity::{brand, category, product, product_image, product_review};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Brand, Category, CreateBrand, CreateCategory, CreateProduct, CreateReview, OrderField,
    Product, ProductImage, ProductQuery, Review, UpdateBrand, UpdateCategory, UpdateProduct,
};
use crate::repository::CatalogRepository;

/// Sea-ORM backed implementation of [`CatalogRepository`].
#[derive(Clone)]
pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Translates a unique-constraint violation into a domain conflict error.
fn map_unique_violation(err: DbErr, slug: &str, sku: Option<&str>) -> CatalogError {
    if let Some(SqlErr::UniqueConstraintViolation(constraint)) = err.sql_err() {
        if let Some(sku) = sku
            && constraint.as_str().contains("sku")
        {
            return CatalogError::DuplicateSku(sku.to_string());
        }
        return CatalogError::DuplicateSlug(slug.to_string());
    }
    CatalogError::Database(err)
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let rows = category::Entity::find()
            .order_by(category::Column::Name, Order::Asc)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn get_category_by_id(&self, id: i32) -> CatalogResult<Option<Category>> {
        let row = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Category::from))
    }

    async fn get_category_by_slug(&self, slug: &str) -> CatalogResult<Option<Category>> {
        let row = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(row.map(Category::from))
    }

    async fn get_categories_by_ids(&self, ids: Vec<i32>) -> CatalogResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = category::Entity::find()
            .filter(category::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn create_category(
        &self,
        input: CreateCategory,
        slug: String,
    ) -> CatalogResult<Category> {
        let active = category::ActiveModel::from_create(input, slug.clone());
        let model = active
            .insert(&self.db)
            .await
            .map_err(|err| map_unique_violation(err, &slug, None))?;
        Ok(model.into())
    }

    async fn update_category(
        &self,
        id: i32,
        input: UpdateCategory,
    ) -> CatalogResult<Option<Category>> {
        let Some(existing) = category::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut active: category::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(image) = input.image {
            active.image = Set(Some(image));
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(Some(parent_id));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let model = active.update(&self.db).await?;
        Ok(Some(model.into()))
    }

    async fn delete_category(&self, id: i32) -> CatalogResult<bool> {
        let result = category::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_brands(&self) -> CatalogResult<Vec<Brand>> {
        let rows = brand::Entity::find()
            .order_by(brand::Column::Name, Order::Asc)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Brand::from).collect())
    }

    async fn get_brand_by_id(&self, id: i32) -> CatalogResult<Option<Brand>> {
        let row = brand::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Brand::from))
    }

    async fn get_brand_by_slug(&self, slug: &str) -> CatalogResult<Option<Brand>> {
        let row = brand::Entity::find()
            .filter(brand::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(row.map(Brand::from))
    }

    async fn get_brands_by_ids(&self, ids: Vec<i32>) -> CatalogResult<Vec<Brand>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = brand::Entity::find()
            .filter(brand::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Brand::from).collect())
    }

    async fn create_brand(&self, input: CreateBrand, slug: String) -> CatalogResult<Brand> {
        let active = brand::ActiveModel::from_create(input, slug.clone());
        let model = active
            .insert(&self.db)
            .await
            .map_err(|err| map_unique_violation(err, &slug, None))?;
        Ok(model.into())
    }

    async fn update_brand(&self, id: i32, input: UpdateBrand) -> CatalogResult<Option<Brand>> {
        let Some(existing) = brand::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut active: brand::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(logo) = input.logo {
            active.logo = Set(Some(logo));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let model = active.update(&self.db).await?;
        Ok(Some(model.into()))
    }

    async fn delete_brand(&self, id: i32) -> CatalogResult<bool> {
        let result = brand::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_products(
        &self,
        query: &ProductQuery,
        offset: u64,
        limit: u64,
    ) -> CatalogResult<(Vec<Product>, u64)> {
        let mut select = product::Entity::find().filter(product::Column::IsActive.eq(true));

        if let Some(category_id) = query.category_id {
            select = select.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(brand_id) = query.brand_id {
            select = select.filter(product::Column::BrandId.eq(brand_id));
        }
        if let Some(is_featured) = query.is_featured {
            select = select.filter(product::Column::IsFeatured.eq(is_featured));
        }
        if let Some(min_price) = query.min_price {
            select = select.filter(product::Column::PriceCents.gte(min_price));
        }
        if let Some(max_price) = query.max_price {
            select = select.filter(product::Column::PriceCents.lte(max_price));
        }
        if let Some(term) = query.search.as_deref() {
            let pattern = format!("%{term}%");
            select = select.filter(
                Condition::any()
                    .add(Expr::col(product::Column::Name).ilike(pattern.clone()))
                    .add(Expr::col(product::Column::Description).ilike(pattern.clone()))
                    .add(Expr::col(product::Column::Sku).ilike(pattern)),
            );
        }

        let count = select.clone().count(&self.db).await?;

        let order_column = match query.ordering.field {
            OrderField::Price => product::Column::PriceCents,
            OrderField::CreatedAt => product::Column::CreatedAt,
            OrderField::Name => product::Column::Name,
        };
        let direction = if query.ordering.descending {
            Order::Desc
        } else {
            Order::Asc
        };

        let rows = select
            .order_by(order_column, direction)
            .order_by(product::Column::Id, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok((rows.into_iter().map(Product::from).collect(), count))
    }

    async fn get_product_by_id(&self, id: i32) -> CatalogResult<Option<Product>> {
        let row = product::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Product::from))
    }

    async fn get_product_by_slug(&self, slug: &str) -> CatalogResult<Option<Product>> {
        let row = product::Entity::find()
            .filter(product::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn create_product(&self, input: CreateProduct, slug: String) -> CatalogResult<Product> {
        let sku = input.sku.clone();
        let active = product::ActiveModel::from_create(input, slug.clone());
        let model = active
            .insert(&self.db)
            .await
            .map_err(|err| map_unique_violation(err, &slug, Some(&sku)))?;
        Ok(model.into())
    }

    async fn update_product(
        &self,
        id: i32,
        input: UpdateProduct,
    ) -> CatalogResult<Option<Product>> {
        let Some(existing) = product::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut active: product::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(price_cents) = input.price_cents {
            active.price_cents = Set(price_cents);
        }
        if let Some(discounted) = input.discounted_price_cents {
            active.discounted_price_cents = Set(Some(discounted));
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(brand_id) = input.brand_id {
            active.brand_id = Set(Some(brand_id));
        }
        if let Some(stock_quantity) = input.stock_quantity {
            active.stock_quantity = Set(stock_quantity);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(is_featured) = input.is_featured {
            active.is_featured = Set(is_featured);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let model = active.update(&self.db).await?;
        Ok(Some(model.into()))
    }

    async fn delete_product(&self, id: i32) -> CatalogResult<bool> {
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_images(&self, product_ids: Vec<i32>) -> CatalogResult<Vec<ProductImage>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = product_image::Entity::find()
            .filter(product_image::Column::ProductId.is_in(product_ids))
            .order_by(product_image::Column::IsPrimary, Order::Desc)
            .order_by(product_image::Column::CreatedAt, Order::Asc)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(ProductImage::from).collect())
    }

    async fn list_approved_reviews(&self, product_id: i32) -> CatalogResult<Vec<Review>> {
        let rows = product_review::Entity::find()
            .filter(product_review::Column::ProductId.eq(product_id))
            .filter(product_review::Column::IsApproved.eq(true))
            .order_by(product_review::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn find_review(&self, product_id: i32, user_id: Uuid) -> CatalogResult<Option<Review>> {
        let row = product_review::Entity::find()
            .filter(product_review::Column::ProductId.eq(product_id))
            .filter(product_review::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(row.map(Review::from))
    }

    async fn create_review(
        &self,
        product_id: i32,
        user_id: Uuid,
        input: CreateReview,
    ) -> CatalogResult<Review> {
        let active = product_review::ActiveModel::from_create(product_id, user_id, input);
        let model = active.insert(&self.db).await.map_err(|err| {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                CatalogError::DuplicateReview
            } else {
                CatalogError::Database(err)
            }
        })?;
        Ok(model.into())
    }
}
