use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{
    Brand, Category, CreateBrand, CreateCategory, CreateProduct, CreateReview, Product,
    ProductImage, ProductQuery, Review, UpdateBrand, UpdateCategory, UpdateProduct,
};

/// Persistence operations for the catalog domain.
///
/// Mocked in service unit tests; the Postgres implementation lives in
/// [`crate::postgres`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // Categories
    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;
    async fn get_category_by_id(&self, id: i32) -> CatalogResult<Option<Category>>;
    async fn get_category_by_slug(&self, slug: &str) -> CatalogResult<Option<Category>>;
    async fn get_categories_by_ids(&self, ids: Vec<i32>) -> CatalogResult<Vec<Category>>;
    async fn create_category(&self, input: CreateCategory, slug: String)
    -> CatalogResult<Category>;
    async fn update_category(
        &self,
        id: i32,
        input: UpdateCategory,
    ) -> CatalogResult<Option<Category>>;
    async fn delete_category(&self, id: i32) -> CatalogResult<bool>;

    // Brands
    async fn list_brands(&self) -> CatalogResult<Vec<Brand>>;
    async fn get_brand_by_id(&self, id: i32) -> CatalogResult<Option<Brand>>;
    async fn get_brand_by_slug(&self, slug: &str) -> CatalogResult<Option<Brand>>;
    async fn get_brands_by_ids(&self, ids: Vec<i32>) -> CatalogResult<Vec<Brand>>;
    async fn create_brand(&self, input: CreateBrand, slug: String) -> CatalogResult<Brand>;
    async fn update_brand(&self, id: i32, input: UpdateBrand) -> CatalogResult<Option<Brand>>;
    async fn delete_brand(&self, id: i32) -> CatalogResult<bool>;

    // Products
    async fn list_products(
        &self,
        query: &ProductQuery,
        offset: u64,
        limit: u64,
    ) -> CatalogResult<(Vec<Product>, u64)>;
    async fn get_product_by_id(&self, id: i32) -> CatalogResult<Option<Product>>;
    async fn get_product_by_slug(&self, slug: &str) -> CatalogResult<Option<Product>>;
    async fn create_product(&self, input: CreateProduct, slug: String) -> CatalogResult<Product>;
    async fn update_product(&self, id: i32, input: UpdateProduct)
    -> CatalogResult<Option<Product>>;
    async fn delete_product(&self, id: i32) -> CatalogResult<bool>;
    async fn list_images(&self, product_ids: Vec<i32>) -> CatalogResult<Vec<ProductImage>>;

    // Reviews
    async fn list_approved_reviews(&self, product_id: i32) -> CatalogResult<Vec<Review>>;
    async fn find_review(&self, product_id: i32, user_id: Uuid) -> CatalogResult<Option<Review>>;
    async fn create_review(
        &self,
        product_id: i32,
        user_id: Uuid,
        input: CreateReview,
    ) -> CatalogResult<Review>;
}
