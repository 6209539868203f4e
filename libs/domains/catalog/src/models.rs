use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A product category. Categories form a tree through `parent_id`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with its descendants nested under `children`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent_id: Option<i32>,
    pub image: Option<String>,
    pub is_active: bool,
    #[schema(no_recursion)]
    pub children: Vec<CategoryNode>,
    pub created_at: DateTime<Utc>,
}

impl CategoryNode {
    pub fn leaf(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            parent_id: category.parent_id,
            image: category.image.clone(),
            is_active: category.is_active,
            children: Vec::new(),
            created_at: category.created_at,
        }
    }
}

/// Short category reference embedded in product payloads.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<String>,
    pub parent_id: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub parent_id: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Brand {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub logo: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short brand reference embedded in product payloads.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrandRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<&Brand> for BrandRef {
    fn from(brand: &Brand) -> Self {
        Self {
            id: brand.id,
            name: brand.name.clone(),
            slug: brand.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBrand {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub logo: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateBrand {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub is_active: Option<bool>,
}

/// Core product record as stored. Prices are integer cents.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub description: String,
    pub price_cents: i64,
    pub discounted_price_cents: Option<i64>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a buyer actually pays: the discounted price when one is set.
    pub fn final_price_cents(&self) -> i64 {
        self.discounted_price_cents.unwrap_or(self.price_cents)
    }
}

/// Compact product representation used in listing endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductListItem {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub price_cents: i64,
    pub discounted_price_cents: Option<i64>,
    pub final_price_cents: i64,
    pub category: Option<CategoryRef>,
    pub brand: Option<BrandRef>,
    pub primary_image: Option<String>,
    pub stock_quantity: i32,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub image: String,
    pub alt_text: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductImageResponse {
    pub id: i32,
    pub image: String,
    pub alt_text: String,
    pub is_primary: bool,
}

impl From<&ProductImage> for ProductImageResponse {
    fn from(image: &ProductImage) -> Self {
        Self {
            id: image.id,
            image: image.image.clone(),
            alt_text: image.alt_text.clone(),
            is_primary: image.is_primary,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: Uuid,
    pub rating: i16,
    pub title: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Full product representation for the detail endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub description: String,
    pub price_cents: i64,
    pub discounted_price_cents: Option<i64>,
    pub final_price_cents: i64,
    pub category: Option<CategoryRef>,
    pub brand: Option<BrandRef>,
    pub images: Vec<ProductImageResponse>,
    pub reviews: Vec<ReviewResponse>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[validate(range(min = 0))]
    pub discounted_price_cents: Option<i64>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock_quantity: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
    #[validate(range(min = 0))]
    pub discounted_price_cents: Option<i64>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub title: String,
    #[serde(default)]
    pub comment: String,
}

/// Review as stored, including moderation state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub user_id: Uuid,
    pub rating: i16,
    pub title: String,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            rating: review.rating,
            title: review.title.clone(),
            comment: review.comment.clone(),
            created_at: review.created_at,
        }
    }
}

/// Query-string filters for the product listing endpoint.
///
/// `category` accepts either a numeric id or a slug. `min_price` and
/// `max_price` are inclusive bounds on the list price in cents.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub brand: Option<i32>,
    pub is_featured: Option<bool>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// Filter with the category parameter already resolved to an id.
/// Built by the service before it reaches the repository.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub is_featured: Option<bool>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub search: Option<String>,
    pub ordering: ProductOrdering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Price,
    CreatedAt,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductOrdering {
    pub field: OrderField,
    pub descending: bool,
}

impl Default for ProductOrdering {
    fn default() -> Self {
        Self {
            field: OrderField::CreatedAt,
            descending: true,
        }
    }
}

impl ProductOrdering {
    /// Parses an ordering parameter such as `price` or `-created_at`.
    /// Unrecognized values fall back to newest-first.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let (descending, field_name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = match field_name {
            "price" => OrderField::Price,
            "created_at" => OrderField::CreatedAt,
            "name" => OrderField::Name,
            _ => return Self::default(),
        };
        Self { field, descending }
    }
}

/// Derives a URL-safe slug from a display name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Gaming Laptops"), "gaming-laptops");
        assert_eq!(slugify("  USB-C  Cables "), "usb-c-cables");
        assert_eq!(slugify("Caffè & Té"), "caff-t");
    }

    #[test]
    fn test_ordering_parse() {
        assert_eq!(
            ProductOrdering::parse(Some("price")),
            ProductOrdering {
                field: OrderField::Price,
                descending: false
            }
        );
        assert_eq!(
            ProductOrdering::parse(Some("-name")),
            ProductOrdering {
                field: OrderField::Name,
                descending: true
            }
        );
        assert_eq!(ProductOrdering::parse(None), ProductOrdering::default());
        assert_eq!(
            ProductOrdering::parse(Some("rating")),
            ProductOrdering::default()
        );
    }

    #[test]
    fn test_final_price_prefers_discount() {
        let product = sample_product(1999, Some(1499));
        assert_eq!(product.final_price_cents(), 1499);

        let undiscounted = sample_product(1999, None);
        assert_eq!(undiscounted.final_price_cents(), 1999);
    }

    fn sample_product(price_cents: i64, discounted_price_cents: Option<i64>) -> Product {
        Product {
            id: 1,
            name: "Sample".into(),
            slug: "sample".into(),
            sku: "SKU-1".into(),
            description: String::new(),
            price_cents,
            discounted_price_cents,
            category_id: None,
            brand_id: None,
            stock_quantity: 0,
            is_active: true,
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
