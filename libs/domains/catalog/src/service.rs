use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum_helpers::{Page, Pagination};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Brand, BrandRef, Category, CategoryNode, CategoryRef, CreateBrand, CreateCategory,
    CreateProduct, CreateReview, Product, ProductDetail, ProductFilter, ProductImage,
    ProductListItem, ProductOrdering, ProductQuery, Review, UpdateBrand, UpdateCategory,
    UpdateProduct, slugify,
};
use crate::repository::CatalogRepository;

/// Catalog business logic on top of a [`CatalogRepository`].
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns all active top-level categories with their active
    /// descendants nested under `children`.
    #[instrument(skip(self))]
    pub async fn category_tree(&self) -> CatalogResult<Vec<CategoryNode>> {
        let categories = self.repository.list_categories().await?;
        let mut visited = HashSet::new();
        let tree = categories
            .iter()
            .filter(|c| c.is_active && c.parent_id.is_none())
            .map(|c| build_node(c, &categories, &mut visited))
            .collect();
        Ok(tree)
    }

    /// Returns one active category by slug, children included.
    #[instrument(skip(self))]
    pub async fn category_subtree(&self, slug: &str) -> CatalogResult<CategoryNode> {
        let categories = self.repository.list_categories().await?;
        let root = categories
            .iter()
            .find(|c| c.slug == slug && c.is_active)
            .ok_or_else(|| CatalogError::CategoryNotFound(slug.to_string()))?;
        let mut visited = HashSet::new();
        Ok(build_node(root, &categories, &mut visited))
    }

    #[instrument(skip(self, input))]
    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        if let Some(parent_id) = input.parent_id {
            self.repository
                .get_category_by_id(parent_id)
                .await?
                .ok_or_else(|| CatalogError::CategoryNotFound(parent_id.to_string()))?;
        }
        let slug = slugify(&input.name);
        self.repository.create_category(input, slug).await
    }

    /// Updates a category. A parent change is rejected when it would make
    /// the category its own ancestor.
    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        slug: &str,
        input: UpdateCategory,
    ) -> CatalogResult<Category> {
        let categories = self.repository.list_categories().await?;
        let target = categories
            .iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| CatalogError::CategoryNotFound(slug.to_string()))?;
        if let Some(parent_id) = input.parent_id {
            ensure_no_cycle(target.id, parent_id, &categories)?;
        }
        let id = target.id;
        self.repository
            .update_category(id, input)
            .await?
            .ok_or_else(|| CatalogError::CategoryNotFound(slug.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, slug: &str) -> CatalogResult<()> {
        let category = self
            .repository
            .get_category_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::CategoryNotFound(slug.to_string()))?;
        if self.repository.delete_category(category.id).await? {
            Ok(())
        } else {
            Err(CatalogError::CategoryNotFound(slug.to_string()))
        }
    }

    /// Active brands, name-ordered.
    #[instrument(skip(self))]
    pub async fn list_brands(&self) -> CatalogResult<Vec<Brand>> {
        let brands = self.repository.list_brands().await?;
        Ok(brands.into_iter().filter(|b| b.is_active).collect())
    }

    #[instrument(skip(self, input))]
    pub async fn create_brand(&self, input: CreateBrand) -> CatalogResult<Brand> {
        let slug = slugify(&input.name);
        self.repository.create_brand(input, slug).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_brand(&self, slug: &str, input: UpdateBrand) -> CatalogResult<Brand> {
        let brand = self
            .repository
            .get_brand_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::BrandNotFound(slug.to_string()))?;
        self.repository
            .update_brand(brand.id, input)
            .await?
            .ok_or_else(|| CatalogError::BrandNotFound(slug.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_brand(&self, slug: &str) -> CatalogResult<()> {
        let brand = self
            .repository
            .get_brand_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::BrandNotFound(slug.to_string()))?;
        if self.repository.delete_brand(brand.id).await? {
            Ok(())
        } else {
            Err(CatalogError::BrandNotFound(slug.to_string()))
        }
    }

    /// Filtered, ordered, paginated listing of active products.
    ///
    /// The `category` filter accepts an id or a slug; a slug that matches
    /// no category yields an empty page rather than an error.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
        pagination: &Pagination,
    ) -> CatalogResult<Page<ProductListItem>> {
        let category_id = match filter.category.as_deref() {
            Some(raw) => match self.resolve_category(raw).await? {
                Some(id) => Some(id),
                None => return Ok(Page::new(Vec::new(), 0, pagination)),
            },
            None => None,
        };

        let query = ProductQuery {
            category_id,
            brand_id: filter.brand,
            is_featured: filter.is_featured,
            min_price: filter.min_price,
            max_price: filter.max_price,
            search: filter.search.clone(),
            ordering: ProductOrdering::parse(filter.ordering.as_deref()),
        };

        let (products, count) = self
            .repository
            .list_products(&query, pagination.offset(), pagination.limit())
            .await?;

        let items = self.assemble_list_items(products).await?;
        Ok(Page::new(items, count, pagination))
    }

    /// Full detail for one active product, by slug.
    #[instrument(skip(self))]
    pub async fn product_detail(&self, slug: &str) -> CatalogResult<ProductDetail> {
        let product = self
            .repository
            .get_product_by_slug(slug)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))?;

        let category = match product.category_id {
            Some(id) => self.repository.get_category_by_id(id).await?,
            None => None,
        };
        let brand = match product.brand_id {
            Some(id) => self.repository.get_brand_by_id(id).await?,
            None => None,
        };
        let images = self.repository.list_images(vec![product.id]).await?;
        let reviews = self.repository.list_approved_reviews(product.id).await?;

        Ok(build_detail(product, category, brand, images, reviews))
    }

    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        if let Some(category_id) = input.category_id {
            self.repository
                .get_category_by_id(category_id)
                .await?
                .ok_or_else(|| CatalogError::CategoryNotFound(category_id.to_string()))?;
        }
        if let Some(brand_id) = input.brand_id {
            self.repository
                .get_brand_by_id(brand_id)
                .await?
                .ok_or_else(|| CatalogError::BrandNotFound(brand_id.to_string()))?;
        }
        let slug = slugify(&input.name);
        self.repository.create_product(input, slug).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, slug: &str, input: UpdateProduct) -> CatalogResult<Product> {
        let product = self
            .repository
            .get_product_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))?;
        if let Some(category_id) = input.category_id {
            self.repository
                .get_category_by_id(category_id)
                .await?
                .ok_or_else(|| CatalogError::CategoryNotFound(category_id.to_string()))?;
        }
        if let Some(brand_id) = input.brand_id {
            self.repository
                .get_brand_by_id(brand_id)
                .await?
                .ok_or_else(|| CatalogError::BrandNotFound(brand_id.to_string()))?;
        }
        self.repository
            .update_product(product.id, input)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, slug: &str) -> CatalogResult<()> {
        let product = self
            .repository
            .get_product_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))?;
        if self.repository.delete_product(product.id).await? {
            Ok(())
        } else {
            Err(CatalogError::ProductNotFound(slug.to_string()))
        }
    }

    /// Records a review for the product behind `slug`. Each user gets one
    /// review per product; reviews await moderation before they are shown.
    #[instrument(skip(self, input))]
    pub async fn create_review(
        &self,
        slug: &str,
        user_id: Uuid,
        input: CreateReview,
    ) -> CatalogResult<Review> {
        let product = self
            .repository
            .get_product_by_slug(slug)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))?;

        if self
            .repository
            .find_review(product.id, user_id)
            .await?
            .is_some()
        {
            return Err(CatalogError::DuplicateReview);
        }

        self.repository
            .create_review(product.id, user_id, input)
            .await
    }

    /// A numeric value is treated as a category id, anything else as a slug.
    async fn resolve_category(&self, raw: &str) -> CatalogResult<Option<i32>> {
        if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
            return match raw.parse::<i32>() {
                Ok(id) => Ok(Some(id)),
                Err(_) => Ok(None),
            };
        }
        let category = self.repository.get_category_by_slug(raw).await?;
        Ok(category.map(|c| c.id))
    }

    async fn assemble_list_items(
        &self,
        products: Vec<Product>,
    ) -> CatalogResult<Vec<ProductListItem>> {
        let category_ids: Vec<i32> = dedup(products.iter().filter_map(|p| p.category_id));
        let brand_ids: Vec<i32> = dedup(products.iter().filter_map(|p| p.brand_id));
        let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();

        let categories: HashMap<i32, Category> = self
            .repository
            .get_categories_by_ids(category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let brands: HashMap<i32, Brand> = self
            .repository
            .get_brands_by_ids(brand_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        // Images arrive primary-first, so the first image per product wins.
        let mut primary_images: HashMap<i32, String> = HashMap::new();
        for image in self.repository.list_images(product_ids).await? {
            primary_images
                .entry(image.product_id)
                .or_insert(image.image);
        }

        Ok(products
            .into_iter()
            .map(|p| {
                let final_price_cents = p.final_price_cents();
                ProductListItem {
                    id: p.id,
                    name: p.name,
                    slug: p.slug,
                    sku: p.sku,
                    price_cents: p.price_cents,
                    discounted_price_cents: p.discounted_price_cents,
                    final_price_cents,
                    category: p
                        .category_id
                        .and_then(|id| categories.get(&id))
                        .map(CategoryRef::from),
                    brand: p.brand_id.and_then(|id| brands.get(&id)).map(BrandRef::from),
                    primary_image: primary_images.remove(&p.id),
                    stock_quantity: p.stock_quantity,
                    is_featured: p.is_featured,
                    created_at: p.created_at,
                }
            })
            .collect())
    }
}

/// Recursively attaches children. Only tree roots are filtered on the
/// active flag; children are serialized regardless of their own. The
/// visited set guards against a malformed parent chain already present
/// in the data.
fn build_node(root: &Category, all: &[Category], visited: &mut HashSet<i32>) -> CategoryNode {
    visited.insert(root.id);
    let mut node = CategoryNode::leaf(root);
    let children: Vec<&Category> = all
        .iter()
        .filter(|c| c.parent_id == Some(root.id) && !visited.contains(&c.id))
        .collect();
    node.children = children
        .into_iter()
        .map(|c| build_node(c, all, visited))
        .collect();
    node
}

/// Walks up from the proposed parent; finding `category_id` on the way
/// means the reassignment would close a loop.
fn ensure_no_cycle(category_id: i32, new_parent_id: i32, all: &[Category]) -> CatalogResult<()> {
    if category_id == new_parent_id {
        return Err(CatalogError::CategoryCycle);
    }
    let parents: HashMap<i32, Option<i32>> = all.iter().map(|c| (c.id, c.parent_id)).collect();
    if !parents.contains_key(&new_parent_id) {
        return Err(CatalogError::CategoryNotFound(new_parent_id.to_string()));
    }
    let mut seen = HashSet::new();
    let mut current = Some(new_parent_id);
    while let Some(id) = current {
        if id == category_id {
            return Err(CatalogError::CategoryCycle);
        }
        if !seen.insert(id) {
            break;
        }
        current = parents.get(&id).copied().flatten();
    }
    Ok(())
}

fn build_detail(
    product: Product,
    category: Option<Category>,
    brand: Option<Brand>,
    images: Vec<ProductImage>,
    reviews: Vec<Review>,
) -> ProductDetail {
    let final_price_cents = product.final_price_cents();
    ProductDetail {
        id: product.id,
        name: product.name,
        slug: product.slug,
        sku: product.sku,
        description: product.description,
        price_cents: product.price_cents,
        discounted_price_cents: product.discounted_price_cents,
        final_price_cents,
        category: category.as_ref().map(CategoryRef::from),
        brand: brand.as_ref().map(BrandRef::from),
        images: images.iter().map(Into::into).collect(),
        reviews: reviews.iter().map(Into::into).collect(),
        stock_quantity: product.stock_quantity,
        is_active: product.is_active,
        is_featured: product.is_featured,
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

fn dedup(ids: impl Iterator<Item = i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
