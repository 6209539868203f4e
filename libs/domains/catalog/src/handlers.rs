//! HTTP handlers for the catalog API.
//!
//! Read endpoints are public. Mutations require a valid access token; all
//! of them except review creation additionally require the admin role.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AdminUser, AuthUser, JwtRedisAuth, Page, Pagination, ValidatedJson, jwt_auth_middleware,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{
    Brand, Category, CategoryNode, CreateBrand, CreateCategory, CreateProduct, CreateReview,
    Product, ProductDetail, ProductFilter, ProductListItem, Review, UpdateBrand, UpdateCategory,
    UpdateProduct,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        category_tree,
        get_category,
        create_category,
        update_category,
        delete_category,
        list_brands,
        create_brand,
        update_brand,
        delete_brand,
        list_products,
        get_product,
        create_product,
        update_product,
        delete_product,
        create_review,
    ),
    components(
        schemas(
            Category, CategoryNode, Brand, CreateCategory, UpdateCategory,
            CreateBrand, UpdateBrand, Product, ProductListItem, ProductDetail,
            CreateProduct, UpdateProduct, Review, CreateReview,
            Page<ProductListItem>
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Catalog", description = "Categories, brands, products and reviews")
    )
)]
pub struct ApiDoc;

/// Create the catalog router.
///
/// `auth` backs the token middleware guarding the mutation endpoints.
pub fn router<R: CatalogRepository + 'static>(
    service: CatalogService<R>,
    auth: JwtRedisAuth,
) -> Router {
    let shared_service = Arc::new(service);
    let guard = middleware::from_fn_with_state(auth, jwt_auth_middleware);

    Router::new()
        .route(
            "/categories",
            get(category_tree::<R>).merge(post(create_category::<R>).layer(guard.clone())),
        )
        .route(
            "/categories/brands",
            get(list_brands::<R>).merge(post(create_brand::<R>).layer(guard.clone())),
        )
        .route(
            "/categories/brands/{slug}",
            put(update_brand::<R>)
                .delete(delete_brand::<R>)
                .layer(guard.clone()),
        )
        .route(
            "/categories/{slug}",
            get(get_category::<R>).merge(
                put(update_category::<R>)
                    .delete(delete_category::<R>)
                    .layer(guard.clone()),
            ),
        )
        .route(
            "/products",
            get(list_products::<R>).merge(post(create_product::<R>).layer(guard.clone())),
        )
        .route(
            "/products/{slug}",
            get(get_product::<R>).merge(
                put(update_product::<R>)
                    .delete(delete_product::<R>)
                    .layer(guard.clone()),
            ),
        )
        .route(
            "/products/{slug}/reviews",
            post(create_review::<R>).layer(guard),
        )
        .with_state(shared_service)
}

/// List active categories as a tree
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    responses(
        (status = 200, description = "Active categories with nested children", body = Vec<CategoryNode>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn category_tree<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<CategoryNode>>> {
    let tree = service.category_tree().await?;
    Ok(Json(tree))
}

/// Get one category by slug, children included
#[utoipa::path(
    get,
    path = "/categories/{slug}",
    tag = "Catalog",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryNode),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(slug): Path<String>,
) -> CatalogResult<Json<CategoryNode>> {
    let node = service.category_subtree(&slug).await?;
    Ok(Json(node))
}

/// Create a category (admin)
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category (admin)
#[utoipa::path(
    put,
    path = "/categories/{slug}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    Path(slug): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CatalogResult<Json<Category>> {
    let category = service.update_category(&slug, input).await?;
    Ok(Json(category))
}

/// Delete a category (admin)
#[utoipa::path(
    delete,
    path = "/categories/{slug}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    Path(slug): Path<String>,
) -> CatalogResult<impl IntoResponse> {
    service.delete_category(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List active brands
#[utoipa::path(
    get,
    path = "/categories/brands",
    tag = "Catalog",
    responses(
        (status = 200, description = "Active brands", body = Vec<Brand>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_brands<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Brand>>> {
    let brands = service.list_brands().await?;
    Ok(Json(brands))
}

/// Create a brand (admin)
#[utoipa::path(
    post,
    path = "/categories/brands",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateBrand,
    responses(
        (status = 201, description = "Brand created", body = Brand),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_brand<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<CreateBrand>,
) -> CatalogResult<impl IntoResponse> {
    let brand = service.create_brand(input).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// Update a brand (admin)
#[utoipa::path(
    put,
    path = "/categories/brands/{slug}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Brand slug")
    ),
    request_body = UpdateBrand,
    responses(
        (status = 200, description = "Brand updated", body = Brand),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_brand<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    Path(slug): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateBrand>,
) -> CatalogResult<Json<Brand>> {
    let brand = service.update_brand(&slug, input).await?;
    Ok(Json(brand))
}

/// Delete a brand (admin)
#[utoipa::path(
    delete,
    path = "/categories/brands/{slug}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Brand slug")
    ),
    responses(
        (status = 204, description = "Brand deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_brand<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    Path(slug): Path<String>,
) -> CatalogResult<impl IntoResponse> {
    service.delete_brand(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List active products with filtering, ordering and pagination
#[utoipa::path(
    get,
    path = "/products",
    tag = "Catalog",
    params(ProductFilter, Pagination),
    responses(
        (status = 200, description = "Page of products", body = Page<ProductListItem>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(filter): Query<ProductFilter>,
    Query(pagination): Query<Pagination>,
) -> CatalogResult<Json<Page<ProductListItem>>> {
    let page = service.list_products(&filter, &pagination).await?;
    Ok(Json(page))
}

/// Get one product by slug
#[utoipa::path(
    get,
    path = "/products/{slug}",
    tag = "Catalog",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(slug): Path<String>,
) -> CatalogResult<Json<ProductDetail>> {
    let detail = service.product_detail(&slug).await?;
    Ok(Json(detail))
}

/// Create a product (admin)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (admin)
#[utoipa::path(
    put,
    path = "/products/{slug}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    Path(slug): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    let product = service.update_product(&slug, input).await?;
    Ok(Json(product))
}

/// Delete a product (admin)
#[utoipa::path(
    delete,
    path = "/products/{slug}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    _admin: AdminUser,
    Path(slug): Path<String>,
) -> CatalogResult<impl IntoResponse> {
    service.delete_product(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Review a product
///
/// One review per user per product; new reviews await moderation.
#[utoipa::path(
    post,
    path = "/products/{slug}/reviews",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_review<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    Path(slug): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateReview>,
) -> CatalogResult<impl IntoResponse> {
    let review = service.create_review(&slug, user.id, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
