//! Handler tests for the catalog domain.
//!
//! These run the real router against containerized Postgres and Redis:
//! request deserialization, auth middleware, status codes and response
//! shapes, without the full application around them.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{JwtConfig, JwtRedisAuth};
use domain_catalog::{CatalogService, CreateCategory, CreateProduct, PgCatalogRepository, handlers};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{TestDataBuilder, TestDatabase, TestRedis};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const TEST_JWT_SECRET: &str = "catalog-handler-tests-secret-0123456789abcdef";

async fn setup() -> (
    TestDatabase,
    TestRedis,
    CatalogService<PgCatalogRepository>,
    JwtRedisAuth,
) {
    let db = TestDatabase::new().await;
    let redis = TestRedis::new().await;
    let auth = JwtRedisAuth::new(redis.connection(), &JwtConfig::new(TEST_JWT_SECRET));
    let service = CatalogService::new(std::sync::Arc::new(PgCatalogRepository::new(
        db.connection(),
    )));
    (db, redis, service, auth)
}

fn app(service: &CatalogService<PgCatalogRepository>, auth: &JwtRedisAuth) -> Router {
    handlers::router(service.clone(), auth.clone())
}

fn bearer(auth: &JwtRedisAuth, user_id: Uuid, roles: &[&str]) -> String {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    let token = auth
        .create_access_token(&user_id.to_string(), "tester@example.com", "tester", &roles)
        .unwrap();
    format!("Bearer {token}")
}

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", token);
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn put_json(uri: &str, bearer: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", bearer)
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn category(name: &str, parent_id: Option<i32>) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        description: String::new(),
        image: None,
        parent_id,
        is_active: true,
    }
}

fn product(name: &str, sku: &str, price_cents: i64) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        sku: sku.to_string(),
        description: String::new(),
        price_cents,
        discounted_price_cents: None,
        category_id: None,
        brand_id: None,
        stock_quantity: 10,
        is_active: true,
        is_featured: false,
    }
}

#[tokio::test]
async fn test_category_tree_nests_children() {
    let (_db, _redis, service, auth) = setup().await;

    let parent = service
        .create_category(category("Electronics", None))
        .await
        .unwrap();
    service
        .create_category(category("Laptops", Some(parent.id)))
        .await
        .unwrap();

    let response = app(&service, &auth)
        .oneshot(get("/categories"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let tree = json_body(response.into_body()).await;
    let roots = tree.as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["slug"], "electronics");
    assert_eq!(roots[0]["parent_id"], json!(null));
    assert_eq!(roots[0]["children"][0]["slug"], "laptops");
    assert_eq!(roots[0]["children"][0]["parent_id"], json!(parent.id));
    // Leaf nodes serialize with an empty children array, never null
    assert_eq!(roots[0]["children"][0]["children"], json!([]));
}

#[tokio::test]
async fn test_get_category_returns_404_for_unknown_slug() {
    let (_db, _redis, service, auth) = setup().await;

    let response = app(&service, &auth)
        .oneshot(get("/categories/no-such-category"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_category_requires_token() {
    let (_db, _redis, service, auth) = setup().await;

    let response = app(&service, &auth)
        .oneshot(post_json(
            "/categories",
            None,
            json!({"name": "Electronics"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_category_rejects_non_admin() {
    let (db, _redis, service, auth) = setup().await;
    let builder = TestDataBuilder::from_test_name("catalog_non_admin");
    let user_id = db.create_test_user(builder.user_id()).await;

    let token = bearer(&auth, user_id, &["user"]);
    let response = app(&service, &auth)
        .oneshot(post_json(
            "/categories",
            Some(&token),
            json!({"name": "Electronics"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_product_rejects_non_admin() {
    let (db, _redis, service, auth) = setup().await;
    let builder = TestDataBuilder::from_test_name("catalog_product_non_admin");
    let user_id = db.create_test_user(builder.user_id()).await;

    let body = json!({"name": "Widget", "sku": "SKU-NA", "price_cents": 1000});

    let response = app(&service, &auth)
        .oneshot(post_json("/products", None, body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = bearer(&auth, user_id, &["user"]);
    let response = app(&service, &auth)
        .oneshot(post_json("/products", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_creates_category_with_generated_slug() {
    let (db, _redis, service, auth) = setup().await;
    let builder = TestDataBuilder::from_test_name("catalog_admin_create");
    let admin_id = db.create_test_staff_user(builder.user_id()).await;

    let token = bearer(&auth, admin_id, &["admin"]);
    let response = app(&service, &auth)
        .oneshot(post_json(
            "/categories",
            Some(&token),
            json!({"name": "Gaming Laptops"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let created = json_body(response.into_body()).await;
    assert_eq!(created["slug"], "gaming-laptops");
    assert_eq!(created["is_active"], true);
}

#[tokio::test]
async fn test_duplicate_category_name_conflicts() {
    let (db, _redis, service, auth) = setup().await;
    let builder = TestDataBuilder::from_test_name("catalog_dup_slug");
    let admin_id = db.create_test_staff_user(builder.user_id()).await;

    service
        .create_category(category("Electronics", None))
        .await
        .unwrap();

    let token = bearer(&auth, admin_id, &["admin"]);
    let response = app(&service, &auth)
        .oneshot(post_json(
            "/categories",
            Some(&token),
            json!({"name": "Electronics"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_category_rejects_cycle_via_api() {
    let (db, _redis, service, auth) = setup().await;
    let builder = TestDataBuilder::from_test_name("catalog_cycle");
    let admin_id = db.create_test_staff_user(builder.user_id()).await;

    let parent = service
        .create_category(category("Electronics", None))
        .await
        .unwrap();
    let child = service
        .create_category(category("Laptops", Some(parent.id)))
        .await
        .unwrap();

    // Reparenting the root under its own descendant must fail
    let token = bearer(&auth, admin_id, &["admin"]);
    let response = app(&service, &auth)
        .oneshot(put_json(
            "/categories/electronics",
            &token,
            json!({"parent_id": child.id}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_products_paginates() {
    let (_db, _redis, service, auth) = setup().await;

    for i in 0..25 {
        service
            .create_product(product(
                &format!("Widget {i:02}"),
                &format!("WID-{i:03}"),
                1000 + i,
            ))
            .await
            .unwrap();
    }

    let response = app(&service, &auth)
        .oneshot(get("/products?page=1&page_size=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = json_body(response.into_body()).await;
    assert_eq!(page["count"], 25);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 10);

    let response = app(&service, &auth)
        .oneshot(get("/products?page=3&page_size=10"))
        .await
        .unwrap();
    let last = json_body(response.into_body()).await;
    assert_eq!(last["results"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_products_price_bounds_are_inclusive() {
    let (_db, _redis, service, auth) = setup().await;

    service
        .create_product(product("Cheap", "SKU-CHEAP", 500))
        .await
        .unwrap();
    service
        .create_product(product("Middle", "SKU-MID", 1000))
        .await
        .unwrap();
    service
        .create_product(product("Pricey", "SKU-PRICEY", 2000))
        .await
        .unwrap();

    let response = app(&service, &auth)
        .oneshot(get("/products?min_price=500&max_price=1000"))
        .await
        .unwrap();

    let page = json_body(response.into_body()).await;
    assert_eq!(page["count"], 2);
}

#[tokio::test]
async fn test_inactive_product_hidden_from_list_and_detail() {
    let (_db, _redis, service, auth) = setup().await;

    let mut input = product("Retired", "SKU-RETIRED", 1500);
    input.is_active = false;
    service.create_product(input).await.unwrap();

    let response = app(&service, &auth).oneshot(get("/products")).await.unwrap();
    let page = json_body(response.into_body()).await;
    assert_eq!(page["count"], 0);

    let response = app(&service, &auth)
        .oneshot(get("/products/retired"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_products_exposes_final_price() {
    let (_db, _redis, service, auth) = setup().await;

    let mut input = product("Discounted", "SKU-DISC", 10000);
    input.discounted_price_cents = Some(7500);
    service.create_product(input).await.unwrap();

    let response = app(&service, &auth)
        .oneshot(get("/products?ordering=price"))
        .await
        .unwrap();

    let page = json_body(response.into_body()).await;
    let item = &page["results"][0];
    assert_eq!(item["price_cents"], 10000);
    assert_eq!(item["final_price_cents"], 7500);
}

#[tokio::test]
async fn test_unknown_category_filter_returns_empty_page() {
    let (_db, _redis, service, auth) = setup().await;

    service
        .create_product(product("Widget", "SKU-W", 1000))
        .await
        .unwrap();

    let response = app(&service, &auth)
        .oneshot(get("/products?category=no-such-slug"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let page = json_body(response.into_body()).await;
    assert_eq!(page["count"], 0);
    assert_eq!(page["results"], json!([]));
}

#[tokio::test]
async fn test_category_filter_accepts_slug() {
    let (_db, _redis, service, auth) = setup().await;

    let cat = service
        .create_category(category("Peripherals", None))
        .await
        .unwrap();
    let mut input = product("Mouse", "SKU-MOUSE", 2500);
    input.category_id = Some(cat.id);
    service.create_product(input).await.unwrap();
    service
        .create_product(product("Unrelated", "SKU-OTHER", 900))
        .await
        .unwrap();

    let response = app(&service, &auth)
        .oneshot(get("/products?category=peripherals"))
        .await
        .unwrap();

    let page = json_body(response.into_body()).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["slug"], "mouse");
    assert_eq!(page["results"][0]["category"]["slug"], "peripherals");
}

#[tokio::test]
async fn test_duplicate_sku_conflicts() {
    let (db, _redis, service, auth) = setup().await;
    let builder = TestDataBuilder::from_test_name("catalog_dup_sku");
    let admin_id = db.create_test_staff_user(builder.user_id()).await;

    service
        .create_product(product("Widget", "SKU-TAKEN", 1000))
        .await
        .unwrap();

    let token = bearer(&auth, admin_id, &["admin"]);
    let response = app(&service, &auth)
        .oneshot(post_json(
            "/products",
            Some(&token),
            json!({"name": "Other Widget", "sku": "SKU-TAKEN", "price_cents": 2000}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let error = json_body(response.into_body()).await;
    assert!(error.to_string().contains("SKU-TAKEN"));
}

#[tokio::test]
async fn test_review_flow_rejects_duplicates() {
    let (db, _redis, service, auth) = setup().await;
    let builder = TestDataBuilder::from_test_name("catalog_review_dup");
    let user_id = db.create_test_user(builder.user_id()).await;

    service
        .create_product(product("Keyboard", "SKU-KBD", 4500))
        .await
        .unwrap();

    let token = bearer(&auth, user_id, &["user"]);
    let body = json!({"rating": 5, "title": "Great", "comment": "Clicky."});

    let response = app(&service, &auth)
        .oneshot(post_json(
            "/products/keyboard/reviews",
            Some(&token),
            body.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let review = json_body(response.into_body()).await;
    assert_eq!(review["rating"], 5);
    assert_eq!(review["is_approved"], false);

    let response = app(&service, &auth)
        .oneshot(post_json("/products/keyboard/reviews", Some(&token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_review_rating_out_of_range_is_rejected() {
    let (db, _redis, service, auth) = setup().await;
    let builder = TestDataBuilder::from_test_name("catalog_review_range");
    let user_id = db.create_test_user(builder.user_id()).await;

    service
        .create_product(product("Monitor", "SKU-MON", 30000))
        .await
        .unwrap();

    let token = bearer(&auth, user_id, &["user"]);
    let response = app(&service, &auth)
        .oneshot(post_json(
            "/products/monitor/reviews",
            Some(&token),
            json!({"rating": 6}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_brand_crud_round_trip() {
    let (db, _redis, service, auth) = setup().await;
    let builder = TestDataBuilder::from_test_name("catalog_brands");
    let admin_id = db.create_test_staff_user(builder.user_id()).await;
    let token = bearer(&auth, admin_id, &["admin"]);

    let response = app(&service, &auth)
        .oneshot(post_json(
            "/categories/brands",
            Some(&token),
            json!({"name": "Acme Corp"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let brand = json_body(response.into_body()).await;
    assert_eq!(brand["slug"], "acme-corp");

    let response = app(&service, &auth)
        .oneshot(get("/categories/brands"))
        .await
        .unwrap();
    let brands = json_body(response.into_body()).await;
    assert_eq!(brands.as_array().unwrap().len(), 1);

    let response = app(&service, &auth)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/categories/brands/acme-corp")
                .header("authorization", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_search_matches_name_case_insensitively() {
    let (_db, _redis, service, auth) = setup().await;

    service
        .create_product(product("Mechanical Keyboard", "SKU-MK", 9000))
        .await
        .unwrap();
    service
        .create_product(product("Webcam", "SKU-WC", 4000))
        .await
        .unwrap();

    let response = app(&service, &auth)
        .oneshot(get("/products?search=KEYBOARD"))
        .await
        .unwrap();

    let page = json_body(response.into_body()).await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["slug"], "mechanical-keyboard");
}
