use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "E-commerce backend: catalog browsing, product reviews and JWT authentication"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    modifiers(&SecurityAddon)
)]
struct BaseDoc;

/// Combined API documentation for the storefront.
///
/// The domain crates document their routes with full paths, so their docs
/// are merged into the base document as-is, together with the bearer
/// token security scheme the protected endpoints reference.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseDoc::openapi();
        doc.merge(domain_catalog::handlers::ApiDoc::openapi());
        doc.merge(domain_users::handlers::ApiDoc::openapi());
        doc
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
