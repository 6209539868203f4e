use axum_helpers::JwtRedisAuth;
use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_catalog::{postgres::PgCatalogRepository, service::CatalogService};
use domain_users::{postgres::PgUserRepository, service::UserService};
use std::sync::Arc;
use tracing::info;

mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre before any fallible operations
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    // Connect to Postgres and Redis concurrently
    let postgres_future = async {
        database::postgres::connect_from_config_with_retry(config.database.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };

    let redis_future = async {
        database::redis::connect_from_config_with_retry(config.redis.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
    };

    let (db, redis) = tokio::try_join!(postgres_future, redis_future)?;

    database::postgres::run_migrations::<migration::Migrator>(&db, &config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;

    let jwt_auth = JwtRedisAuth::new(redis, &config.jwt);

    let catalog_service = CatalogService::new(Arc::new(PgCatalogRepository::new(db.clone())));
    let user_service = UserService::new(Arc::new(PgUserRepository::new(db)));

    let api_routes = domain_catalog::handlers::router(catalog_service, jwt_auth.clone())
        .merge(domain_users::handlers::router(user_service, jwt_auth));

    // create_router adds docs, tracing, CORS and compression around our routes
    let router = create_router::<openapi::ApiDoc>(api_routes).await?;

    let app = router.merge(health_router(config.app.clone()));

    info!(
        name = %config.app.name,
        version = %config.app.version,
        "starting storefront API"
    );

    create_app(app, &config.server)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    Ok(())
}
