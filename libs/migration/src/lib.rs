pub use sea_orm_migration::prelude::*;

mod m20250106_000000_create_users;
mod m20250106_000001_create_categories_and_brands;
mod m20250106_000002_create_products;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250106_000000_create_users::Migration),
            Box::new(m20250106_000001_create_categories_and_brands::Migration),
            Box::new(m20250106_000002_create_products::Migration),
        ]
    }
}
