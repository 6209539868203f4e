use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create products table
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string(Products::Name))
                    .col(string_uniq(Products::Slug))
                    .col(string_uniq(Products::Sku))
                    .col(text(Products::Description).default(""))
                    .col(
                        big_integer(Products::PriceCents)
                            .check(Expr::col(Products::PriceCents).gte(0)),
                    )
                    .col(big_integer_null(Products::DiscountedPriceCents).check(
                        Expr::col(Products::DiscountedPriceCents).gte(0),
                    ))
                    .col(integer_null(Products::CategoryId))
                    .col(integer_null(Products::BrandId))
                    .col(
                        integer(Products::StockQuantity)
                            .default(0)
                            .check(Expr::col(Products::StockQuantity).gte(0)),
                    )
                    .col(boolean(Products::IsActive).default(true))
                    .col(boolean(Products::IsFeatured).default(false))
                    .col(
                        timestamp_with_time_zone(Products::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Products::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category_id")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_brand_id")
                            .from(Products::Table, Products::BrandId)
                            .to(Brands::Table, Brands::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category_id")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_brand_id")
                    .table(Products::Table)
                    .col(Products::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_created_at")
                    .table(Products::Table)
                    .col(Products::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Create product_images table
        manager
            .create_table(
                Table::create()
                    .table(ProductImages::Table)
                    .if_not_exists()
                    .col(pk_auto(ProductImages::Id))
                    .col(integer(ProductImages::ProductId))
                    .col(string(ProductImages::Image))
                    .col(string(ProductImages::AltText).default(""))
                    .col(boolean(ProductImages::IsPrimary).default(false))
                    .col(
                        timestamp_with_time_zone(ProductImages::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_images_product_id")
                            .from(ProductImages::Table, ProductImages::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_images_product_id")
                    .table(ProductImages::Table)
                    .col(ProductImages::ProductId)
                    .to_owned(),
            )
            .await?;

        // Create product_reviews table
        manager
            .create_table(
                Table::create()
                    .table(ProductReviews::Table)
                    .if_not_exists()
                    .col(pk_auto(ProductReviews::Id))
                    .col(integer(ProductReviews::ProductId))
                    .col(uuid(ProductReviews::UserId))
                    .col(small_integer(ProductReviews::Rating).check(
                        Expr::col(ProductReviews::Rating).between(1, 5),
                    ))
                    .col(string(ProductReviews::Title).default(""))
                    .col(text(ProductReviews::Comment).default(""))
                    .col(boolean(ProductReviews::IsApproved).default(false))
                    .col(
                        timestamp_with_time_zone(ProductReviews::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ProductReviews::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_reviews_product_id")
                            .from(ProductReviews::Table, ProductReviews::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_reviews_user_id")
                            .from(ProductReviews::Table, ProductReviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One review per user per product
        manager
            .create_index(
                Index::create()
                    .name("idx_product_reviews_product_user")
                    .table(ProductReviews::Table)
                    .col(ProductReviews::ProductId)
                    .col(ProductReviews::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductReviews::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProductImages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Slug,
    Sku,
    Description,
    PriceCents,
    DiscountedPriceCents,
    CategoryId,
    BrandId,
    StockQuantity,
    IsActive,
    IsFeatured,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductImages {
    Table,
    Id,
    ProductId,
    Image,
    AltText,
    IsPrimary,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProductReviews {
    Table,
    Id,
    ProductId,
    UserId,
    Rating,
    Title,
    Comment,
    IsApproved,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Brands {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
