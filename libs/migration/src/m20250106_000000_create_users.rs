use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create gender enum
        manager
            .create_type(
                Type::create()
                    .as_enum(Gender::Enum)
                    .values([Gender::Male, Gender::Female, Gender::Other])
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_uuid(Users::Id))
                    .col(string_uniq(Users::Email))
                    .col(string(Users::Username))
                    .col(string(Users::PasswordHash))
                    .col(string_null(Users::PhoneNumber))
                    .col(string_null(Users::Address))
                    .col(boolean(Users::IsEmailVerified).default(false))
                    .col(boolean(Users::IsActive).default(true))
                    .col(boolean(Users::IsStaff).default(false))
                    .col(
                        timestamp_with_time_zone(Users::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Users::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .to_owned(),
            )
            .await?;

        // Create user_profiles table (one row per user, created lazily)
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(pk_uuid(UserProfiles::UserId))
                    .col(string_null(UserProfiles::Avatar))
                    .col(date_null(UserProfiles::DateOfBirth))
                    .col(
                        ColumnDef::new(UserProfiles::Gender)
                            .enumeration(
                                Gender::Enum,
                                [Gender::Male, Gender::Female, Gender::Other],
                            )
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_user_id")
                            .from(UserProfiles::Table, UserProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(Gender::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    PasswordHash,
    PhoneNumber,
    Address,
    IsEmailVerified,
    IsActive,
    IsStaff,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    UserId,
    Avatar,
    DateOfBirth,
    Gender,
}

#[derive(DeriveIden)]
enum Gender {
    #[sea_orm(iden = "gender")]
    Enum,
    #[sea_orm(iden = "male")]
    Male,
    #[sea_orm(iden = "female")]
    Female,
    #[sea_orm(iden = "other")]
    Other,
}
