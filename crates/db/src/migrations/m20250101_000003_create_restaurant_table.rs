//! Create restaurant table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurant::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurant::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Restaurant::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Restaurant::Description).text().not_null())
                    .col(ColumnDef::new(Restaurant::City).string_len(128).not_null())
                    .col(ColumnDef::new(Restaurant::Address).string_len(512).not_null())
                    .col(ColumnDef::new(Restaurant::Cuisine).string_len(64).not_null())
                    .col(ColumnDef::new(Restaurant::PriceLevel).integer().not_null())
                    .col(ColumnDef::new(Restaurant::OpeningHours).string_len(256))
                    .col(ColumnDef::new(Restaurant::Images).json().not_null())
                    .col(ColumnDef::new(Restaurant::Availability).json().not_null())
                    .col(
                        ColumnDef::new(Restaurant::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Restaurant::ReviewNote).text())
                    .col(ColumnDef::new(Restaurant::ReviewedBy).integer())
                    .col(ColumnDef::new(Restaurant::ReviewedAt).timestamp().null())
                    .col(
                        ColumnDef::new(Restaurant::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Restaurant::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurant_owner_id")
                            .from(Restaurant::Table, Restaurant::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (status, city) for the public listing
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_status_city")
                    .table(Restaurant::Table)
                    .col(Restaurant::Status)
                    .col(Restaurant::City)
                    .to_owned(),
            )
            .await?;

        // Index: owner_id
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_owner_id")
                    .table(Restaurant::Table)
                    .col(Restaurant::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurant::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Restaurant {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    City,
    Address,
    Cuisine,
    PriceLevel,
    OpeningHours,
    Images,
    Availability,
    Status,
    ReviewNote,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
