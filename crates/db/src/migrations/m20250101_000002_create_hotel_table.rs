//! Create hotel table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hotel::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hotel::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hotel::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Hotel::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Hotel::Description).text().not_null())
                    .col(ColumnDef::new(Hotel::City).string_len(128).not_null())
                    .col(ColumnDef::new(Hotel::Address).string_len(512).not_null())
                    .col(
                        ColumnDef::new(Hotel::PricePerNightCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Hotel::StarRating).integer().not_null())
                    .col(ColumnDef::new(Hotel::Amenities).json().not_null())
                    .col(ColumnDef::new(Hotel::Images).json().not_null())
                    .col(ColumnDef::new(Hotel::Availability).json().not_null())
                    .col(
                        ColumnDef::new(Hotel::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Hotel::ReviewNote).text())
                    .col(ColumnDef::new(Hotel::ReviewedBy).integer())
                    .col(ColumnDef::new(Hotel::ReviewedAt).timestamp().null())
                    .col(
                        ColumnDef::new(Hotel::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Hotel::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hotel_owner_id")
                            .from(Hotel::Table, Hotel::OwnerId)
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
                    .name("idx_hotel_status_city")
                    .table(Hotel::Table)
                    .col(Hotel::Status)
                    .col(Hotel::City)
                    .to_owned(),
            )
            .await?;

        // Index: owner_id
        manager
            .create_index(
                Index::create()
                    .name("idx_hotel_owner_id")
                    .table(Hotel::Table)
                    .col(Hotel::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hotel::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Hotel {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    City,
    Address,
    PricePerNightCents,
    StarRating,
    Amenities,
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
