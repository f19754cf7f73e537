//! Create attraction table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attraction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attraction::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attraction::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Attraction::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Attraction::Description).text().not_null())
                    .col(ColumnDef::new(Attraction::City).string_len(128).not_null())
                    .col(ColumnDef::new(Attraction::Address).string_len(512).not_null())
                    .col(ColumnDef::new(Attraction::Category).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Attraction::TicketPriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attraction::OpeningHours).string_len(256))
                    .col(ColumnDef::new(Attraction::Images).json().not_null())
                    .col(ColumnDef::new(Attraction::Availability).json().not_null())
                    .col(
                        ColumnDef::new(Attraction::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Attraction::ReviewNote).text())
                    .col(ColumnDef::new(Attraction::ReviewedBy).integer())
                    .col(ColumnDef::new(Attraction::ReviewedAt).timestamp().null())
                    .col(
                        ColumnDef::new(Attraction::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Attraction::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attraction_owner_id")
                            .from(Attraction::Table, Attraction::OwnerId)
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
                    .name("idx_attraction_status_city")
                    .table(Attraction::Table)
                    .col(Attraction::Status)
                    .col(Attraction::City)
                    .to_owned(),
            )
            .await?;

        // Index: owner_id
        manager
            .create_index(
                Index::create()
                    .name("idx_attraction_owner_id")
                    .table(Attraction::Table)
                    .col(Attraction::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attraction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attraction {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    City,
    Address,
    Category,
    TicketPriceCents,
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
