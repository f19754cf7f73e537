//! Create booking table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Booking::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Booking::UserId).integer().not_null())
                    .col(ColumnDef::new(Booking::ResourceType).string_len(16).not_null())
                    .col(ColumnDef::new(Booking::ResourceId).integer().not_null())
                    .col(ColumnDef::new(Booking::Reference).string_len(16).not_null())
                    .col(ColumnDef::new(Booking::StartDate).date().not_null())
                    .col(ColumnDef::new(Booking::EndDate).date())
                    .col(ColumnDef::new(Booking::Quantity).integer().not_null())
                    .col(ColumnDef::new(Booking::Guests).integer().not_null())
                    .col(ColumnDef::new(Booking::Option).string_len(32).not_null())
                    .col(ColumnDef::new(Booking::AmountCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(Booking::Currency)
                            .string_len(3)
                            .not_null()
                            .default("EUR"),
                    )
                    .col(ColumnDef::new(Booking::SpecialRequests).text())
                    .col(ColumnDef::new(Booking::ContactEmail).string_len(320).not_null())
                    .col(
                        ColumnDef::new(Booking::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Booking::ReviewNote).text())
                    .col(ColumnDef::new(Booking::ReviewedBy).integer())
                    .col(ColumnDef::new(Booking::ReviewedAt).timestamp().null())
                    .col(
                        ColumnDef::new(Booking::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Booking::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user_id")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: reference
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_reference")
                    .table(Booking::Table)
                    .col(Booking::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (resource_type, resource_id) for owner dashboards
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_resource")
                    .table(Booking::Table)
                    .col(Booking::ResourceType)
                    .col(Booking::ResourceId)
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, created_at)
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_user_id_created_at")
                    .table(Booking::Table)
                    .col(Booking::UserId)
                    .col(Booking::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: status (moderation queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_status")
                    .table(Booking::Table)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Booking {
    Table,
    Id,
    UserId,
    ResourceType,
    ResourceId,
    Reference,
    StartDate,
    EndDate,
    Quantity,
    Guests,
    Option,
    AmountCents,
    Currency,
    SpecialRequests,
    ContactEmail,
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
