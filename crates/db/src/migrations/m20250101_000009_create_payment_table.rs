//! Create payment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payment::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payment::UserId).integer().not_null())
                    .col(ColumnDef::new(Payment::BookingType).string_len(16).not_null())
                    .col(ColumnDef::new(Payment::BookingId).integer().not_null())
                    .col(ColumnDef::new(Payment::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Payment::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(Payment::Method).string_len(16).not_null())
                    .col(ColumnDef::new(Payment::TransactionRef).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Payment::Status)
                            .string_len(16)
                            .not_null()
                            .default("completed"),
                    )
                    .col(
                        ColumnDef::new(Payment::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Payment::RefundedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_user_id")
                            .from(Payment::Table, Payment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: transaction_ref
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_transaction_ref")
                    .table(Payment::Table)
                    .col(Payment::TransactionRef)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (booking_type, booking_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_booking")
                    .table(Payment::Table)
                    .col(Payment::BookingType)
                    .col(Payment::BookingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Payment {
    Table,
    Id,
    UserId,
    BookingType,
    BookingId,
    AmountCents,
    Currency,
    Method,
    TransactionRef,
    Status,
    CreatedAt,
    RefundedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
