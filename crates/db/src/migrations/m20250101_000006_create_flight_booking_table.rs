//! Create flight booking table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FlightBooking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FlightBooking::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FlightBooking::UserId).integer().not_null())
                    .col(ColumnDef::new(FlightBooking::Reference).string_len(16).not_null())
                    .col(ColumnDef::new(FlightBooking::OfferId).string_len(64))
                    .col(ColumnDef::new(FlightBooking::Airline).string_len(8).not_null())
                    .col(ColumnDef::new(FlightBooking::FlightNumber).string_len(16).not_null())
                    .col(ColumnDef::new(FlightBooking::Origin).string_len(3).not_null())
                    .col(ColumnDef::new(FlightBooking::Destination).string_len(3).not_null())
                    .col(ColumnDef::new(FlightBooking::DepartureAt).timestamp().not_null())
                    .col(ColumnDef::new(FlightBooking::ArrivalAt).timestamp().not_null())
                    .col(ColumnDef::new(FlightBooking::CabinClass).string_len(32).not_null())
                    .col(ColumnDef::new(FlightBooking::Passengers).integer().not_null())
                    .col(ColumnDef::new(FlightBooking::PassengerNames).json().not_null())
                    .col(
                        ColumnDef::new(FlightBooking::BaseFareCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FlightBooking::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FlightBooking::Currency)
                            .string_len(3)
                            .not_null()
                            .default("EUR"),
                    )
                    .col(
                        ColumnDef::new(FlightBooking::ContactEmail)
                            .string_len(320)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FlightBooking::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(FlightBooking::ReviewNote).text())
                    .col(ColumnDef::new(FlightBooking::ReviewedBy).integer())
                    .col(ColumnDef::new(FlightBooking::ReviewedAt).timestamp().null())
                    .col(
                        ColumnDef::new(FlightBooking::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(FlightBooking::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_booking_user_id")
                            .from(FlightBooking::Table, FlightBooking::UserId)
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
                    .name("idx_flight_booking_reference")
                    .table(FlightBooking::Table)
                    .col(FlightBooking::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: status
        manager
            .create_index(
                Index::create()
                    .name("idx_flight_booking_status")
                    .table(FlightBooking::Table)
                    .col(FlightBooking::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FlightBooking::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FlightBooking {
    Table,
    Id,
    UserId,
    Reference,
    OfferId,
    Airline,
    FlightNumber,
    Origin,
    Destination,
    DepartureAt,
    ArrivalAt,
    CabinClass,
    Passengers,
    PassengerNames,
    BaseFareCents,
    AmountCents,
    Currency,
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
