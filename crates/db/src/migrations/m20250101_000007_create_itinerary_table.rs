//! Create itinerary table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Itinerary::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Itinerary::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Itinerary::UserId).integer().not_null())
                    .col(ColumnDef::new(Itinerary::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Itinerary::Destination).string_len(256).not_null())
                    .col(ColumnDef::new(Itinerary::StartDate).date().not_null())
                    .col(ColumnDef::new(Itinerary::EndDate).date().not_null())
                    .col(ColumnDef::new(Itinerary::Notes).text())
                    .col(ColumnDef::new(Itinerary::Items).json().not_null())
                    .col(
                        ColumnDef::new(Itinerary::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Itinerary::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Itinerary::UpdatedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_itinerary_user_id")
                            .from(Itinerary::Table, Itinerary::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, start_date)
        manager
            .create_index(
                Index::create()
                    .name("idx_itinerary_user_id_start_date")
                    .table(Itinerary::Table)
                    .col(Itinerary::UserId)
                    .col(Itinerary::StartDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Itinerary::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Itinerary {
    Table,
    Id,
    UserId,
    Title,
    Destination,
    StartDate,
    EndDate,
    Notes,
    Items,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
