//! Reservation of a hotel, restaurant or attraction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::status::{ListingKind, ModerationStatus};

/// Booking request. Starts pending and is confirmed or declined by an admin.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Customer who made the booking
    pub user_id: i32,

    pub resource_type: ListingKind,

    /// Id of the hotel, restaurant or attraction
    pub resource_id: i32,

    /// Confirmation code shown to the customer
    #[sea_orm(unique)]
    pub reference: String,

    /// Check-in, reservation or visit date
    pub start_date: Date,

    /// Check-out date (hotels only)
    #[sea_orm(nullable)]
    pub end_date: Option<Date>,

    /// Rooms, tables or tickets
    pub quantity: i32,

    pub guests: i32,

    /// Room type, seating or ticket type; keys the price table
    pub option: String,

    pub amount_cents: i64,

    pub currency: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub special_requests: Option<String>,

    /// Where notifications go
    pub contact_email: String,

    pub status: ModerationStatus,

    #[sea_orm(column_type = "Text", nullable)]
    pub review_note: Option<String>,

    #[sea_orm(nullable)]
    pub reviewed_by: Option<i32>,

    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
