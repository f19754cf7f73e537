//! Flight booking entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::status::ModerationStatus;

/// Flight booking built from a search offer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flight_booking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(unique)]
    pub reference: String,

    /// Offer id returned by flight search, if booked from one
    #[sea_orm(nullable)]
    pub offer_id: Option<String>,

    /// IATA airline code
    pub airline: String,

    pub flight_number: String,

    /// IATA airport code
    pub origin: String,

    /// IATA airport code
    pub destination: String,

    pub departure_at: DateTimeUtc,

    pub arrival_at: DateTimeUtc,

    pub cabin_class: String,

    pub passengers: i32,

    /// JSON array of passenger names
    #[sea_orm(column_type = "Json")]
    pub passenger_names: Json,

    /// Fare per passenger in economy, in cents
    pub base_fare_cents: i64,

    pub amount_cents: i64,

    pub currency: String,

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
