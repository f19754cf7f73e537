//! Payment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which booking table a payment refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum PaymentTarget {
    #[sea_orm(string_value = "booking")]
    Booking,
    #[sea_orm(string_value = "flight_booking")]
    FlightBooking,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "paypal")]
    PayPal,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum PaymentStatus {
    #[sea_orm(string_value = "completed")]
    #[default]
    Completed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Payer
    pub user_id: i32,

    pub booking_type: PaymentTarget,

    pub booking_id: i32,

    pub amount_cents: i64,

    pub currency: String,

    pub method: PaymentMethod,

    #[sea_orm(unique)]
    pub transaction_ref: String,

    pub status: PaymentStatus,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub refunded_at: Option<DateTimeUtc>,
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
