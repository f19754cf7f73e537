//! Hotel listing entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::status::ModerationStatus;

/// Hotel submitted by a business owner, published after review.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hotel")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Submitting user
    pub owner_id: i32,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub city: String,

    pub address: String,

    /// Base nightly rate in cents
    pub price_per_night_cents: i64,

    /// 1 to 5
    pub star_rating: i32,

    /// JSON array of strings
    #[sea_orm(column_type = "Json")]
    pub amenities: Json,

    /// JSON array of image URLs
    #[sea_orm(column_type = "Json")]
    pub images: Json,

    /// JSON object mapping `YYYY-MM-DD` to availability
    #[sea_orm(column_type = "Json")]
    pub availability: Json,

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
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
