//! Restaurant listing entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::status::ModerationStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurant")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub owner_id: i32,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub city: String,

    pub address: String,

    pub cuisine: String,

    /// 1 (cheap) to 4 (fine dining)
    pub price_level: i32,

    #[sea_orm(nullable)]
    pub opening_hours: Option<String>,

    #[sea_orm(column_type = "Json")]
    pub images: Json,

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
