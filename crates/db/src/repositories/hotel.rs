//! Hotel repository.

use std::sync::Arc;

use super::ListingFilter;
use crate::entities::{Hotel, ModerationStatus, hotel};
use chrono::Utc;
use voyage_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Hotel repository for database operations.
#[derive(Clone)]
pub struct HotelRepository {
    db: Arc<DatabaseConnection>,
}

impl HotelRepository {
    /// Create a new hotel repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a hotel by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<hotel::Model>> {
        Hotel::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a hotel by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<hotel::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hotel {id} not found")))
    }

    /// Approved hotels matching the filter.
    pub async fn find_public(
        &self,
        filter: &ListingFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<hotel::Model>> {
        let mut query = Hotel::find()
            .filter(hotel::Column::Status.eq(ModerationStatus::Approved))
            .order_by_desc(hotel::Column::CreatedAt);

        if let Some(city) = &filter.city {
            query = query.filter(hotel::Column::City.eq(city.as_str()));
        }
        if let Some(q) = &filter.query {
            query = query.filter(hotel::Column::Name.contains(q.as_str()));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(hotel::Column::PricePerNightCents.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(hotel::Column::PricePerNightCents.lte(max));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hotels submitted by a user, any status.
    pub async fn find_by_owner(
        &self,
        owner_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<hotel::Model>> {
        Hotel::find()
            .filter(hotel::Column::OwnerId.eq(owner_id))
            .order_by_desc(hotel::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of every hotel a user owns.
    pub async fn find_ids_by_owner(&self, owner_id: i32) -> AppResult<Vec<i32>> {
        Hotel::find()
            .select_only()
            .column(hotel::Column::Id)
            .filter(hotel::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hotels in a moderation state, oldest first.
    pub async fn find_by_status(
        &self,
        status: ModerationStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<hotel::Model>> {
        Hotel::find()
            .filter(hotel::Column::Status.eq(status))
            .order_by_asc(hotel::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count hotels in a moderation state.
    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        Hotel::find()
            .filter(hotel::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new hotel.
    pub async fn create(&self, model: hotel::ActiveModel) -> AppResult<hotel::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a hotel.
    pub async fn update(&self, model: hotel::ActiveModel) -> AppResult<hotel::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Move a hotel from `from` to `to` and record the reviewer.
    ///
    /// The update only applies while the row is still in `from`; otherwise
    /// nothing is written and a state conflict is returned.
    pub async fn transition_status(
        &self,
        id: i32,
        from: ModerationStatus,
        to: ModerationStatus,
        reviewer_id: i32,
        note: Option<String>,
    ) -> AppResult<hotel::Model> {
        let now = Utc::now();
        let result = Hotel::update_many()
            .col_expr(hotel::Column::Status, Expr::value(to))
            .col_expr(hotel::Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(hotel::Column::ReviewNote, Expr::value(note))
            .col_expr(hotel::Column::ReviewedAt, Expr::value(now))
            .col_expr(hotel::Column::UpdatedAt, Expr::value(now))
            .filter(hotel::Column::Id.eq(id))
            .filter(hotel::Column::Status.eq(from))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::StateConflict(format!(
                "Hotel {id} is no longer {from}"
            )));
        }

        self.get_by_id(id).await
    }

    /// Delete a hotel.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Hotel::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn create_test_hotel(id: i32, status: ModerationStatus) -> hotel::Model {
        hotel::Model {
            id,
            owner_id: 1,
            name: "Harbour View".to_string(),
            description: "Rooms by the sea".to_string(),
            city: "Lisbon".to_string(),
            address: "Rua do Mar 1".to_string(),
            price_per_night_cents: 12_000,
            star_rating: 4,
            amenities: json!(["wifi"]),
            images: json!([]),
            availability: json!({}),
            status,
            review_note: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_public() {
        let hotel = create_test_hotel(1, ModerationStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[hotel.clone()]])
                .into_connection(),
        );

        let repo = HotelRepository::new(db);
        let filter = ListingFilter {
            city: Some("Lisbon".to_string()),
            ..Default::default()
        };
        let result = repo.find_public(&filter, 20, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, ModerationStatus::Approved);
    }

    #[tokio::test]
    async fn test_transition_status() {
        let approved = create_test_hotel(1, ModerationStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[approved.clone()]])
                .into_connection(),
        );

        let repo = HotelRepository::new(db);
        let result = repo
            .transition_status(
                1,
                ModerationStatus::Pending,
                ModerationStatus::Approved,
                9,
                None,
            )
            .await
            .unwrap();

        assert_eq!(result.status, ModerationStatus::Approved);
    }

    #[tokio::test]
    async fn test_transition_status_lost_race() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = HotelRepository::new(db);
        let result = repo
            .transition_status(
                1,
                ModerationStatus::Pending,
                ModerationStatus::Rejected,
                9,
                Some("duplicate".to_string()),
            )
            .await;

        assert!(matches!(result, Err(AppError::StateConflict(_))));
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3)),
                }]])
                .into_connection(),
        );

        let repo = HotelRepository::new(db);
        let count = repo.count_by_status(ModerationStatus::Pending).await.unwrap();

        assert_eq!(count, 3);
    }
}
