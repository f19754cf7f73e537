//! Attraction repository.

use std::sync::Arc;

use super::ListingFilter;
use crate::entities::{Attraction, ModerationStatus, attraction};
use chrono::Utc;
use voyage_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Attraction repository for database operations.
#[derive(Clone)]
pub struct AttractionRepository {
    db: Arc<DatabaseConnection>,
}

impl AttractionRepository {
    /// Create a new attraction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a attraction by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<attraction::Model>> {
        Attraction::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a attraction by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<attraction::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attraction {id} not found")))
    }

    /// Approved attractions matching the filter.
    pub async fn find_public(
        &self,
        filter: &ListingFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<attraction::Model>> {
        let mut query = Attraction::find()
            .filter(attraction::Column::Status.eq(ModerationStatus::Approved))
            .order_by_desc(attraction::Column::CreatedAt);

        if let Some(city) = &filter.city {
            query = query.filter(attraction::Column::City.eq(city.as_str()));
        }
        if let Some(q) = &filter.query {
            query = query.filter(attraction::Column::Name.contains(q.as_str()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(attraction::Column::Category.eq(category.as_str()));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(attraction::Column::TicketPriceCents.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(attraction::Column::TicketPriceCents.lte(max));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attractions submitted by a user, any status.
    pub async fn find_by_owner(
        &self,
        owner_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<attraction::Model>> {
        Attraction::find()
            .filter(attraction::Column::OwnerId.eq(owner_id))
            .order_by_desc(attraction::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of every attraction a user owns.
    pub async fn find_ids_by_owner(&self, owner_id: i32) -> AppResult<Vec<i32>> {
        Attraction::find()
            .select_only()
            .column(attraction::Column::Id)
            .filter(attraction::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attractions in a moderation state, oldest first.
    pub async fn find_by_status(
        &self,
        status: ModerationStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<attraction::Model>> {
        Attraction::find()
            .filter(attraction::Column::Status.eq(status))
            .order_by_asc(attraction::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count attractions in a moderation state.
    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        Attraction::find()
            .filter(attraction::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new attraction.
    pub async fn create(&self, model: attraction::ActiveModel) -> AppResult<attraction::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a attraction.
    pub async fn update(&self, model: attraction::ActiveModel) -> AppResult<attraction::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Move a attraction from `from` to `to` and record the reviewer.
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
    ) -> AppResult<attraction::Model> {
        let now = Utc::now();
        let result = Attraction::update_many()
            .col_expr(attraction::Column::Status, Expr::value(to))
            .col_expr(attraction::Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(attraction::Column::ReviewNote, Expr::value(note))
            .col_expr(attraction::Column::ReviewedAt, Expr::value(now))
            .col_expr(attraction::Column::UpdatedAt, Expr::value(now))
            .filter(attraction::Column::Id.eq(id))
            .filter(attraction::Column::Status.eq(from))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::StateConflict(format!(
                "Attraction {id} is no longer {from}"
            )));
        }

        self.get_by_id(id).await
    }

    /// Delete a attraction.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Attraction::delete_by_id(id)
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

    fn create_test_attraction(id: i32, status: ModerationStatus) -> attraction::Model {
        attraction::Model {
            id,
            owner_id: 1,
            name: "Castle Walk".to_string(),
            description: "Guided tour".to_string(),
            city: "Lisbon".to_string(),
            address: "Castelo".to_string(),
            category: "tour".to_string(),
            ticket_price_cents: 3_000,
            opening_hours: None,
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
        let attraction = create_test_attraction(1, ModerationStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[attraction.clone()]])
                .into_connection(),
        );

        let repo = AttractionRepository::new(db);
        let filter = ListingFilter {
            city: Some("Lisbon".to_string()),
            ..Default::default()
        };
        let result = repo.find_public(&filter, 20, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, ModerationStatus::Approved);
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

        let repo = AttractionRepository::new(db);
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
}
