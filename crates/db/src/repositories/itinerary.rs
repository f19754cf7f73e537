//! Itinerary repository.

use std::sync::Arc;

use crate::entities::{Itinerary, itinerary};
use voyage_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Itinerary repository for database operations.
#[derive(Clone)]
pub struct ItineraryRepository {
    db: Arc<DatabaseConnection>,
}

impl ItineraryRepository {
    /// Create a new itinerary repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an itinerary by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<itinerary::Model> {
        Itinerary::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Itinerary {id} not found")))
    }

    /// A user's itineraries ordered by trip start.
    pub async fn find_by_user(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<itinerary::Model>> {
        Itinerary::find()
            .filter(itinerary::Column::UserId.eq(user_id))
            .order_by_asc(itinerary::Column::StartDate)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Shared itineraries, optionally for one destination.
    pub async fn find_public(
        &self,
        destination: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<itinerary::Model>> {
        let mut query = Itinerary::find()
            .filter(itinerary::Column::IsPublic.eq(true))
            .order_by_desc(itinerary::Column::CreatedAt);

        if let Some(d) = destination {
            query = query.filter(itinerary::Column::Destination.contains(d));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new itinerary.
    pub async fn create(&self, model: itinerary::ActiveModel) -> AppResult<itinerary::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an itinerary.
    pub async fn update(&self, model: itinerary::ActiveModel) -> AppResult<itinerary::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an itinerary.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Itinerary::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    #[tokio::test]
    async fn test_find_public() {
        let trip = itinerary::Model {
            id: 1,
            user_id: 2,
            title: "Porto weekend".to_string(),
            destination: "Porto".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 3).unwrap(),
            notes: None,
            items: json!([]),
            is_public: true,
            created_at: Utc::now(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[trip]])
                .into_connection(),
        );

        let repo = ItineraryRepository::new(db);
        let result = repo.find_public(Some("Porto"), 10, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].is_public);
    }
}
