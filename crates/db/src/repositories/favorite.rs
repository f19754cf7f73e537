//! Favorite repository.

use std::sync::Arc;

use crate::entities::{Favorite, ListingKind, favorite};
use voyage_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Favorite repository for database operations.
#[derive(Clone)]
pub struct FavoriteRepository {
    db: Arc<DatabaseConnection>,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a favorite by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<favorite::Model>> {
        Favorite::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a favorite by user and listing.
    pub async fn find_by_user_and_target(
        &self,
        user_id: i32,
        target_type: ListingKind,
        target_id: i32,
    ) -> AppResult<Option<favorite::Model>> {
        Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::TargetType.eq(target_type))
            .filter(favorite::Column::TargetId.eq(target_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Favorites of a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: i32,
        target_type: Option<ListingKind>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<favorite::Model>> {
        let mut query = Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::CreatedAt);

        if let Some(t) = target_type {
            query = query.filter(favorite::Column::TargetType.eq(t));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new favorite.
    pub async fn create(&self, model: favorite::ActiveModel) -> AppResult<favorite::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a favorite.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Favorite::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_favorite(id: i32, user_id: i32, target_id: i32) -> favorite::Model {
        favorite::Model {
            id,
            user_id,
            target_type: ListingKind::Restaurant,
            target_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user_and_target() {
        let fav = create_test_favorite(1, 2, 3);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[fav.clone()]])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo
            .find_by_user_and_target(2, ListingKind::Restaurant, 3)
            .await
            .unwrap();

        assert_eq!(result, Some(fav));
    }

    #[tokio::test]
    async fn test_find_by_user_none() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<favorite::Model>::new()])
                .into_connection(),
        );

        let repo = FavoriteRepository::new(db);
        let result = repo.find_by_user(2, None, 20, 0).await.unwrap();

        assert!(result.is_empty());
    }
}
