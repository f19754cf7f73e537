//! Restaurant repository.

use std::sync::Arc;

use super::ListingFilter;
use crate::entities::{Restaurant, ModerationStatus, restaurant};
use chrono::Utc;
use voyage_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Restaurant repository for database operations.
#[derive(Clone)]
pub struct RestaurantRepository {
    db: Arc<DatabaseConnection>,
}

impl RestaurantRepository {
    /// Create a new restaurant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a restaurant by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<restaurant::Model>> {
        Restaurant::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a restaurant by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<restaurant::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Restaurant {id} not found")))
    }

    /// Approved restaurants matching the filter.
    pub async fn find_public(
        &self,
        filter: &ListingFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<restaurant::Model>> {
        let mut query = Restaurant::find()
            .filter(restaurant::Column::Status.eq(ModerationStatus::Approved))
            .order_by_desc(restaurant::Column::CreatedAt);

        if let Some(city) = &filter.city {
            query = query.filter(restaurant::Column::City.eq(city.as_str()));
        }
        if let Some(q) = &filter.query {
            query = query.filter(restaurant::Column::Name.contains(q.as_str()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(restaurant::Column::Cuisine.eq(category.as_str()));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(restaurant::Column::PriceLevel.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(restaurant::Column::PriceLevel.lte(max));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Restaurants submitted by a user, any status.
    pub async fn find_by_owner(
        &self,
        owner_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<restaurant::Model>> {
        Restaurant::find()
            .filter(restaurant::Column::OwnerId.eq(owner_id))
            .order_by_desc(restaurant::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of every restaurant a user owns.
    pub async fn find_ids_by_owner(&self, owner_id: i32) -> AppResult<Vec<i32>> {
        Restaurant::find()
            .select_only()
            .column(restaurant::Column::Id)
            .filter(restaurant::Column::OwnerId.eq(owner_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Restaurants in a moderation state, oldest first.
    pub async fn find_by_status(
        &self,
        status: ModerationStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<restaurant::Model>> {
        Restaurant::find()
            .filter(restaurant::Column::Status.eq(status))
            .order_by_asc(restaurant::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count restaurants in a moderation state.
    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        Restaurant::find()
            .filter(restaurant::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new restaurant.
    pub async fn create(&self, model: restaurant::ActiveModel) -> AppResult<restaurant::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a restaurant.
    pub async fn update(&self, model: restaurant::ActiveModel) -> AppResult<restaurant::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Move a restaurant from `from` to `to` and record the reviewer.
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
    ) -> AppResult<restaurant::Model> {
        let now = Utc::now();
        let result = Restaurant::update_many()
            .col_expr(restaurant::Column::Status, Expr::value(to))
            .col_expr(restaurant::Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(restaurant::Column::ReviewNote, Expr::value(note))
            .col_expr(restaurant::Column::ReviewedAt, Expr::value(now))
            .col_expr(restaurant::Column::UpdatedAt, Expr::value(now))
            .filter(restaurant::Column::Id.eq(id))
            .filter(restaurant::Column::Status.eq(from))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::StateConflict(format!(
                "Restaurant {id} is no longer {from}"
            )));
        }

        self.get_by_id(id).await
    }

    /// Delete a restaurant.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Restaurant::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
