//! Restaurant listing service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;
use voyage_common::{AppError, AppResult};
use voyage_db::entities::{ModerationStatus, restaurant, user};
use voyage_db::repositories::{ListingFilter, RestaurantRepository};

use super::listing::images_json;
use crate::availability::normalize_calendar;
use crate::moderation::{can_view, check_review, ensure_owner_or_admin, status_after_edit};

/// Input for submitting a restaurant.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 8192))]
    pub description: String,
    #[validate(length(min = 1, max = 128))]
    pub city: String,
    #[serde(default)]
    #[validate(length(max = 512))]
    pub address: String,
    #[validate(length(min = 1, max = 64))]
    pub cuisine: String,
    /// 1 (budget) to 4 (fine dining)
    #[validate(range(min = 1, max = 4))]
    pub price_level: i32,
    #[validate(length(max = 256))]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub availability: Option<Value>,
}

/// Input for editing a restaurant.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub city: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub cuisine: Option<String>,
    #[validate(range(min = 1, max = 4))]
    pub price_level: Option<i32>,
    #[validate(length(max = 256))]
    pub opening_hours: Option<String>,
    pub images: Option<Vec<String>>,
    pub availability: Option<Value>,
}

/// Service for restaurant listings.
#[derive(Clone)]
pub struct RestaurantService {
    restaurant_repo: RestaurantRepository,
}

impl RestaurantService {
    /// Create a new restaurant service.
    #[must_use]
    pub const fn new(restaurant_repo: RestaurantRepository) -> Self {
        Self { restaurant_repo }
    }

    /// Get a restaurant if `viewer` may see it.
    pub async fn get(
        &self,
        id: i32,
        viewer: Option<&user::Model>,
    ) -> AppResult<restaurant::Model> {
        let restaurant = self.restaurant_repo.get_by_id(id).await?;

        if !can_view(&restaurant, viewer) {
            return Err(AppError::NotFound(format!("Restaurant {id} not found")));
        }

        Ok(restaurant)
    }

    /// Approved restaurants. Price bounds are price levels.
    pub async fn list_public(
        &self,
        filter: &ListingFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<restaurant::Model>> {
        self.restaurant_repo.find_public(filter, limit, offset).await
    }

    /// Restaurants submitted by `owner_id`.
    pub async fn list_mine(
        &self,
        owner_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<restaurant::Model>> {
        self.restaurant_repo
            .find_by_owner(owner_id, limit, offset)
            .await
    }

    /// Moderation queue.
    pub async fn list_by_status(
        &self,
        status: ModerationStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<restaurant::Model>> {
        self.restaurant_repo
            .find_by_status(status, limit, offset)
            .await
    }

    /// Count restaurants in a moderation state.
    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        self.restaurant_repo.count_by_status(status).await
    }

    /// Submit a restaurant for review.
    pub async fn create(
        &self,
        owner: &user::Model,
        input: CreateRestaurantInput,
    ) -> AppResult<restaurant::Model> {
        input.validate()?;

        let images = images_json(input.images)?;
        let availability = normalize_calendar(input.availability)?;

        let model = restaurant::ActiveModel {
            owner_id: Set(owner.id),
            name: Set(input.name),
            description: Set(input.description),
            city: Set(input.city),
            address: Set(input.address),
            cuisine: Set(input.cuisine.to_lowercase()),
            price_level: Set(input.price_level),
            opening_hours: Set(input.opening_hours),
            images: Set(images),
            availability: Set(availability),
            status: Set(ModerationStatus::Pending),
            review_note: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let restaurant = self.restaurant_repo.create(model).await?;
        tracing::info!(
            restaurant_id = restaurant.id,
            owner_id = owner.id,
            "Restaurant submitted"
        );
        Ok(restaurant)
    }

    /// Edit a restaurant. An owner edit sends it back for review.
    pub async fn update(
        &self,
        actor: &user::Model,
        id: i32,
        input: UpdateRestaurantInput,
    ) -> AppResult<restaurant::Model> {
        input.validate()?;

        let restaurant = self.restaurant_repo.get_by_id(id).await?;
        ensure_owner_or_admin(&restaurant, actor)?;

        let next = status_after_edit(restaurant.status, actor.role);
        let mut active: restaurant::ActiveModel = restaurant.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(city) = input.city {
            active.city = Set(city);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(cuisine) = input.cuisine {
            active.cuisine = Set(cuisine.to_lowercase());
        }
        if let Some(level) = input.price_level {
            active.price_level = Set(level);
        }
        if let Some(hours) = input.opening_hours {
            active.opening_hours = Set(Some(hours));
        }
        if let Some(images) = input.images {
            active.images = Set(images_json(images)?);
        }
        if input.availability.is_some() {
            active.availability = Set(normalize_calendar(input.availability)?);
        }

        if !actor.is_admin() {
            active.status = Set(next);
            active.review_note = Set(None);
            active.reviewed_by = Set(None);
            active.reviewed_at = Set(None);
        }
        active.updated_at = Set(Some(Utc::now()));

        self.restaurant_repo.update(active).await
    }

    /// Delete a restaurant.
    pub async fn delete(&self, actor: &user::Model, id: i32) -> AppResult<()> {
        let restaurant = self.restaurant_repo.get_by_id(id).await?;
        ensure_owner_or_admin(&restaurant, actor)?;

        self.restaurant_repo.delete(id).await?;
        tracing::info!(restaurant_id = id, actor_id = actor.id, "Restaurant deleted");
        Ok(())
    }

    /// Approve or reject a pending restaurant.
    pub async fn review(
        &self,
        actor: &user::Model,
        id: i32,
        target: ModerationStatus,
        note: Option<String>,
    ) -> AppResult<restaurant::Model> {
        let restaurant = self.restaurant_repo.get_by_id(id).await?;
        check_review(&restaurant, target, actor)?;

        let updated = self
            .restaurant_repo
            .transition_status(id, restaurant.status, target, actor.id, note)
            .await?;

        tracing::info!(
            restaurant_id = id,
            status = %target,
            reviewer_id = actor.id,
            "Restaurant reviewed"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use voyage_db::entities::user::Role;

    #[tokio::test]
    async fn test_reject_pending_restaurant() {
        let mut rejected = fixtures::restaurant(3, 1, ModerationStatus::Rejected);
        rejected.review_note = Some("Missing address".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[fixtures::restaurant(3, 1, ModerationStatus::Pending)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[rejected]])
                .into_connection(),
        );
        let service = RestaurantService::new(RestaurantRepository::new(db));

        let admin = fixtures::user(9, Role::Admin);
        let result = service
            .review(
                &admin,
                3,
                ModerationStatus::Rejected,
                Some("Missing address".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(result.status, ModerationStatus::Rejected);
        assert_eq!(result.review_note.as_deref(), Some("Missing address"));
    }

    #[tokio::test]
    async fn test_review_to_pending_is_invalid() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[fixtures::restaurant(3, 1, ModerationStatus::Pending)]])
                .into_connection(),
        );
        let service = RestaurantService::new(RestaurantRepository::new(db));

        let admin = fixtures::user(9, Role::Admin);
        let result = service
            .review(&admin, 3, ModerationStatus::Pending, None)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_admin_edit_keeps_status() {
        let mut edited = fixtures::restaurant(3, 1, ModerationStatus::Approved);
        edited.price_level = 3;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[fixtures::restaurant(3, 1, ModerationStatus::Approved)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[edited]])
                .into_connection(),
        );
        let service = RestaurantService::new(RestaurantRepository::new(db));

        let admin = fixtures::user(9, Role::Admin);
        let input = UpdateRestaurantInput {
            price_level: Some(3),
            ..Default::default()
        };
        let result = service.update(&admin, 3, input).await.unwrap();

        assert_eq!(result.status, ModerationStatus::Approved);
    }
}
