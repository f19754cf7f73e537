//! Attraction listing service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;
use voyage_common::{AppError, AppResult};
use voyage_db::entities::{ModerationStatus, attraction, user};
use voyage_db::repositories::{AttractionRepository, ListingFilter};

use super::listing::images_json;
use crate::availability::normalize_calendar;
use crate::moderation::{can_view, check_review, ensure_owner_or_admin, status_after_edit};

/// Input for submitting an attraction.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttractionInput {
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
    pub category: String,
    #[validate(range(min = 0))]
    pub ticket_price_cents: i64,
    #[validate(length(max = 256))]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub availability: Option<Value>,
}

/// Input for editing an attraction.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttractionInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub city: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub ticket_price_cents: Option<i64>,
    #[validate(length(max = 256))]
    pub opening_hours: Option<String>,
    pub images: Option<Vec<String>>,
    pub availability: Option<Value>,
}

/// Service for attraction listings.
#[derive(Clone)]
pub struct AttractionService {
    attraction_repo: AttractionRepository,
}

impl AttractionService {
    /// Create a new attraction service.
    #[must_use]
    pub const fn new(attraction_repo: AttractionRepository) -> Self {
        Self { attraction_repo }
    }

    /// Get an attraction if `viewer` may see it.
    pub async fn get(
        &self,
        id: i32,
        viewer: Option<&user::Model>,
    ) -> AppResult<attraction::Model> {
        let attraction = self.attraction_repo.get_by_id(id).await?;

        if !can_view(&attraction, viewer) {
            return Err(AppError::NotFound(format!("Attraction {id} not found")));
        }

        Ok(attraction)
    }

    pub async fn list_public(
        &self,
        filter: &ListingFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<attraction::Model>> {
        self.attraction_repo.find_public(filter, limit, offset).await
    }

    pub async fn list_mine(
        &self,
        owner_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<attraction::Model>> {
        self.attraction_repo
            .find_by_owner(owner_id, limit, offset)
            .await
    }

    pub async fn list_by_status(
        &self,
        status: ModerationStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<attraction::Model>> {
        self.attraction_repo
            .find_by_status(status, limit, offset)
            .await
    }

    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        self.attraction_repo.count_by_status(status).await
    }

    /// Submit an attraction for review.
    pub async fn create(
        &self,
        owner: &user::Model,
        input: CreateAttractionInput,
    ) -> AppResult<attraction::Model> {
        input.validate()?;

        let images = images_json(input.images)?;
        let availability = normalize_calendar(input.availability)?;

        let model = attraction::ActiveModel {
            owner_id: Set(owner.id),
            name: Set(input.name),
            description: Set(input.description),
            city: Set(input.city),
            address: Set(input.address),
            category: Set(input.category.to_lowercase()),
            ticket_price_cents: Set(input.ticket_price_cents),
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

        let attraction = self.attraction_repo.create(model).await?;
        tracing::info!(
            attraction_id = attraction.id,
            owner_id = owner.id,
            "Attraction submitted"
        );
        Ok(attraction)
    }

    /// Edit an attraction. An owner edit sends it back for review.
    pub async fn update(
        &self,
        actor: &user::Model,
        id: i32,
        input: UpdateAttractionInput,
    ) -> AppResult<attraction::Model> {
        input.validate()?;

        let attraction = self.attraction_repo.get_by_id(id).await?;
        ensure_owner_or_admin(&attraction, actor)?;

        let next = status_after_edit(attraction.status, actor.role);
        let mut active: attraction::ActiveModel = attraction.into();

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
        if let Some(category) = input.category {
            active.category = Set(category.to_lowercase());
        }
        if let Some(price) = input.ticket_price_cents {
            active.ticket_price_cents = Set(price);
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

        self.attraction_repo.update(active).await
    }

    /// Delete an attraction.
    pub async fn delete(&self, actor: &user::Model, id: i32) -> AppResult<()> {
        let attraction = self.attraction_repo.get_by_id(id).await?;
        ensure_owner_or_admin(&attraction, actor)?;

        self.attraction_repo.delete(id).await?;
        tracing::info!(attraction_id = id, actor_id = actor.id, "Attraction deleted");
        Ok(())
    }

    /// Approve or reject a pending attraction.
    pub async fn review(
        &self,
        actor: &user::Model,
        id: i32,
        target: ModerationStatus,
        note: Option<String>,
    ) -> AppResult<attraction::Model> {
        let attraction = self.attraction_repo.get_by_id(id).await?;
        check_review(&attraction, target, actor)?;

        let updated = self
            .attraction_repo
            .transition_status(id, attraction.status, target, actor.id, note)
            .await?;

        tracing::info!(
            attraction_id = id,
            status = %target,
            reviewer_id = actor.id,
            "Attraction reviewed"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use voyage_db::entities::user::Role;

    #[tokio::test]
    async fn test_create_rejects_bad_calendar() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::MySql).into_connection());
        let service = AttractionService::new(AttractionRepository::new(db));

        let input = CreateAttractionInput {
            name: "Castle Tour".to_string(),
            description: String::new(),
            city: "Lisbon".to_string(),
            address: String::new(),
            category: "History".to_string(),
            ticket_price_cents: 3_000,
            opening_hours: None,
            images: vec![],
            availability: Some(serde_json::json!({ "tomorrow": false })),
        };
        let result = service.create(&fixtures::user(1, Role::User), input).await;

        match result {
            Err(AppError::Validation { fields, .. }) => {
                assert!(fields.contains_key("availability"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejected_attraction_cannot_be_approved() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[fixtures::attraction(4, 1, ModerationStatus::Rejected)]])
                .into_connection(),
        );
        let service = AttractionService::new(AttractionRepository::new(db));

        let admin = fixtures::user(9, Role::Admin);
        let result = service
            .review(&admin, 4, ModerationStatus::Approved, None)
            .await;

        assert!(matches!(result, Err(AppError::StateConflict(_))));
    }

    #[tokio::test]
    async fn test_approved_attraction_visible_anonymously() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[fixtures::attraction(4, 1, ModerationStatus::Approved)]])
                .into_connection(),
        );
        let service = AttractionService::new(AttractionRepository::new(db));

        let attraction = service.get(4, None).await.unwrap();
        assert_eq!(attraction.id, 4);
    }
}
