//! Hotel listing service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;
use voyage_common::{AppError, AppResult};
use voyage_db::entities::{ModerationStatus, hotel, user};
use voyage_db::repositories::{HotelRepository, ListingFilter};

use super::listing::{images_json, tags_json};
use crate::availability::normalize_calendar;
use crate::moderation::{can_view, check_review, ensure_owner_or_admin, status_after_edit};

/// Input for submitting a hotel.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHotelInput {
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
    #[validate(range(min = 0))]
    pub price_per_night_cents: i64,
    #[validate(range(min = 1, max = 5))]
    pub star_rating: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub availability: Option<Value>,
}

/// Input for editing a hotel. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHotelInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(length(max = 8192))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub city: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(range(min = 0))]
    pub price_per_night_cents: Option<i64>,
    #[validate(range(min = 1, max = 5))]
    pub star_rating: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub availability: Option<Value>,
}

/// Service for hotel listings.
#[derive(Clone)]
pub struct HotelService {
    hotel_repo: HotelRepository,
}

impl HotelService {
    /// Create a new hotel service.
    #[must_use]
    pub const fn new(hotel_repo: HotelRepository) -> Self {
        Self { hotel_repo }
    }

    /// Get a hotel if `viewer` may see it. Hidden hotels read as missing.
    pub async fn get(&self, id: i32, viewer: Option<&user::Model>) -> AppResult<hotel::Model> {
        let hotel = self.hotel_repo.get_by_id(id).await?;

        if !can_view(&hotel, viewer) {
            return Err(AppError::NotFound(format!("Hotel {id} not found")));
        }

        Ok(hotel)
    }

    /// Approved hotels.
    pub async fn list_public(
        &self,
        filter: &ListingFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<hotel::Model>> {
        self.hotel_repo.find_public(filter, limit, offset).await
    }

    /// Hotels submitted by `owner_id`, any status.
    pub async fn list_mine(
        &self,
        owner_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<hotel::Model>> {
        self.hotel_repo.find_by_owner(owner_id, limit, offset).await
    }

    /// Moderation queue.
    pub async fn list_by_status(
        &self,
        status: ModerationStatus,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<hotel::Model>> {
        self.hotel_repo.find_by_status(status, limit, offset).await
    }

    /// Count hotels in a moderation state.
    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        self.hotel_repo.count_by_status(status).await
    }

    /// Submit a hotel for review.
    pub async fn create(
        &self,
        owner: &user::Model,
        input: CreateHotelInput,
    ) -> AppResult<hotel::Model> {
        input.validate()?;

        let images = images_json(input.images)?;
        let availability = normalize_calendar(input.availability)?;

        let model = hotel::ActiveModel {
            owner_id: Set(owner.id),
            name: Set(input.name),
            description: Set(input.description),
            city: Set(input.city),
            address: Set(input.address),
            price_per_night_cents: Set(input.price_per_night_cents),
            star_rating: Set(input.star_rating),
            amenities: Set(tags_json(input.amenities)),
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

        let hotel = self.hotel_repo.create(model).await?;
        tracing::info!(hotel_id = hotel.id, owner_id = owner.id, "Hotel submitted");
        Ok(hotel)
    }

    /// Edit a hotel. An owner edit sends it back for review.
    pub async fn update(
        &self,
        actor: &user::Model,
        id: i32,
        input: UpdateHotelInput,
    ) -> AppResult<hotel::Model> {
        input.validate()?;

        let hotel = self.hotel_repo.get_by_id(id).await?;
        ensure_owner_or_admin(&hotel, actor)?;

        let previous = hotel.status;
        let next = status_after_edit(previous, actor.role);
        let mut active: hotel::ActiveModel = hotel.into();

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
        if let Some(price) = input.price_per_night_cents {
            active.price_per_night_cents = Set(price);
        }
        if let Some(rating) = input.star_rating {
            active.star_rating = Set(rating);
        }
        if let Some(amenities) = input.amenities {
            active.amenities = Set(tags_json(amenities));
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

        let updated = self.hotel_repo.update(active).await?;
        if next != previous {
            tracing::info!(hotel_id = id, from = %previous, "Hotel resubmitted for review");
        }
        Ok(updated)
    }

    /// Delete a hotel.
    pub async fn delete(&self, actor: &user::Model, id: i32) -> AppResult<()> {
        let hotel = self.hotel_repo.get_by_id(id).await?;
        ensure_owner_or_admin(&hotel, actor)?;

        self.hotel_repo.delete(id).await?;
        tracing::info!(hotel_id = id, actor_id = actor.id, "Hotel deleted");
        Ok(())
    }

    /// Approve or reject a pending hotel.
    pub async fn review(
        &self,
        actor: &user::Model,
        id: i32,
        target: ModerationStatus,
        note: Option<String>,
    ) -> AppResult<hotel::Model> {
        let hotel = self.hotel_repo.get_by_id(id).await?;
        check_review(&hotel, target, actor)?;

        let updated = self
            .hotel_repo
            .transition_status(id, hotel.status, target, actor.id, note)
            .await?;

        tracing::info!(hotel_id = id, status = %target, reviewer_id = actor.id, "Hotel reviewed");
        Ok(updated)
    }
}
