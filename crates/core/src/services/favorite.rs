//! Favorite service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use voyage_common::{AppError, AppResult};
use voyage_db::entities::{ListingKind, favorite, user};
use voyage_db::repositories::FavoriteRepository;

use super::listing::ListingDirectory;

/// Input for saving a listing.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteInput {
    pub target_type: ListingKind,
    pub target_id: i32,
}

/// Service for saved listings.
#[derive(Clone)]
pub struct FavoriteService {
    favorite_repo: FavoriteRepository,
    listings: ListingDirectory,
}

impl FavoriteService {
    /// Create a new favorite service.
    #[must_use]
    pub const fn new(favorite_repo: FavoriteRepository, listings: ListingDirectory) -> Self {
        Self {
            favorite_repo,
            listings,
        }
    }

    /// Save an approved listing.
    pub async fn add(
        &self,
        user: &user::Model,
        input: AddFavoriteInput,
    ) -> AppResult<favorite::Model> {
        let listing = self
            .listings
            .snapshot(input.target_type, input.target_id)
            .await?;
        listing.ensure_bookable()?;

        if self
            .favorite_repo
            .find_by_user_and_target(user.id, input.target_type, input.target_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Already in favorites".to_string()));
        }

        let model = favorite::ActiveModel {
            user_id: Set(user.id),
            target_type: Set(input.target_type),
            target_id: Set(input.target_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        self.favorite_repo.create(model).await
    }

    /// A user's favorites, optionally of one kind.
    pub async fn list(
        &self,
        user_id: i32,
        target_type: Option<ListingKind>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<favorite::Model>> {
        self.favorite_repo
            .find_by_user(user_id, target_type, limit, offset)
            .await
    }

    /// Remove one of the caller's favorites.
    pub async fn remove(&self, user: &user::Model, id: i32) -> AppResult<()> {
        let favorite = self
            .favorite_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Favorite {id} not found")))?;

        if favorite.user_id != user.id {
            return Err(AppError::Forbidden(
                "Favorite belongs to another user".to_string(),
            ));
        }

        self.favorite_repo.delete(id).await
    }
}
