//! Favorite endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use voyage_common::AppResult;
use voyage_core::AddFavoriteInput;
use voyage_db::entities::{ListingKind, favorite};

use super::rfc3339;
use crate::{
    extractors::{AuthUser, Pagination},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Favorite response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub id: i32,
    pub target_type: ListingKind,
    pub target_id: i32,
    pub created_at: String,
}

impl From<favorite::Model> for FavoriteResponse {
    fn from(favorite: favorite::Model) -> Self {
        Self {
            id: favorite.id,
            target_type: favorite.target_type,
            target_id: favorite.target_id,
            created_at: rfc3339(favorite.created_at),
        }
    }
}

/// List favorites request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFavoritesQuery {
    #[serde(rename = "type")]
    pub target_type: Option<ListingKind>,
}

/// Save a listing.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddFavoriteInput>,
) -> AppResult<ApiResponse<FavoriteResponse>> {
    let favorite = state.favorite_service.add(&user, input).await?;
    Ok(ApiResponse::created(favorite.into()))
}

/// List saved listings.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListFavoritesQuery>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<FavoriteResponse>>> {
    let favorites = state
        .favorite_service
        .list(user.id, query.target_type, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(favorites.into_iter().map(Into::into).collect()))
}

/// Remove a saved listing.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.favorite_service.remove(&user, id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", delete(remove))
}
