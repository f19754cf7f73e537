//! Hotel endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use voyage_common::AppResult;
use voyage_core::{CreateHotelInput, UpdateHotelInput};
use voyage_db::entities::{ModerationStatus, hotel};

use super::{ListingQuery, maybe_rfc3339, rfc3339};
use crate::{
    extractors::{AuthUser, MaybeAuthUser, Pagination},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Hotel response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelResponse {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub price_per_night_cents: i64,
    pub star_rating: i32,
    pub amenities: Value,
    pub images: Value,
    pub availability: Value,
    pub status: ModerationStatus,
    pub review_note: Option<String>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<hotel::Model> for HotelResponse {
    fn from(hotel: hotel::Model) -> Self {
        Self {
            id: hotel.id,
            owner_id: hotel.owner_id,
            name: hotel.name,
            description: hotel.description,
            city: hotel.city,
            address: hotel.address,
            price_per_night_cents: hotel.price_per_night_cents,
            star_rating: hotel.star_rating,
            amenities: hotel.amenities,
            images: hotel.images,
            availability: hotel.availability,
            status: hotel.status,
            review_note: hotel.review_note,
            reviewed_at: maybe_rfc3339(hotel.reviewed_at),
            created_at: rfc3339(hotel.created_at),
            updated_at: maybe_rfc3339(hotel.updated_at),
        }
    }
}

/// List approved hotels.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<HotelResponse>>> {
    let hotels = state
        .hotel_service
        .list_public(&query.into(), page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(hotels.into_iter().map(Into::into).collect()))
}

/// List own submissions.
async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<HotelResponse>>> {
    let hotels = state
        .hotel_service
        .list_mine(user.id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(hotels.into_iter().map(Into::into).collect()))
}

/// Get a hotel.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<HotelResponse>> {
    let hotel = state.hotel_service.get(id, viewer.as_ref()).await?;
    Ok(ApiResponse::ok(hotel.into()))
}

/// Submit a hotel.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateHotelInput>,
) -> AppResult<ApiResponse<HotelResponse>> {
    let hotel = state.hotel_service.create(&user, input).await?;
    Ok(ApiResponse::created(hotel.into()))
}

/// Edit a hotel.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateHotelInput>,
) -> AppResult<ApiResponse<HotelResponse>> {
    let hotel = state.hotel_service.update(&user, id, input).await?;
    Ok(ApiResponse::ok(hotel.into()))
}

/// Delete a hotel.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.hotel_service.delete(&user, id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/mine", get(mine))
        .route("/{id}", get(show).put(update).delete(delete))
}
