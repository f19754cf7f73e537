//! Restaurant endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use voyage_common::AppResult;
use voyage_core::{CreateRestaurantInput, UpdateRestaurantInput};
use voyage_db::entities::{ModerationStatus, restaurant};

use super::{ListingQuery, maybe_rfc3339, rfc3339};
use crate::{
    extractors::{AuthUser, MaybeAuthUser, Pagination},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Restaurant response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResponse {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub cuisine: String,
    pub price_level: i32,
    pub opening_hours: Option<String>,
    pub images: Value,
    pub availability: Value,
    pub status: ModerationStatus,
    pub review_note: Option<String>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<restaurant::Model> for RestaurantResponse {
    fn from(restaurant: restaurant::Model) -> Self {
        Self {
            id: restaurant.id,
            owner_id: restaurant.owner_id,
            name: restaurant.name,
            description: restaurant.description,
            city: restaurant.city,
            address: restaurant.address,
            cuisine: restaurant.cuisine,
            price_level: restaurant.price_level,
            opening_hours: restaurant.opening_hours,
            images: restaurant.images,
            availability: restaurant.availability,
            status: restaurant.status,
            review_note: restaurant.review_note,
            reviewed_at: maybe_rfc3339(restaurant.reviewed_at),
            created_at: rfc3339(restaurant.created_at),
            updated_at: maybe_rfc3339(restaurant.updated_at),
        }
    }
}

/// List approved restaurants. `category` filters by cuisine.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<RestaurantResponse>>> {
    let restaurants = state
        .restaurant_service
        .list_public(&query.into(), page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(restaurants.into_iter().map(Into::into).collect()))
}

async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<RestaurantResponse>>> {
    let restaurants = state
        .restaurant_service
        .list_mine(user.id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(restaurants.into_iter().map(Into::into).collect()))
}

async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<RestaurantResponse>> {
    let restaurant = state.restaurant_service.get(id, viewer.as_ref()).await?;
    Ok(ApiResponse::ok(restaurant.into()))
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRestaurantInput>,
) -> AppResult<ApiResponse<RestaurantResponse>> {
    let restaurant = state.restaurant_service.create(&user, input).await?;
    Ok(ApiResponse::created(restaurant.into()))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateRestaurantInput>,
) -> AppResult<ApiResponse<RestaurantResponse>> {
    let restaurant = state.restaurant_service.update(&user, id, input).await?;
    Ok(ApiResponse::ok(restaurant.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.restaurant_service.delete(&user, id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/mine", get(mine))
        .route("/{id}", get(show).put(update).delete(delete))
}
