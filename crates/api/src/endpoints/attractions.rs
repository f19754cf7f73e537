//! Attraction endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use voyage_common::AppResult;
use voyage_core::{CreateAttractionInput, UpdateAttractionInput};
use voyage_db::entities::{ModerationStatus, attraction};

use super::{ListingQuery, maybe_rfc3339, rfc3339};
use crate::{
    extractors::{AuthUser, MaybeAuthUser, Pagination},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Attraction response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractionResponse {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub category: String,
    pub ticket_price_cents: i64,
    pub opening_hours: Option<String>,
    pub images: Value,
    pub availability: Value,
    pub status: ModerationStatus,
    pub review_note: Option<String>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<attraction::Model> for AttractionResponse {
    fn from(attraction: attraction::Model) -> Self {
        Self {
            id: attraction.id,
            owner_id: attraction.owner_id,
            name: attraction.name,
            description: attraction.description,
            city: attraction.city,
            address: attraction.address,
            category: attraction.category,
            ticket_price_cents: attraction.ticket_price_cents,
            opening_hours: attraction.opening_hours,
            images: attraction.images,
            availability: attraction.availability,
            status: attraction.status,
            review_note: attraction.review_note,
            reviewed_at: maybe_rfc3339(attraction.reviewed_at),
            created_at: rfc3339(attraction.created_at),
            updated_at: maybe_rfc3339(attraction.updated_at),
        }
    }
}

/// List approved attractions.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<AttractionResponse>>> {
    let attractions = state
        .attraction_service
        .list_public(&query.into(), page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(attractions.into_iter().map(Into::into).collect()))
}

/// List own submissions.
async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<AttractionResponse>>> {
    let attractions = state
        .attraction_service
        .list_mine(user.id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(attractions.into_iter().map(Into::into).collect()))
}

async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<AttractionResponse>> {
    let attraction = state.attraction_service.get(id, viewer.as_ref()).await?;
    Ok(ApiResponse::ok(attraction.into()))
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAttractionInput>,
) -> AppResult<ApiResponse<AttractionResponse>> {
    let attraction = state.attraction_service.create(&user, input).await?;
    Ok(ApiResponse::created(attraction.into()))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateAttractionInput>,
) -> AppResult<ApiResponse<AttractionResponse>> {
    let attraction = state.attraction_service.update(&user, id, input).await?;
    Ok(ApiResponse::ok(attraction.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.attraction_service.delete(&user, id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/mine", get(mine))
        .route("/{id}", get(show).put(update).delete(delete))
}
