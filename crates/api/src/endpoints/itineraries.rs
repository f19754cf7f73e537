//! Itinerary endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use voyage_common::AppResult;
use voyage_core::{CreateItineraryInput, UpdateItineraryInput};
use voyage_db::entities::itinerary;

use super::{maybe_rfc3339, rfc3339};
use crate::{
    extractors::{AuthUser, MaybeAuthUser, Pagination},
    middleware::AppState,
    response::{ApiResponse, no_content},
};

/// Itinerary response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
    pub items: Value,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<itinerary::Model> for ItineraryResponse {
    fn from(itinerary: itinerary::Model) -> Self {
        Self {
            id: itinerary.id,
            user_id: itinerary.user_id,
            title: itinerary.title,
            destination: itinerary.destination,
            start_date: itinerary.start_date,
            end_date: itinerary.end_date,
            notes: itinerary.notes,
            items: itinerary.items,
            is_public: itinerary.is_public,
            created_at: rfc3339(itinerary.created_at),
            updated_at: maybe_rfc3339(itinerary.updated_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PublicQuery {
    pub destination: Option<String>,
}

/// List own itineraries.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<ItineraryResponse>>> {
    let itineraries = state
        .itinerary_service
        .list_mine(user.id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(itineraries.into_iter().map(Into::into).collect()))
}

/// Shared itineraries, optionally for one destination.
async fn public(
    State(state): State<AppState>,
    Query(query): Query<PublicQuery>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<ItineraryResponse>>> {
    let destination = query.destination.as_deref().filter(|d| !d.is_empty());
    let itineraries = state
        .itinerary_service
        .list_public(destination, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(itineraries.into_iter().map(Into::into).collect()))
}

async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<ItineraryResponse>> {
    let itinerary = state.itinerary_service.get(id, viewer.as_ref()).await?;
    Ok(ApiResponse::ok(itinerary.into()))
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateItineraryInput>,
) -> AppResult<ApiResponse<ItineraryResponse>> {
    let itinerary = state.itinerary_service.create(&user, input).await?;
    Ok(ApiResponse::created(itinerary.into()))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateItineraryInput>,
) -> AppResult<ApiResponse<ItineraryResponse>> {
    let itinerary = state.itinerary_service.update(&user, id, input).await?;
    Ok(ApiResponse::ok(itinerary.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    state.itinerary_service.delete(&user, id).await?;
    Ok(no_content())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/public", get(public))
        .route("/{id}", get(show).put(update).delete(delete))
}
