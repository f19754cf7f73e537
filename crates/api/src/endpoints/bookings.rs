//! Booking endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware::from_fn,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;
use voyage_common::AppResult;
use voyage_core::{
    CreateBookingInput,
    pricing::{Quote, QuoteInput},
};
use voyage_db::entities::{ListingKind, ModerationStatus, booking};

use super::{maybe_rfc3339, rfc3339};
use crate::{
    extractors::{AuthUser, Pagination},
    middleware::{AppState, require_business},
    response::ApiResponse,
};

/// Booking response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i32,
    pub user_id: i32,
    pub reference: String,
    pub resource_type: ListingKind,
    pub resource_id: i32,
    pub option: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub quantity: i32,
    pub guests: i32,
    pub amount_cents: i64,
    pub currency: String,
    pub special_requests: Option<String>,
    pub contact_email: String,
    pub status: ModerationStatus,
    pub review_note: Option<String>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<booking::Model> for BookingResponse {
    fn from(booking: booking::Model) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            reference: booking.reference,
            resource_type: booking.resource_type,
            resource_id: booking.resource_id,
            option: booking.option,
            start_date: booking.start_date,
            end_date: booking.end_date,
            quantity: booking.quantity,
            guests: booking.guests,
            amount_cents: booking.amount_cents,
            currency: booking.currency,
            special_requests: booking.special_requests,
            contact_email: booking.contact_email,
            status: booking.status,
            review_note: booking.review_note,
            reviewed_at: maybe_rfc3339(booking.reviewed_at),
            created_at: rfc3339(booking.created_at),
            updated_at: maybe_rfc3339(booking.updated_at),
        }
    }
}

/// Price a booking without creating it.
async fn quote(
    State(state): State<AppState>,
    Json(input): Json<QuoteInput>,
) -> AppResult<ApiResponse<Quote>> {
    Ok(ApiResponse::ok(state.booking_service.quote(&input)?))
}

/// Request a booking.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBookingInput>,
) -> AppResult<ApiResponse<BookingResponse>> {
    let booking = state.booking_service.create(&user, input).await?;
    Ok(ApiResponse::created(booking.into()))
}

async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<BookingResponse>>> {
    let bookings = state
        .booking_service
        .list_mine(user.id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(bookings.into_iter().map(Into::into).collect()))
}

/// Bookings made against the caller's listings.
async fn managed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<BookingResponse>>> {
    let bookings = state
        .booking_service
        .list_managed(user.id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(bookings.into_iter().map(Into::into).collect()))
}

async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<BookingResponse>> {
    let booking = state.booking_service.get(&user, id).await?;
    Ok(ApiResponse::ok(booking.into()))
}

/// Cancel an approved booking.
async fn cancel(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<BookingResponse>> {
    let booking = state.booking_service.cancel(&user, id).await?;
    Ok(ApiResponse::ok(booking.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/quote", post(quote))
        .route("/mine", get(mine))
        .route("/managed", get(managed).route_layer(from_fn(require_business)))
        .route("/{id}", get(show))
        .route("/{id}/cancel", post(cancel))
}
