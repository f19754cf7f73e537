//! Flight booking endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use voyage_common::AppResult;
use voyage_core::CreateFlightBookingInput;
use voyage_db::entities::{ModerationStatus, flight_booking};

use super::{maybe_rfc3339, rfc3339};
use crate::{
    extractors::{AuthUser, Pagination},
    middleware::AppState,
    response::ApiResponse,
};

/// Flight booking response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightBookingResponse {
    pub id: i32,
    pub user_id: i32,
    pub reference: String,
    pub offer_id: Option<String>,
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_at: String,
    pub arrival_at: String,
    pub cabin_class: String,
    pub passengers: i32,
    pub passenger_names: Value,
    pub base_fare_cents: i64,
    pub amount_cents: i64,
    pub currency: String,
    pub contact_email: String,
    pub status: ModerationStatus,
    pub review_note: Option<String>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
}

impl From<flight_booking::Model> for FlightBookingResponse {
    fn from(booking: flight_booking::Model) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            reference: booking.reference,
            offer_id: booking.offer_id,
            airline: booking.airline,
            flight_number: booking.flight_number,
            origin: booking.origin,
            destination: booking.destination,
            departure_at: rfc3339(booking.departure_at),
            arrival_at: rfc3339(booking.arrival_at),
            cabin_class: booking.cabin_class,
            passengers: booking.passengers,
            passenger_names: booking.passenger_names,
            base_fare_cents: booking.base_fare_cents,
            amount_cents: booking.amount_cents,
            currency: booking.currency,
            contact_email: booking.contact_email,
            status: booking.status,
            review_note: booking.review_note,
            reviewed_at: maybe_rfc3339(booking.reviewed_at),
            created_at: rfc3339(booking.created_at),
        }
    }
}

/// Book a flight. The booking waits for review like any other.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFlightBookingInput>,
) -> AppResult<ApiResponse<FlightBookingResponse>> {
    let booking = state.flight_booking_service.create(&user, input).await?;
    Ok(ApiResponse::created(booking.into()))
}

async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<FlightBookingResponse>>> {
    let bookings = state
        .flight_booking_service
        .list_mine(user.id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(bookings.into_iter().map(Into::into).collect()))
}

async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<FlightBookingResponse>> {
    let booking = state.flight_booking_service.get(&user, id).await?;
    Ok(ApiResponse::ok(booking.into()))
}

async fn cancel(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<FlightBookingResponse>> {
    let booking = state.flight_booking_service.cancel(&user, id).await?;
    Ok(ApiResponse::ok(booking.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/mine", get(mine))
        .route("/{id}", get(show))
        .route("/{id}/cancel", post(cancel))
}
