//! Admin endpoints: moderation queues, review decisions, users, payments.
//!
//! Every route here sits behind the admin role gate.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware::from_fn,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use validator::Validate;
use voyage_common::AppResult;
use voyage_core::ResourceKind;
use voyage_db::entities::{ModerationStatus, user::Role};

use super::{
    attractions::AttractionResponse, bookings::BookingResponse,
    flight_bookings::FlightBookingResponse, hotels::HotelResponse, payments::PaymentResponse,
    restaurants::RestaurantResponse, users::UserResponse,
};
use crate::{
    extractors::{AuthUser, Pagination},
    middleware::{AppState, require_admin},
    response::ApiResponse,
};

/// Pending submissions per kind.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub pending_hotels: u64,
    pub pending_restaurants: u64,
    pub pending_attractions: u64,
    pub pending_bookings: u64,
    pub pending_flight_bookings: u64,
    pub users: u64,
}

/// Any record that goes through moderation.
#[derive(Serialize)]
#[serde(untagged)]
pub enum ModeratedRecord {
    Hotel(HotelResponse),
    Restaurant(RestaurantResponse),
    Attraction(AttractionResponse),
    Booking(BookingResponse),
    FlightBooking(FlightBookingResponse),
}

/// `?status=` for the moderation queues.
#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    pub status: Option<ModerationStatus>,
}

/// `?role=` for the user list.
#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub role: Option<Role>,
}

/// Approve or reject.
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    pub status: ModerationStatus,
    #[validate(length(max = 1024))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// Pending counts for the dashboard.
async fn stats(State(state): State<AppState>) -> AppResult<ApiResponse<StatsResponse>> {
    let pending = ModerationStatus::Pending;

    Ok(ApiResponse::ok(StatsResponse {
        pending_hotels: state.hotel_service.count_by_status(pending).await?,
        pending_restaurants: state.restaurant_service.count_by_status(pending).await?,
        pending_attractions: state.attraction_service.count_by_status(pending).await?,
        pending_bookings: state.booking_service.count_by_status(pending).await?,
        pending_flight_bookings: state.flight_booking_service.count_by_status(pending).await?,
        users: state.user_service.count().await?,
    }))
}

/// Moderation queue for one kind.
///
/// Listings default to `pending`. Booking queues list every status unless
/// one is given.
async fn queue(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<QueueQuery>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<ModeratedRecord>>> {
    let kind: ResourceKind = kind.parse()?;
    let (limit, offset) = (page.limit(), page.offset);
    let listing_status = query.status.unwrap_or(ModerationStatus::Pending);

    let records = match kind {
        ResourceKind::Hotel => state
            .hotel_service
            .list_by_status(listing_status, limit, offset)
            .await?
            .into_iter()
            .map(|m| ModeratedRecord::Hotel(m.into()))
            .collect(),
        ResourceKind::Restaurant => state
            .restaurant_service
            .list_by_status(listing_status, limit, offset)
            .await?
            .into_iter()
            .map(|m| ModeratedRecord::Restaurant(m.into()))
            .collect(),
        ResourceKind::Attraction => state
            .attraction_service
            .list_by_status(listing_status, limit, offset)
            .await?
            .into_iter()
            .map(|m| ModeratedRecord::Attraction(m.into()))
            .collect(),
        ResourceKind::Booking => state
            .booking_service
            .list_by_status(query.status, limit, offset)
            .await?
            .into_iter()
            .map(|m| ModeratedRecord::Booking(m.into()))
            .collect(),
        ResourceKind::FlightBooking => state
            .flight_booking_service
            .list_by_status(query.status, limit, offset)
            .await?
            .into_iter()
            .map(|m| ModeratedRecord::FlightBooking(m.into()))
            .collect(),
    };

    Ok(ApiResponse::ok(records))
}

/// Approve or reject a pending record.
async fn review(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i32)>,
    Json(req): Json<ReviewRequest>,
) -> AppResult<ApiResponse<ModeratedRecord>> {
    req.validate()?;
    let kind: ResourceKind = kind.parse()?;
    let note = req.note.filter(|n| !n.trim().is_empty());

    let record = match kind {
        ResourceKind::Hotel => ModeratedRecord::Hotel(
            state
                .hotel_service
                .review(&admin, id, req.status, note)
                .await?
                .into(),
        ),
        ResourceKind::Restaurant => ModeratedRecord::Restaurant(
            state
                .restaurant_service
                .review(&admin, id, req.status, note)
                .await?
                .into(),
        ),
        ResourceKind::Attraction => ModeratedRecord::Attraction(
            state
                .attraction_service
                .review(&admin, id, req.status, note)
                .await?
                .into(),
        ),
        ResourceKind::Booking => ModeratedRecord::Booking(
            state
                .booking_service
                .review(&admin, id, req.status, note)
                .await?
                .into(),
        ),
        ResourceKind::FlightBooking => ModeratedRecord::FlightBooking(
            state
                .flight_booking_service
                .review(&admin, id, req.status, note)
                .await?
                .into(),
        ),
    };

    Ok(ApiResponse::ok(record))
}

/// List accounts.
async fn users(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list_users(query.role, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Change an account's role.
async fn change_role(
    AuthUser(admin): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<ChangeRoleRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.change_role(&admin, id, req.role).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// All payments.
async fn payments(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<PaymentResponse>>> {
    let payments = state
        .payment_service
        .list_all(page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(payments.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/users", get(users))
        .route("/users/{id}/role", put(change_role))
        .route("/payments", get(payments))
        .route("/{kind}", get(queue))
        .route("/{kind}/{id}/status", put(review))
        .route_layer(from_fn(require_admin))
}
