//! Payment endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Serialize;
use voyage_common::AppResult;
use voyage_core::CreatePaymentInput;
use voyage_db::entities::payment::{self, PaymentMethod, PaymentStatus, PaymentTarget};

use super::{maybe_rfc3339, rfc3339};
use crate::{
    extractors::{AuthUser, Pagination},
    middleware::AppState,
    response::ApiResponse,
};

/// Payment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: i32,
    pub user_id: i32,
    pub booking_type: PaymentTarget,
    pub booking_id: i32,
    pub amount_cents: i64,
    pub currency: String,
    pub method: PaymentMethod,
    pub transaction_ref: String,
    pub status: PaymentStatus,
    pub created_at: String,
    pub refunded_at: Option<String>,
}

impl From<payment::Model> for PaymentResponse {
    fn from(payment: payment::Model) -> Self {
        Self {
            id: payment.id,
            user_id: payment.user_id,
            booking_type: payment.booking_type,
            booking_id: payment.booking_id,
            amount_cents: payment.amount_cents,
            currency: payment.currency,
            method: payment.method,
            transaction_ref: payment.transaction_ref,
            status: payment.status,
            created_at: rfc3339(payment.created_at),
            refunded_at: maybe_rfc3339(payment.refunded_at),
        }
    }
}

/// Pay an approved booking.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePaymentInput>,
) -> AppResult<ApiResponse<PaymentResponse>> {
    let payment = state.payment_service.create(&user, input).await?;
    Ok(ApiResponse::created(payment.into()))
}

async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<PaymentResponse>>> {
    let payments = state
        .payment_service
        .list_mine(user.id, page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(payments.into_iter().map(Into::into).collect()))
}

async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<PaymentResponse>> {
    let payment = state.payment_service.get(&user, id).await?;
    Ok(ApiResponse::ok(payment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/mine", get(mine))
        .route("/{id}", get(show))
}
