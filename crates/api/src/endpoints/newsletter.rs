//! Newsletter endpoint.

use axum::{Json, Router, extract::State, routing::post};
use voyage_common::{AppError, AppResult};
use voyage_core::{SubscribeInput, Subscription};

use crate::{middleware::AppState, response::ApiResponse};

/// Subscribe an address to the mailing list.
async fn subscribe(
    State(state): State<AppState>,
    Json(input): Json<SubscribeInput>,
) -> AppResult<ApiResponse<Subscription>> {
    let service = state
        .newsletter_service
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Newsletter is not configured".to_string()))?;

    let subscription = service.subscribe(input).await?;
    Ok(ApiResponse::created(subscription))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}
