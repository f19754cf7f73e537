//! Place search endpoint.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use voyage_common::{AppError, AppResult};
use voyage_core::{Place, PlaceSearchQuery};

use crate::{middleware::AppState, response::ApiResponse};

async fn search(
    State(state): State<AppState>,
    Query(query): Query<PlaceSearchQuery>,
) -> AppResult<ApiResponse<Vec<Place>>> {
    let Some(service) = state.places_service.as_ref() else {
        return Err(AppError::BadRequest(
            "Place search is not configured".to_string(),
        ));
    };

    Ok(ApiResponse::ok(service.search(&query).await?))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}
