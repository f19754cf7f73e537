//! Flight search endpoint.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use voyage_common::{AppError, AppResult};
use voyage_core::{FlightOffer, FlightSearchQuery};

use crate::{middleware::AppState, response::ApiResponse};

/// Search Amadeus flight offers.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<FlightSearchQuery>,
) -> AppResult<ApiResponse<Vec<FlightOffer>>> {
    let service = state
        .flight_search_service
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Flight search is not configured".to_string()))?;

    Ok(ApiResponse::ok(service.search(&query).await?))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}
