//! Meta endpoints.

use axum::{Router, routing::get};
use serde::Serialize;
use voyage_core::pricing::CURRENCY;

use crate::{middleware::AppState, response::ApiResponse};

/// Service metadata response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    pub name: String,
    pub version: String,
    pub currency: String,
}

/// Get service metadata.
async fn meta() -> ApiResponse<MetaResponse> {
    ApiResponse::ok(MetaResponse {
        name: "voyage".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        currency: CURRENCY.to_string(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(meta))
}
