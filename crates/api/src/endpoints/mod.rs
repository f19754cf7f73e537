//! API endpoints.

mod admin;
mod attractions;
mod bookings;
mod favorites;
mod flight_bookings;
mod flights;
mod hotels;
mod itineraries;
mod meta;
mod newsletter;
mod payments;
mod places;
mod restaurants;
mod users;

use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use voyage_db::repositories::ListingFilter;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/meta", meta::router())
        .nest("/users", users::router())
        .nest("/hotels", hotels::router())
        .nest("/restaurants", restaurants::router())
        .nest("/attractions", attractions::router())
        .nest("/bookings", bookings::router())
        .nest("/flights", flights::router())
        .nest("/flight-bookings", flight_bookings::router())
        .nest("/itineraries", itineraries::router())
        .nest("/favorites", favorites::router())
        .nest("/payments", payments::router())
        .nest("/places", places::router())
        .nest("/newsletter", newsletter::router())
        .nest("/admin", admin::router())
}

/// Filters for the public listing routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListingQuery {
    pub city: Option<String>,
    pub q: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub category: Option<String>,
}

impl From<ListingQuery> for ListingFilter {
    fn from(query: ListingQuery) -> Self {
        Self {
            city: query.city.filter(|c| !c.is_empty()),
            query: query.q.filter(|q| !q.is_empty()),
            min_price: query.min_price,
            max_price: query.max_price,
            category: query.category.filter(|c| !c.is_empty()),
        }
    }
}

pub(crate) fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

pub(crate) fn maybe_rfc3339(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(|t| t.to_rfc3339())
}
