//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use voyage_common::AppError;
use voyage_core::{
    AttractionService, BookingService, FavoriteService, FlightBookingService,
    FlightSearchService, HotelService, ItineraryService, NewsletterService, PaymentService,
    PlacesService, RestaurantService, TokenVerifierService, UserService,
};
use voyage_db::entities::user::{self, Role};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub verifier: TokenVerifierService,
    pub user_service: UserService,
    pub hotel_service: HotelService,
    pub restaurant_service: RestaurantService,
    pub attraction_service: AttractionService,
    pub booking_service: BookingService,
    pub flight_booking_service: FlightBookingService,
    pub itinerary_service: ItineraryService,
    pub favorite_service: FavoriteService,
    pub payment_service: PaymentService,
    pub flight_search_service: Option<FlightSearchService>,
    pub places_service: Option<PlacesService>,
    pub newsletter_service: Option<NewsletterService>,
}

/// Authentication middleware.
///
/// A request without a bearer token passes through anonymously. A token that
/// fails verification is rejected with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned);

    if let Some(token) = token {
        let identity = match state.verifier.verify(&token).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                return AppError::Unauthorized.into_response();
            }
        };

        match state.user_service.find_by_identity(&identity).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
            }
            Ok(None) => {}
            Err(e) => return e.into_response(),
        }
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

/// Only administrators.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    gate(req, next, user::Model::is_admin).await
}

/// Administrators and business administrators.
pub async fn require_business(req: Request<Body>, next: Next) -> Response {
    gate(req, next, |user| {
        matches!(user.role, Role::Admin | Role::BusinessAdministrator)
    })
    .await
}

async fn gate(req: Request<Body>, next: Next, allowed: fn(&user::Model) -> bool) -> Response {
    match req.extensions().get::<user::Model>() {
        Some(user) if allowed(user) => next.run(req).await,
        Some(user) => {
            tracing::debug!(user_id = user.id, role = ?user.role, "Role gate refused request");
            AppError::Forbidden("Insufficient role".to_string()).into_response()
        }
        None => AppError::Unauthorized.into_response(),
    }
}
