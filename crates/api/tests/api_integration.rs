//! Integration tests for the API router.
//!
//! The router runs against a mock MySQL connection and a token verifier
//! that accepts a fixed set of tokens.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;
use voyage_api::{AppState, auth_middleware, router as api_router};
use voyage_common::{AppError, AppResult};
use voyage_core::{
    AttractionService, BookingNotifier, BookingService, FavoriteService, FlightBookingService,
    HotelService, ItineraryService, ListingDirectory, NoOpMailer, PaymentService,
    RestaurantService, TokenVerifier, UserService, VerifiedIdentity,
};
use voyage_db::entities::{
    ModerationStatus, hotel,
    user::{self, Role},
};
use voyage_db::repositories::{
    AttractionRepository, BookingRepository, FavoriteRepository, FlightBookingRepository,
    HotelRepository, ItineraryRepository, PaymentRepository, RestaurantRepository,
    UserRepository,
};

/// Accepts `good-token`; everything else is rejected.
struct StaticVerifier;

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity> {
        if token == "good-token" {
            Ok(VerifiedIdentity {
                uid: "uid-1".to_string(),
                email: Some("traveller@example.com".to_string()),
                email_verified: true,
                name: Some("Traveller".to_string()),
                picture: None,
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

fn create_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let hotel_repo = HotelRepository::new(Arc::clone(&db));
    let restaurant_repo = RestaurantRepository::new(Arc::clone(&db));
    let attraction_repo = AttractionRepository::new(Arc::clone(&db));
    let booking_repo = BookingRepository::new(Arc::clone(&db));
    let flight_repo = FlightBookingRepository::new(Arc::clone(&db));
    let itinerary_repo = ItineraryRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteRepository::new(Arc::clone(&db));
    let payment_repo = PaymentRepository::new(Arc::clone(&db));

    let listings = ListingDirectory::new(
        hotel_repo.clone(),
        restaurant_repo.clone(),
        attraction_repo.clone(),
    );
    let notifier = BookingNotifier::new(
        Arc::new(NoOpMailer),
        None,
        "Voyage",
        "http://localhost:8080",
    );

    AppState {
        verifier: Arc::new(StaticVerifier),
        user_service: UserService::new(user_repo),
        hotel_service: HotelService::new(hotel_repo),
        restaurant_service: RestaurantService::new(restaurant_repo),
        attraction_service: AttractionService::new(attraction_repo),
        booking_service: BookingService::new(
            booking_repo.clone(),
            listings.clone(),
            notifier.clone(),
        ),
        flight_booking_service: FlightBookingService::new(
            flight_repo.clone(),
            notifier,
        ),
        itinerary_service: ItineraryService::new(itinerary_repo),
        favorite_service: FavoriteService::new(favorite_repo, listings),
        payment_service: PaymentService::new(payment_repo, booking_repo, flight_repo),
        flight_search_service: None,
        places_service: None,
        newsletter_service: None,
    }
}

fn create_router(db: MockDatabase) -> Router {
    let state = create_state(db.into_connection());
    api_router()
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn empty_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::MySql)
}

fn user(role: Role) -> user::Model {
    user::Model {
        id: 1,
        firebase_uid: "uid-1".to_string(),
        email: "traveller@example.com".to_string(),
        display_name: Some("Traveller".to_string()),
        phone: None,
        avatar_url: None,
        home_city: None,
        role,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn hotel(status: ModerationStatus) -> hotel::Model {
    hotel::Model {
        id: 7,
        owner_id: 2,
        name: "Harbour View".to_string(),
        description: String::new(),
        city: "Lisbon".to_string(),
        address: String::new(),
        price_per_night_cents: 12_000,
        star_rating: 4,
        amenities: json!([]),
        images: json!([]),
        availability: json!({}),
        status,
        review_note: None,
        reviewed_by: None,
        reviewed_at: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_meta_endpoint() {
    let app = create_router(empty_db());

    let response = app.oneshot(get("/meta", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "voyage");
    assert_eq!(body["data"]["currency"], "EUR");
}

#[tokio::test]
async fn test_protected_route_without_token_returns_401() {
    let app = create_router(empty_db());

    let response = app.oneshot(get("/hotels/mine", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_returns_401() {
    let app = create_router(empty_db());

    let response = app.oneshot(get("/hotels", Some("forged"))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_hotel_list() {
    let db = empty_db().append_query_results([vec![hotel(ModerationStatus::Approved)]]);
    let app = create_router(db);

    let response = app
        .oneshot(get("/hotels?city=Lisbon&limit=500", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let hotels = body["data"].as_array().unwrap();
    assert_eq!(hotels.len(), 1);
    assert_eq!(hotels[0]["pricePerNightCents"], 12_000);
    assert_eq!(hotels[0]["status"], "approved");
}

#[tokio::test]
async fn test_create_hotel_reports_field_errors() {
    let db = empty_db().append_query_results([vec![user(Role::User)]]);
    let app = create_router(db);

    let response = app
        .oneshot(send_json(
            "POST",
            "/hotels",
            "good-token",
            &json!({
                "name": "Harbour View",
                "city": "Lisbon",
                "pricePerNightCents": 12000,
                "starRating": 9
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["fields"]["starRating"].is_array());
}

#[tokio::test]
async fn test_unregistered_identity_is_forbidden() {
    let db = empty_db().append_query_results([Vec::<user::Model>::new()]);
    let app = create_router(db);

    let response = app
        .oneshot(get("/bookings/mine", Some("good-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let db = empty_db().append_query_results([vec![user(Role::User)]]);
    let app = create_router(db);

    let response = app
        .oneshot(get("/admin/stats", Some("good-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_business_route_refuses_plain_users() {
    let db = empty_db().append_query_results([vec![user(Role::User)]]);
    let app = create_router(db);

    let response = app
        .oneshot(get("/bookings/managed", Some("good-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reapproving_returns_state_conflict() {
    let db = empty_db()
        .append_query_results([vec![user(Role::Admin)]])
        .append_query_results([vec![hotel(ModerationStatus::Approved)]]);
    let app = create_router(db);

    let response = app
        .oneshot(send_json(
            "PUT",
            "/admin/hotels/7/status",
            "good-token",
            &json!({ "status": "approved" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "STATE_CONFLICT");
}

#[tokio::test]
async fn test_unknown_moderation_kind_returns_404() {
    let db = empty_db().append_query_results([vec![user(Role::Admin)]]);
    let app = create_router(db);

    let response = app
        .oneshot(get("/admin/spaceships", Some("good-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unconfigured_flight_search_returns_400() {
    let app = create_router(empty_db());

    let response = app
        .oneshot(get(
            "/flights/search?origin=LIS&destination=CDG&departureDate=2030-06-01",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_quote_is_public() {
    let app = create_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bookings/quote")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "resourceType": "restaurant",
                        "option": "standard",
                        "startDate": "2030-06-01",
                        "guests": 4
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["units"], 4);
}

#[tokio::test]
async fn test_quote_rejects_oversized_request() {
    let app = create_router(empty_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bookings/quote")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "resourceType": "hotel",
                        "option": "suite",
                        "startDate": "2030-06-01",
                        "endDate": "9999-12-31",
                        "quantity": 2147483647
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["fields"]["quantity"].is_array());
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_router(empty_db());

    let response = app
        .oneshot(get("/nonexistent/endpoint", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
