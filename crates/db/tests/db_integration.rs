//! Database integration tests.
//!
//! These tests require a running `MySQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 3307)
//!   `TEST_DB_USER` (default: `voyage_test`)
//!   `TEST_DB_PASSWORD` (default: `voyage_test`)
//!   `TEST_DB_NAME` (default: `voyage_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use serde_json::json;
use voyage_common::AppError;
use voyage_db::{
    entities::{ModerationStatus, hotel, user},
    repositories::{HotelRepository, ListingFilter, UserRepository},
    test_utils::{TestDatabase, TestDbConfig},
};

#[tokio::test]
#[ignore = "requires running MySQL instance"]
async fn test_database_connection() {
    let result = TestDatabase::new().await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running MySQL instance"]
async fn test_hotel_moderation_round_trip() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = Arc::new(db.connection().clone());

    let users = UserRepository::new(Arc::clone(&conn));
    let owner = users
        .create(user::ActiveModel {
            firebase_uid: Set("owner-uid".to_string()),
            email: Set("owner@example.com".to_string()),
            role: Set(user::Role::BusinessAdministrator),
            created_at: Set(Utc::now()),
            ..Default::default()
        })
        .await
        .unwrap();

    let hotels = HotelRepository::new(Arc::clone(&conn));
    let hotel = hotels
        .create(hotel::ActiveModel {
            owner_id: Set(owner.id),
            name: Set("Harbour View".to_string()),
            description: Set("Rooms by the sea".to_string()),
            city: Set("Lisbon".to_string()),
            address: Set("Rua do Mar 1".to_string()),
            price_per_night_cents: Set(12_000),
            star_rating: Set(4),
            amenities: Set(json!([])),
            images: Set(json!([])),
            availability: Set(json!({})),
            status: Set(ModerationStatus::Pending),
            created_at: Set(Utc::now()),
            ..Default::default()
        })
        .await
        .unwrap();

    let filter = ListingFilter::default();
    assert!(hotels.find_public(&filter, 20, 0).await.unwrap().is_empty());

    hotels
        .transition_status(
            hotel.id,
            ModerationStatus::Pending,
            ModerationStatus::Approved,
            owner.id,
            None,
        )
        .await
        .unwrap();
    assert_eq!(hotels.find_public(&filter, 20, 0).await.unwrap().len(), 1);

    let again = hotels
        .transition_status(
            hotel.id,
            ModerationStatus::Pending,
            ModerationStatus::Approved,
            owner.id,
            None,
        )
        .await;
    assert!(matches!(again, Err(AppError::StateConflict(_))));

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(config.database_url().starts_with("mysql://"));
}
