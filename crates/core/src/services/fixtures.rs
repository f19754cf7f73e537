//! Model builders for service tests.

use chrono::{NaiveDate, Utc};
use serde_json::json;
use voyage_db::entities::{
    ListingKind, ModerationStatus, attraction, booking, flight_booking, hotel, restaurant,
    user::{self, Role},
};

pub fn user(id: i32, role: Role) -> user::Model {
    user::Model {
        id,
        firebase_uid: format!("uid-{id}"),
        email: format!("user{id}@example.com"),
        display_name: Some(format!("User {id}")),
        phone: None,
        avatar_url: None,
        home_city: None,
        role,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn hotel(id: i32, owner_id: i32, status: ModerationStatus) -> hotel::Model {
    hotel::Model {
        id,
        owner_id,
        name: "Harbour View".to_string(),
        description: "Rooms by the sea".to_string(),
        city: "Lisbon".to_string(),
        address: "Rua do Mar 1".to_string(),
        price_per_night_cents: 12_000,
        star_rating: 4,
        amenities: json!(["wifi"]),
        images: json!([]),
        availability: json!({ "2030-06-02": false }),
        status,
        review_note: None,
        reviewed_by: None,
        reviewed_at: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn restaurant(id: i32, owner_id: i32, status: ModerationStatus) -> restaurant::Model {
    restaurant::Model {
        id,
        owner_id,
        name: "Casa Alfama".to_string(),
        description: String::new(),
        city: "Lisbon".to_string(),
        address: "Largo 3".to_string(),
        cuisine: "portuguese".to_string(),
        price_level: 2,
        opening_hours: Some("12:00-23:00".to_string()),
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

pub fn attraction(id: i32, owner_id: i32, status: ModerationStatus) -> attraction::Model {
    attraction::Model {
        id,
        owner_id,
        name: "Castle Tour".to_string(),
        description: String::new(),
        city: "Lisbon".to_string(),
        address: "Castelo".to_string(),
        category: "history".to_string(),
        ticket_price_cents: 3_000,
        opening_hours: None,
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

pub fn booking(id: i32, user_id: i32, status: ModerationStatus) -> booking::Model {
    booking::Model {
        id,
        user_id,
        resource_type: ListingKind::Hotel,
        resource_id: 1,
        reference: "VY-7K3Q9XPA".to_string(),
        start_date: date(2030, 6, 1),
        end_date: Some(date(2030, 6, 2)),
        quantity: 1,
        guests: 2,
        option: "standard".to_string(),
        amount_cents: 12_000,
        currency: "EUR".to_string(),
        special_requests: None,
        contact_email: format!("user{user_id}@example.com"),
        status,
        review_note: None,
        reviewed_by: None,
        reviewed_at: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn flight_booking(id: i32, user_id: i32, status: ModerationStatus) -> flight_booking::Model {
    let departure = date(2030, 7, 1).and_hms_opt(9, 30, 0).unwrap().and_utc();
    flight_booking::Model {
        id,
        user_id,
        reference: "VY-FL1GHT01".to_string(),
        offer_id: Some("1".to_string()),
        airline: "TP".to_string(),
        flight_number: "TP1350".to_string(),
        origin: "LIS".to_string(),
        destination: "CDG".to_string(),
        departure_at: departure,
        arrival_at: departure + chrono::Duration::hours(2),
        cabin_class: "economy".to_string(),
        passengers: 2,
        passenger_names: json!(["Ana Silva", "Rui Silva"]),
        base_fare_cents: 10_000,
        amount_cents: 20_000,
        currency: "EUR".to_string(),
        contact_email: format!("user{user_id}@example.com"),
        status,
        review_note: None,
        reviewed_by: None,
        reviewed_at: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
