//! Booking amount calculation.
//!
//! Prices come from a fixed table keyed by listing kind and option. All
//! amounts are integer cents in [`CURRENCY`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;
use voyage_common::{AppError, AppResult};
use voyage_db::entities::ListingKind;

/// Currency of every amount the table produces.
pub const CURRENCY: &str = "EUR";

/// Longest hotel stay that can be booked in one go.
pub const MAX_NIGHTS: i64 = 30;

/// Upper bound on a flight base fare, in cents.
pub const MAX_BASE_FARE_CENTS: i64 = 10_000_000;

/// Unit prices in cents.
///
/// Hotels are priced per room and night, restaurants per guest, attractions
/// per ticket.
const PRICE_TABLE: &[(ListingKind, &str, i64)] = &[
    (ListingKind::Hotel, "standard", 12_000),
    (ListingKind::Hotel, "deluxe", 20_000),
    (ListingKind::Hotel, "suite", 35_000),
    (ListingKind::Restaurant, "standard", 1_500),
    (ListingKind::Restaurant, "private", 4_000),
    (ListingKind::Attraction, "adult", 3_000),
    (ListingKind::Attraction, "child", 1_500),
    (ListingKind::Attraction, "senior", 2_000),
];

/// Unit price for an option, if the table knows it.
#[must_use]
pub fn unit_price(kind: ListingKind, option: &str) -> Option<i64> {
    PRICE_TABLE
        .iter()
        .find(|(k, o, _)| *k == kind && o.eq_ignore_ascii_case(option))
        .map(|(_, _, price)| *price)
}

/// Options offered for a listing kind.
#[must_use]
pub fn options_for(kind: ListingKind) -> Vec<&'static str> {
    PRICE_TABLE
        .iter()
        .filter(|(k, _, _)| *k == kind)
        .map(|(_, o, _)| *o)
        .collect()
}

/// What is being priced.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    pub resource_type: ListingKind,
    #[validate(length(min = 1, max = 32))]
    pub option: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Rooms or tickets.
    #[serde(default = "default_one")]
    #[validate(range(min = 1, max = 20))]
    pub quantity: i32,
    #[serde(default = "default_one")]
    #[validate(range(min = 1, max = 50))]
    pub guests: i32,
}

const fn default_one() -> i32 {
    1
}

/// Calculated price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub unit_price_cents: i64,
    /// Number of priced units (room-nights, guests or tickets).
    pub units: i64,
    /// Nights stayed; `None` for anything but hotels.
    pub nights: Option<i64>,
    pub amount_cents: i64,
    pub currency: &'static str,
}

/// Price a booking request.
pub fn quote(input: &QuoteInput) -> AppResult<Quote> {
    input.validate()?;

    let unit_price_cents = unit_price(input.resource_type, &input.option).ok_or_else(|| {
        AppError::invalid_field(
            "option",
            format!(
                "unknown {} option '{}', expected one of: {}",
                input.resource_type,
                input.option,
                options_for(input.resource_type).join(", ")
            ),
        )
    })?;

    let (units, nights) = match input.resource_type {
        ListingKind::Hotel => {
            let end = input
                .end_date
                .ok_or_else(|| AppError::invalid_field("endDate", "required for hotels"))?;
            if end <= input.start_date {
                return Err(AppError::invalid_field(
                    "endDate",
                    "must be after startDate",
                ));
            }
            let nights = (end - input.start_date).num_days();
            if nights > MAX_NIGHTS {
                return Err(AppError::invalid_field(
                    "endDate",
                    format!("stays are limited to {MAX_NIGHTS} nights"),
                ));
            }
            (i64::from(input.quantity) * nights, Some(nights))
        }
        ListingKind::Restaurant => (i64::from(input.guests), None),
        ListingKind::Attraction => (i64::from(input.quantity), None),
    };

    let amount_cents = unit_price_cents
        .checked_mul(units)
        .ok_or_else(|| AppError::invalid_field("quantity", "amount is too large"))?;

    Ok(Quote {
        unit_price_cents,
        units,
        nights,
        amount_cents,
        currency: CURRENCY,
    })
}

/// Cabin classes offered for flights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    /// Fare multiplier relative to economy, in percent.
    #[must_use]
    pub const fn multiplier_percent(self) -> i64 {
        match self {
            Self::Economy => 100,
            Self::PremiumEconomy => 150,
            Self::Business => 250,
            Self::First => 400,
        }
    }

    /// Name as stored on the booking.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::PremiumEconomy => "premium_economy",
            Self::Business => "business",
            Self::First => "first",
        }
    }

    /// Amadeus `travelClass` value.
    #[must_use]
    pub const fn amadeus_code(self) -> &'static str {
        match self {
            Self::Economy => "ECONOMY",
            Self::PremiumEconomy => "PREMIUM_ECONOMY",
            Self::Business => "BUSINESS",
            Self::First => "FIRST",
        }
    }
}

/// Total for a flight booking, rounded half up to whole cents.
pub fn flight_amount(base_fare_cents: i64, passengers: i32, cabin: CabinClass) -> AppResult<i64> {
    if !(0..=MAX_BASE_FARE_CENTS).contains(&base_fare_cents) {
        return Err(AppError::invalid_field(
            "baseFareCents",
            format!("must be between 0 and {MAX_BASE_FARE_CENTS}"),
        ));
    }
    if passengers < 1 {
        return Err(AppError::invalid_field("passengers", "must be at least 1"));
    }

    base_fare_cents
        .checked_mul(i64::from(passengers))
        .and_then(|fare| fare.checked_mul(cabin.multiplier_percent()))
        .and_then(|scaled| scaled.checked_add(50))
        .map(|scaled| scaled / 100)
        .ok_or_else(|| AppError::invalid_field("baseFareCents", "amount is too large"))
}

/// Parse a decimal amount such as `"123.45"` into cents.
pub fn parse_amount_cents(amount: &str) -> AppResult<i64> {
    let invalid = || AppError::ExternalService(format!("Invalid amount: {amount}"));
    let (whole, fraction) = amount.trim().split_once('.').unwrap_or((amount.trim(), "0"));

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let fraction = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction[..2].parse::<i64>().map_err(|_| invalid())?,
    };

    whole
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: ListingKind, option: &str) -> QuoteInput {
        QuoteInput {
            resource_type: kind,
            option: option.to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            end_date: None,
            quantity: 1,
            guests: 1,
        }
    }

    #[test]
    fn test_hotel_priced_per_room_night() {
        let mut req = input(ListingKind::Hotel, "deluxe");
        req.end_date = NaiveDate::from_ymd_opt(2026, 6, 4);
        req.quantity = 2;

        let quote = quote(&req).unwrap();

        assert_eq!(quote.nights, Some(3));
        assert_eq!(quote.units, 6);
        assert_eq!(quote.amount_cents, 120_000);
        assert_eq!(quote.currency, "EUR");
    }

    #[test]
    fn test_hotel_requires_later_end_date() {
        let mut req = input(ListingKind::Hotel, "standard");
        assert!(matches!(quote(&req), Err(AppError::Validation { .. })));

        req.end_date = Some(req.start_date);
        assert!(matches!(quote(&req), Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_restaurant_priced_per_guest() {
        let mut req = input(ListingKind::Restaurant, "private");
        req.guests = 6;

        assert_eq!(quote(&req).unwrap().amount_cents, 24_000);
    }

    #[test]
    fn test_attraction_priced_per_ticket() {
        let mut req = input(ListingKind::Attraction, "Child");
        req.quantity = 3;

        assert_eq!(quote(&req).unwrap().amount_cents, 4_500);
    }

    #[test]
    fn test_unknown_option() {
        let err = quote(&input(ListingKind::Attraction, "suite")).unwrap_err();
        match err {
            AppError::Validation { fields, .. } => {
                assert!(fields["option"][0].contains("adult, child, senior"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_flight_amount() {
        assert_eq!(flight_amount(10_000, 2, CabinClass::Economy).unwrap(), 20_000);
        assert_eq!(flight_amount(10_000, 1, CabinClass::Business).unwrap(), 25_000);
        assert_eq!(flight_amount(333, 1, CabinClass::PremiumEconomy).unwrap(), 500);
        assert!(flight_amount(10_000, 0, CabinClass::First).is_err());
    }

    #[test]
    fn test_flight_amount_rejects_oversized_fare() {
        let err = flight_amount(100_000_000_000_000_000, 9, CabinClass::First).unwrap_err();
        match err {
            AppError::Validation { fields, .. } => assert!(fields.contains_key("baseFareCents")),
            other => panic!("unexpected error: {other:?}"),
        }

        // Largest accepted fare still prices without overflow.
        assert_eq!(
            flight_amount(MAX_BASE_FARE_CENTS, 9, CabinClass::First).unwrap(),
            MAX_BASE_FARE_CENTS * 9 * 4
        );
    }

    #[test]
    fn test_quote_rejects_out_of_range_counts() {
        let mut req = input(ListingKind::Attraction, "adult");
        req.quantity = i32::MAX;
        match quote(&req).unwrap_err() {
            AppError::Validation { fields, .. } => assert!(fields.contains_key("quantity")),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut req = input(ListingKind::Restaurant, "standard");
        req.guests = 51;
        assert!(matches!(quote(&req), Err(AppError::Validation { .. })));
        req.guests = 0;
        assert!(matches!(quote(&req), Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_quote_caps_stay_length() {
        let mut req = input(ListingKind::Hotel, "suite");
        req.quantity = 20;
        req.end_date = Some(NaiveDate::MAX);
        match quote(&req).unwrap_err() {
            AppError::Validation { fields, .. } => assert!(fields.contains_key("endDate")),
            other => panic!("unexpected error: {other:?}"),
        }

        // The longest allowed stay at full quantity.
        req.end_date = req.start_date.checked_add_days(chrono::Days::new(30));
        let quote = quote(&req).unwrap();
        assert_eq!(quote.nights, Some(MAX_NIGHTS));
        assert_eq!(quote.amount_cents, 35_000 * 20 * 30);
    }

    #[test]
    fn test_parse_amount_cents() {
        assert_eq!(parse_amount_cents("123.45").unwrap(), 12_345);
        assert_eq!(parse_amount_cents("99.5").unwrap(), 9_950);
        assert_eq!(parse_amount_cents("80").unwrap(), 8_000);
        assert!(parse_amount_cents("abc").is_err());
        assert!(parse_amount_cents("12.é5").is_err());
        assert!(parse_amount_cents("1.€").is_err());
    }
}
