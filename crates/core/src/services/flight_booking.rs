//! Flight booking service.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;
use voyage_common::{AppError, AppResult, IdGenerator};
use voyage_db::entities::{ModerationStatus, flight_booking, user};
use voyage_db::repositories::FlightBookingRepository;

use super::notification::{BookingEvent, BookingNotifier};
use crate::moderation::{check_cancellation, check_review, ensure_owner_or_admin};
use crate::pricing::{CURRENCY, CabinClass, flight_amount};

pub(crate) static AIRPORT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"));
static AIRLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{2}$").expect("valid regex"));
static FLIGHT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{2}[0-9]{1,4}[A-Z]?$").expect("valid regex"));

/// Input for booking a flight offer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlightBookingInput {
    #[validate(length(max = 64))]
    pub offer_id: Option<String>,
    #[validate(regex(path = *AIRLINE_CODE))]
    pub airline: String,
    #[validate(regex(path = *FLIGHT_NUMBER))]
    pub flight_number: String,
    #[validate(regex(path = *AIRPORT_CODE))]
    pub origin: String,
    #[validate(regex(path = *AIRPORT_CODE))]
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub arrival_at: DateTime<Utc>,
    pub cabin_class: CabinClass,
    /// At most nine travellers per booking.
    #[validate(length(min = 1, max = 9))]
    pub passenger_names: Vec<String>,
    /// Per-passenger economy fare in cents.
    #[validate(range(min = 1, max = 10_000_000))]
    pub base_fare_cents: i64,
    #[validate(email)]
    pub contact_email: Option<String>,
}

impl CreateFlightBookingInput {
    fn check_itinerary(&self) -> AppResult<()> {
        if self.origin == self.destination {
            return Err(AppError::invalid_field(
                "destination",
                "must differ from origin",
            ));
        }
        if self.arrival_at <= self.departure_at {
            return Err(AppError::invalid_field(
                "arrivalAt",
                "must be after departureAt",
            ));
        }
        if self.departure_at <= Utc::now() {
            return Err(AppError::invalid_field("departureAt", "must be in the future"));
        }
        if self.passenger_names.iter().any(|n| n.trim().is_empty()) {
            return Err(AppError::invalid_field(
                "passengerNames",
                "names must not be empty",
            ));
        }
        Ok(())
    }
}

/// Service for flight bookings.
#[derive(Clone)]
pub struct FlightBookingService {
    flight_repo: FlightBookingRepository,
    notifier: BookingNotifier,
    id_gen: IdGenerator,
}

impl FlightBookingService {
    /// Create a new flight booking service.
    #[must_use]
    pub const fn new(
        flight_repo: FlightBookingRepository,
        notifier: BookingNotifier,
    ) -> Self {
        Self {
            flight_repo,
            notifier,
            id_gen: IdGenerator::new(),
        }
    }

    /// Book a flight. The booking starts out pending.
    pub async fn create(
        &self,
        user: &user::Model,
        input: CreateFlightBookingInput,
    ) -> AppResult<flight_booking::Model> {
        input.validate()?;
        input.check_itinerary()?;

        let passengers = i32::try_from(input.passenger_names.len())
            .map_err(|_| AppError::invalid_field("passengerNames", "too many passengers"))?;
        let amount = flight_amount(input.base_fare_cents, passengers, input.cabin_class)?;

        let names: Vec<String> = input
            .passenger_names
            .iter()
            .map(|n| n.trim().to_string())
            .collect();

        let model = flight_booking::ActiveModel {
            user_id: Set(user.id),
            reference: Set(self.id_gen.booking_reference()),
            offer_id: Set(input.offer_id),
            airline: Set(input.airline),
            flight_number: Set(input.flight_number),
            origin: Set(input.origin),
            destination: Set(input.destination),
            departure_at: Set(input.departure_at),
            arrival_at: Set(input.arrival_at),
            cabin_class: Set(input.cabin_class.as_str().to_string()),
            passengers: Set(passengers),
            passenger_names: Set(Value::from(names)),
            base_fare_cents: Set(input.base_fare_cents),
            amount_cents: Set(amount),
            currency: Set(CURRENCY.to_string()),
            contact_email: Set(input.contact_email.unwrap_or_else(|| user.email.clone())),
            status: Set(ModerationStatus::Pending),
            review_note: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let booking = self.flight_repo.create(model).await?;
        tracing::info!(
            flight_booking_id = booking.id,
            user_id = user.id,
            flight = %booking.flight_number,
            amount_cents = booking.amount_cents,
            "Flight booking created"
        );

        self.notifier
            .booking_created(&BookingEvent::from(&booking))
            .await;

        Ok(booking)
    }

    /// Get a flight booking owned by `actor` (admins see all).
    pub async fn get(&self, actor: &user::Model, id: i32) -> AppResult<flight_booking::Model> {
        let booking = self.flight_repo.get_by_id(id).await?;
        ensure_owner_or_admin(&booking, actor)?;
        Ok(booking)
    }

    pub async fn list_mine(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<flight_booking::Model>> {
        self.flight_repo.find_by_user(user_id, limit, offset).await
    }

    pub async fn list_by_status(
        &self,
        status: Option<ModerationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<flight_booking::Model>> {
        self.flight_repo.find_by_status(status, limit, offset).await
    }

    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        self.flight_repo.count_by_status(status).await
    }

    /// Approve or reject a pending flight booking and tell the customer.
    pub async fn review(
        &self,
        actor: &user::Model,
        id: i32,
        target: ModerationStatus,
        note: Option<String>,
    ) -> AppResult<flight_booking::Model> {
        let booking = self.flight_repo.get_by_id(id).await?;
        check_review(&booking, target, actor)?;

        let updated = self
            .flight_repo
            .transition_status(id, booking.status, target, Some(actor.id), note)
            .await?;

        tracing::info!(
            flight_booking_id = id,
            status = %target,
            reviewer_id = actor.id,
            "Flight booking reviewed"
        );

        self.notifier
            .status_changed(&BookingEvent::from(&updated))
            .await;

        Ok(updated)
    }

    /// Cancel an approved flight booking and refund its payments.
    pub async fn cancel(
        &self,
        actor: &user::Model,
        id: i32,
    ) -> AppResult<flight_booking::Model> {
        let booking = self.flight_repo.get_by_id(id).await?;
        check_cancellation(&booking, actor)?;

        let reviewer = actor.is_admin().then_some(actor.id);
        let (updated, refunded) = self.flight_repo.cancel_with_refund(id, reviewer).await?;

        tracing::info!(
            flight_booking_id = id,
            actor_id = actor.id,
            refunded_payments = refunded,
            "Flight booking cancelled"
        );

        self.notifier
            .status_changed(&BookingEvent::from(&updated))
            .await;

        Ok(updated)
    }
}
