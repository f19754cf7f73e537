//! Booking service for hotel, restaurant and attraction reservations.

use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voyage_common::{AppError, AppResult, IdGenerator};
use voyage_db::entities::{ListingKind, ModerationStatus, booking, user};
use voyage_db::repositories::BookingRepository;

use super::listing::ListingDirectory;
use super::notification::{BookingEvent, BookingNotifier};
use crate::availability::ensure_available;
use crate::moderation::{check_cancellation, check_review};
use crate::pricing::{self, Quote, QuoteInput};

/// Input for booking a listing.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingInput {
    pub resource_type: ListingKind,
    pub resource_id: i32,
    #[validate(length(min = 1, max = 32))]
    pub option: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Rooms or tickets.
    #[serde(default = "default_one")]
    #[validate(range(min = 1, max = 20))]
    pub quantity: i32,
    #[serde(default = "default_one")]
    #[validate(range(min = 1, max = 50))]
    pub guests: i32,
    #[validate(length(max = 1024))]
    pub special_requests: Option<String>,
    /// Defaults to the account email.
    #[validate(email)]
    pub contact_email: Option<String>,
}

const fn default_one() -> i32 {
    1
}

impl CreateBookingInput {
    fn quote_input(&self) -> QuoteInput {
        QuoteInput {
            resource_type: self.resource_type,
            option: self.option.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            quantity: self.quantity,
            guests: self.guests,
        }
    }
}

/// Service for listing bookings.
#[derive(Clone)]
pub struct BookingService {
    booking_repo: BookingRepository,
    listings: ListingDirectory,
    notifier: BookingNotifier,
    id_gen: IdGenerator,
}

impl BookingService {
    /// Create a new booking service.
    #[must_use]
    pub const fn new(
        booking_repo: BookingRepository,
        listings: ListingDirectory,
        notifier: BookingNotifier,
    ) -> Self {
        Self {
            booking_repo,
            listings,
            notifier,
            id_gen: IdGenerator::new(),
        }
    }

    /// Price a booking without creating it.
    pub fn quote(&self, input: &QuoteInput) -> AppResult<Quote> {
        pricing::quote(input)
    }

    /// Book an approved listing. The booking starts out pending.
    pub async fn create(
        &self,
        user: &user::Model,
        input: CreateBookingInput,
    ) -> AppResult<booking::Model> {
        input.validate()?;

        if input.start_date < Utc::now().date_naive() {
            return Err(AppError::invalid_field("startDate", "must not be in the past"));
        }

        let quote = pricing::quote(&input.quote_input())?;

        let listing = self
            .listings
            .snapshot(input.resource_type, input.resource_id)
            .await?;
        listing.ensure_bookable()?;

        let end = match input.resource_type {
            ListingKind::Hotel => input.end_date,
            ListingKind::Restaurant | ListingKind::Attraction => None,
        };
        ensure_available(&listing.availability, input.start_date, end)?;

        let model = booking::ActiveModel {
            user_id: Set(user.id),
            resource_type: Set(input.resource_type),
            resource_id: Set(input.resource_id),
            reference: Set(self.id_gen.booking_reference()),
            start_date: Set(input.start_date),
            end_date: Set(end),
            quantity: Set(input.quantity),
            guests: Set(input.guests),
            option: Set(input.option.to_lowercase()),
            amount_cents: Set(quote.amount_cents),
            currency: Set(quote.currency.to_string()),
            special_requests: Set(input.special_requests),
            contact_email: Set(input.contact_email.unwrap_or_else(|| user.email.clone())),
            status: Set(ModerationStatus::Pending),
            review_note: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        let booking = self.booking_repo.create(model).await?;
        tracing::info!(
            booking_id = booking.id,
            user_id = user.id,
            resource_type = %booking.resource_type,
            resource_id = booking.resource_id,
            amount_cents = booking.amount_cents,
            "Booking created"
        );

        self.notifier
            .booking_created(&BookingEvent::from(&booking))
            .await;

        Ok(booking)
    }

    /// Get a booking. Visible to the customer, the listing owner and admins.
    pub async fn get(&self, actor: &user::Model, id: i32) -> AppResult<booking::Model> {
        let booking = self.booking_repo.get_by_id(id).await?;

        if actor.is_admin() || booking.user_id == actor.id {
            return Ok(booking);
        }

        let listing = self
            .listings
            .snapshot(booking.resource_type, booking.resource_id)
            .await?;
        if listing.owner_id == actor.id {
            return Ok(booking);
        }

        Err(AppError::Forbidden(format!("Not allowed to view booking {id}")))
    }

    /// Bookings made by `user_id`.
    pub async fn list_mine(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<booking::Model>> {
        self.booking_repo.find_by_user(user_id, limit, offset).await
    }

    /// Bookings against listings owned by `owner_id`.
    pub async fn list_managed(
        &self,
        owner_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<booking::Model>> {
        let owned = self.listings.owned_ids(owner_id).await?;
        self.booking_repo
            .find_for_listings(&owned, limit, offset)
            .await
    }

    /// Moderation queue; `None` lists every booking.
    pub async fn list_by_status(
        &self,
        status: Option<ModerationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<booking::Model>> {
        self.booking_repo.find_by_status(status, limit, offset).await
    }

    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        self.booking_repo.count_by_status(status).await
    }

    /// Approve or reject a pending booking and tell the customer.
    pub async fn review(
        &self,
        actor: &user::Model,
        id: i32,
        target: ModerationStatus,
        note: Option<String>,
    ) -> AppResult<booking::Model> {
        let booking = self.booking_repo.get_by_id(id).await?;
        check_review(&booking, target, actor)?;

        let updated = self
            .booking_repo
            .transition_status(id, booking.status, target, Some(actor.id), note)
            .await?;

        tracing::info!(
            booking_id = id,
            status = %target,
            reviewer_id = actor.id,
            "Booking reviewed"
        );

        self.notifier
            .status_changed(&BookingEvent::from(&updated))
            .await;

        Ok(updated)
    }

    /// Cancel an approved booking and refund its payments.
    ///
    /// The customer is only told once both writes have committed.
    pub async fn cancel(&self, actor: &user::Model, id: i32) -> AppResult<booking::Model> {
        let booking = self.booking_repo.get_by_id(id).await?;
        check_cancellation(&booking, actor)?;

        let reviewer = actor.is_admin().then_some(actor.id);
        let (updated, refunded) = self.booking_repo.cancel_with_refund(id, reviewer).await?;

        tracing::info!(
            booking_id = id,
            actor_id = actor.id,
            refunded_payments = refunded,
            "Booking cancelled"
        );

        self.notifier
            .status_changed(&BookingEvent::from(&updated))
            .await;

        Ok(updated)
    }
}
