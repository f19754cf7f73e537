//! Payment service.
//!
//! Payments are recorded against approved bookings. No card processing
//! happens here; the transaction reference is generated locally.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use voyage_common::{AppError, AppResult, IdGenerator};
use voyage_db::entities::{
    ModerationStatus,
    payment::{self, PaymentMethod, PaymentStatus, PaymentTarget},
    user,
};
use voyage_db::repositories::{BookingRepository, FlightBookingRepository, PaymentRepository};

/// Input for paying a booking.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentInput {
    pub booking_type: PaymentTarget,
    pub booking_id: i32,
    pub method: PaymentMethod,
}

/// What a payment needs to know about the booking it settles.
struct Payable {
    user_id: i32,
    status: ModerationStatus,
    amount_cents: i64,
    currency: String,
}

/// Service for booking payments.
#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    booking_repo: BookingRepository,
    flight_repo: FlightBookingRepository,
    id_gen: IdGenerator,
}

impl PaymentService {
    /// Create a new payment service.
    #[must_use]
    pub const fn new(
        payment_repo: PaymentRepository,
        booking_repo: BookingRepository,
        flight_repo: FlightBookingRepository,
    ) -> Self {
        Self {
            payment_repo,
            booking_repo,
            flight_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn payable(&self, target: PaymentTarget, id: i32) -> AppResult<Payable> {
        Ok(match target {
            PaymentTarget::Booking => {
                let b = self.booking_repo.get_by_id(id).await?;
                Payable {
                    user_id: b.user_id,
                    status: b.status,
                    amount_cents: b.amount_cents,
                    currency: b.currency,
                }
            }
            PaymentTarget::FlightBooking => {
                let f = self.flight_repo.get_by_id(id).await?;
                Payable {
                    user_id: f.user_id,
                    status: f.status,
                    amount_cents: f.amount_cents,
                    currency: f.currency,
                }
            }
        })
    }

    /// Pay for one of the caller's approved bookings.
    ///
    /// Status and earlier payments are checked again under the booking's row
    /// lock when the payment is written.
    pub async fn create(
        &self,
        user: &user::Model,
        input: CreatePaymentInput,
    ) -> AppResult<payment::Model> {
        let payable = self.payable(input.booking_type, input.booking_id).await?;

        if payable.user_id != user.id {
            return Err(AppError::Forbidden(
                "Only the customer can pay for a booking".to_string(),
            ));
        }
        if payable.status != ModerationStatus::Approved {
            return Err(AppError::StateConflict(format!(
                "Booking {} is {} and cannot be paid",
                input.booking_id, payable.status
            )));
        }

        let model = payment::ActiveModel {
            user_id: Set(user.id),
            booking_type: Set(input.booking_type),
            booking_id: Set(input.booking_id),
            amount_cents: Set(payable.amount_cents),
            currency: Set(payable.currency),
            method: Set(input.method),
            transaction_ref: Set(self.id_gen.transaction_ref()),
            status: Set(PaymentStatus::Completed),
            created_at: Set(Utc::now()),
            refunded_at: Set(None),
            ..Default::default()
        };

        let payment = self
            .payment_repo
            .create_for_approved(model, input.booking_type, input.booking_id)
            .await?;
        tracing::info!(
            payment_id = payment.id,
            booking_type = ?payment.booking_type,
            booking_id = payment.booking_id,
            amount_cents = payment.amount_cents,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Get a payment made by `actor` (admins see all).
    pub async fn get(&self, actor: &user::Model, id: i32) -> AppResult<payment::Model> {
        let payment = self.payment_repo.get_by_id(id).await?;
        if payment.user_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden(format!(
                "Not allowed to view payment {id}"
            )));
        }
        Ok(payment)
    }

    pub async fn list_mine(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<payment::Model>> {
        self.payment_repo.find_by_user(user_id, limit, offset).await
    }

    /// Every payment (admin).
    pub async fn list_all(&self, limit: u64, offset: u64) -> AppResult<Vec<payment::Model>> {
        self.payment_repo.find_all(limit, offset).await
    }
}
