//! Payment repository.

use std::sync::Arc;

use crate::entities::{
    Booking, FlightBooking, ModerationStatus, Payment,
    payment::{self, PaymentStatus, PaymentTarget},
};
use chrono::Utc;
use voyage_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionError, TransactionTrait, sea_query::Expr,
};

/// Payment repository for database operations.
#[derive(Clone)]
pub struct PaymentRepository {
    db: Arc<DatabaseConnection>,
}

impl PaymentRepository {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a payment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<payment::Model> {
        Payment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Payment {id} not found")))
    }

    /// Payments made by a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<payment::Model>> {
        Payment::find()
            .filter(payment::Column::UserId.eq(user_id))
            .order_by_desc(payment::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All payments, newest first.
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<payment::Model>> {
        Payment::find()
            .order_by_desc(payment::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a payment if its booking is still approved and unpaid.
    ///
    /// The booking row stays locked until the payment is written, so a
    /// cancellation either runs first and refuses the payment, or waits and
    /// refunds it.
    pub async fn create_for_approved(
        &self,
        model: payment::ActiveModel,
        booking_type: PaymentTarget,
        booking_id: i32,
    ) -> AppResult<payment::Model> {
        self.db
            .transaction::<_, payment::Model, AppError>(|txn| {
                Box::pin(async move {
                    let status = locked_status(txn, booking_type, booking_id)
                        .await
                        .map_err(db_error)?
                        .ok_or_else(|| {
                            AppError::NotFound(format!("Booking {booking_id} not found"))
                        })?;
                    if status != ModerationStatus::Approved {
                        return Err(AppError::StateConflict(format!(
                            "Booking {booking_id} is {status} and cannot be paid"
                        )));
                    }

                    let paid = Payment::find()
                        .filter(payment::Column::BookingType.eq(booking_type))
                        .filter(payment::Column::BookingId.eq(booking_id))
                        .filter(payment::Column::Status.eq(PaymentStatus::Completed))
                        .one(txn)
                        .await
                        .map_err(db_error)?;
                    if paid.is_some() {
                        return Err(AppError::Conflict("Booking is already paid".to_string()));
                    }

                    model.insert(txn).await.map_err(db_error)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => db_error(e),
                TransactionError::Transaction(e) => e,
            })
    }
}

fn db_error(e: DbErr) -> AppError {
    AppError::Database(e.to_string())
}

/// Status of the booking a payment settles, locking its row.
async fn locked_status<C: ConnectionTrait>(
    conn: &C,
    booking_type: PaymentTarget,
    booking_id: i32,
) -> Result<Option<ModerationStatus>, DbErr> {
    Ok(match booking_type {
        PaymentTarget::Booking => Booking::find_by_id(booking_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .map(|b| b.status),
        PaymentTarget::FlightBooking => FlightBooking::find_by_id(booking_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .map(|f| f.status),
    })
}

/// Mark the completed payments of a booking as refunded.
pub(crate) async fn refund_completed<C: ConnectionTrait>(
    conn: &C,
    booking_type: PaymentTarget,
    booking_id: i32,
) -> Result<u64, DbErr> {
    let result = Payment::update_many()
        .col_expr(payment::Column::Status, Expr::value(PaymentStatus::Refunded))
        .col_expr(payment::Column::RefundedAt, Expr::value(Utc::now()))
        .filter(payment::Column::BookingType.eq(booking_type))
        .filter(payment::Column::BookingId.eq(booking_id))
        .filter(payment::Column::Status.eq(PaymentStatus::Completed))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}
