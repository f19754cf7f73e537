//! Flight booking repository.

use std::sync::Arc;

use super::payment::refund_completed;
use crate::entities::{FlightBooking, ModerationStatus, flight_booking, payment::PaymentTarget};
use chrono::Utc;
use voyage_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait, UpdateMany, sea_query::Expr,
};

/// Flight booking repository for database operations.
#[derive(Clone)]
pub struct FlightBookingRepository {
    db: Arc<DatabaseConnection>,
}

impl FlightBookingRepository {
    /// Create a new flight booking repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a flight booking by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<flight_booking::Model>> {
        FlightBooking::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a flight booking by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<flight_booking::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Flight booking {id} not found")))
    }

    /// Flight bookings made by a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<flight_booking::Model>> {
        FlightBooking::find()
            .filter(flight_booking::Column::UserId.eq(user_id))
            .order_by_desc(flight_booking::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Flight bookings in a moderation state, oldest first. `None` lists everything.
    pub async fn find_by_status(
        &self,
        status: Option<ModerationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<flight_booking::Model>> {
        let mut query = FlightBooking::find().order_by_asc(flight_booking::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(flight_booking::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count flight bookings in a moderation state.
    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        FlightBooking::find()
            .filter(flight_booking::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new flight booking.
    pub async fn create(
        &self,
        model: flight_booking::ActiveModel,
    ) -> AppResult<flight_booking::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn status_update(
        to: ModerationStatus,
        reviewer_id: Option<i32>,
        note: Option<String>,
    ) -> UpdateMany<FlightBooking> {
        let now = Utc::now();
        let mut update = FlightBooking::update_many()
            .col_expr(flight_booking::Column::Status, Expr::value(to))
            .col_expr(flight_booking::Column::UpdatedAt, Expr::value(now));

        if let Some(reviewer) = reviewer_id {
            update = update
                .col_expr(flight_booking::Column::ReviewedBy, Expr::value(reviewer))
                .col_expr(flight_booking::Column::ReviewNote, Expr::value(note))
                .col_expr(flight_booking::Column::ReviewedAt, Expr::value(now));
        }
        update
    }

    /// Move a flight booking from `from` to `to`.
    ///
    /// A reviewer is recorded for admin decisions; cancellations pass `None`.
    /// Nothing is written if the row has left `from` in the meantime.
    pub async fn transition_status(
        &self,
        id: i32,
        from: ModerationStatus,
        to: ModerationStatus,
        reviewer_id: Option<i32>,
        note: Option<String>,
    ) -> AppResult<flight_booking::Model> {
        let result = Self::status_update(to, reviewer_id, note)
            .filter(flight_booking::Column::Id.eq(id))
            .filter(flight_booking::Column::Status.eq(from))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::StateConflict(format!(
                "Flight booking {id} is no longer {from}"
            )));
        }

        self.get_by_id(id).await
    }

    /// Cancel an approved flight booking and refund its completed payments.
    ///
    /// Both writes share one transaction; a failed refund leaves the
    /// flight booking approved. Returns the cancelled row and the number of
    /// refunded payments.
    pub async fn cancel_with_refund(
        &self,
        id: i32,
        reviewer_id: Option<i32>,
    ) -> AppResult<(flight_booking::Model, u64)> {
        let refunded = self
            .db
            .transaction::<_, Option<u64>, DbErr>(|txn| {
                Box::pin(async move {
                    let result = Self::status_update(ModerationStatus::Cancelled, reviewer_id, None)
                        .filter(flight_booking::Column::Id.eq(id))
                        .filter(flight_booking::Column::Status.eq(ModerationStatus::Approved))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(None);
                    }
                    refund_completed(txn, PaymentTarget::FlightBooking, id)
                        .await
                        .map(Some)
                })
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(refunded) = refunded else {
            return Err(AppError::StateConflict(format!(
                "Flight booking {id} is no longer {}",
                ModerationStatus::Approved
            )));
        };

        Ok((self.get_by_id(id).await?, refunded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    fn create_test_flight_booking(id: i32, status: ModerationStatus) -> flight_booking::Model {
        let departure = Utc.with_ymd_and_hms(2026, 7, 14, 9, 30, 0).unwrap();
        flight_booking::Model {
            id,
            user_id: 5,
            reference: "VY-FLT00001".to_string(),
            offer_id: Some("1".to_string()),
            airline: "TP".to_string(),
            flight_number: "TP1350".to_string(),
            origin: "LIS".to_string(),
            destination: "LHR".to_string(),
            departure_at: departure,
            arrival_at: departure + Duration::hours(2),
            cabin_class: "economy".to_string(),
            passengers: 2,
            passenger_names: json!(["Ana Silva", "Rui Silva"]),
            base_fare_cents: 9_000,
            amount_cents: 18_000,
            currency: "EUR".to_string(),
            contact_email: "ana@example.com".to_string(),
            status,
            review_note: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_status() {
        let pending = create_test_flight_booking(1, ModerationStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[pending]])
                .into_connection(),
        );

        let repo = FlightBookingRepository::new(db);
        let result = repo
            .find_by_status(Some(ModerationStatus::Pending), 50, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].origin, "LIS");
    }

    #[tokio::test]
    async fn test_review_records_reviewer() {
        let mut approved = create_test_flight_booking(1, ModerationStatus::Approved);
        approved.reviewed_by = Some(9);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[approved]])
                .into_connection(),
        );

        let repo = FlightBookingRepository::new(db);
        let result = repo
            .transition_status(
                1,
                ModerationStatus::Pending,
                ModerationStatus::Approved,
                Some(9),
                None,
            )
            .await
            .unwrap();

        assert_eq!(result.reviewed_by, Some(9));
    }

    #[tokio::test]
    async fn test_cancel_rolls_back_on_refund_failure() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_exec_errors([DbErr::Custom("deadlock".to_string())])
                .into_connection(),
        );

        let repo = FlightBookingRepository::new(db);
        let result = repo.cancel_with_refund(1, None).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
