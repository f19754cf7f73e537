//! Booking repository.

use std::sync::Arc;

use super::payment::refund_completed;
use crate::entities::{Booking, ListingKind, ModerationStatus, booking, payment::PaymentTarget};
use chrono::Utc;
use voyage_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, UpdateMany,
    sea_query::Expr,
};

/// Booking repository for database operations.
#[derive(Clone)]
pub struct BookingRepository {
    db: Arc<DatabaseConnection>,
}

impl BookingRepository {
    /// Create a new booking repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<booking::Model>> {
        Booking::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a booking by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<booking::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {id} not found")))
    }

    /// Bookings made by a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<booking::Model>> {
        Booking::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bookings against any of the given listings, newest first.
    ///
    /// `listings` pairs a listing kind with the ids of that kind; kinds with
    /// no ids are skipped.
    pub async fn find_for_listings(
        &self,
        listings: &[(ListingKind, Vec<i32>)],
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<booking::Model>> {
        let mut condition = Condition::any();
        let mut any = false;
        for (kind, ids) in listings {
            if ids.is_empty() {
                continue;
            }
            any = true;
            condition = condition.add(
                Condition::all()
                    .add(booking::Column::ResourceType.eq(*kind))
                    .add(booking::Column::ResourceId.is_in(ids.clone())),
            );
        }

        if !any {
            return Ok(vec![]);
        }

        Booking::find()
            .filter(condition)
            .order_by_desc(booking::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bookings in a moderation state, oldest first. `None` lists everything.
    pub async fn find_by_status(
        &self,
        status: Option<ModerationStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<booking::Model>> {
        let mut query = Booking::find().order_by_asc(booking::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(booking::Column::Status.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count bookings in a moderation state.
    pub async fn count_by_status(&self, status: ModerationStatus) -> AppResult<u64> {
        Booking::find()
            .filter(booking::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new booking.
    pub async fn create(&self, model: booking::ActiveModel) -> AppResult<booking::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn status_update(
        to: ModerationStatus,
        reviewer_id: Option<i32>,
        note: Option<String>,
    ) -> UpdateMany<Booking> {
        let now = Utc::now();
        let mut update = Booking::update_many()
            .col_expr(booking::Column::Status, Expr::value(to))
            .col_expr(booking::Column::UpdatedAt, Expr::value(now));

        if let Some(reviewer) = reviewer_id {
            update = update
                .col_expr(booking::Column::ReviewedBy, Expr::value(reviewer))
                .col_expr(booking::Column::ReviewNote, Expr::value(note))
                .col_expr(booking::Column::ReviewedAt, Expr::value(now));
        }
        update
    }

    /// Move a booking from `from` to `to`.
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
    ) -> AppResult<booking::Model> {
        let result = Self::status_update(to, reviewer_id, note)
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::Status.eq(from))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::StateConflict(format!(
                "Booking {id} is no longer {from}"
            )));
        }

        self.get_by_id(id).await
    }

    /// Cancel an approved booking and refund its completed payments.
    ///
    /// Both writes share one transaction; a failed refund leaves the
    /// booking approved. Returns the cancelled row and the number of
    /// refunded payments.
    pub async fn cancel_with_refund(
        &self,
        id: i32,
        reviewer_id: Option<i32>,
    ) -> AppResult<(booking::Model, u64)> {
        let refunded = self
            .db
            .transaction::<_, Option<u64>, DbErr>(|txn| {
                Box::pin(async move {
                    let result = Self::status_update(ModerationStatus::Cancelled, reviewer_id, None)
                        .filter(booking::Column::Id.eq(id))
                        .filter(booking::Column::Status.eq(ModerationStatus::Approved))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(None);
                    }
                    refund_completed(txn, PaymentTarget::Booking, id)
                        .await
                        .map(Some)
                })
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(refunded) = refunded else {
            return Err(AppError::StateConflict(format!(
                "Booking {id} is no longer {}",
                ModerationStatus::Approved
            )));
        };

        Ok((self.get_by_id(id).await?, refunded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn create_test_booking(id: i32, user_id: i32, status: ModerationStatus) -> booking::Model {
        booking::Model {
            id,
            user_id,
            resource_type: ListingKind::Hotel,
            resource_id: 3,
            reference: format!("VY-TEST{id:04}"),
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 3),
            quantity: 1,
            guests: 2,
            option: "standard".to_string(),
            amount_cents: 24_000,
            currency: "EUR".to_string(),
            special_requests: None,
            contact_email: "guest@example.com".to_string(),
            status,
            review_note: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let b1 = create_test_booking(1, 5, ModerationStatus::Pending);
        let b2 = create_test_booking(2, 5, ModerationStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[b1, b2]])
                .into_connection(),
        );

        let repo = BookingRepository::new(db);
        let result = repo.find_by_user(5, 20, 0).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|b| b.user_id == 5));
    }

    #[tokio::test]
    async fn test_find_for_listings_without_ids_skips_query() {
        // No results scripted: any query would fail.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::MySql).into_connection());

        let repo = BookingRepository::new(db);
        let result = repo
            .find_for_listings(
                &[
                    (ListingKind::Hotel, vec![]),
                    (ListingKind::Restaurant, vec![]),
                ],
                20,
                0,
            )
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_transition() {
        let cancelled = create_test_booking(4, 5, ModerationStatus::Cancelled);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[cancelled]])
                .into_connection(),
        );

        let repo = BookingRepository::new(db);
        let result = repo
            .transition_status(
                4,
                ModerationStatus::Approved,
                ModerationStatus::Cancelled,
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(result.status, ModerationStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_with_refund() {
        let cancelled = create_test_booking(4, 5, ModerationStatus::Cancelled);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([exec(1), exec(1)])
                .append_query_results([[cancelled]])
                .into_connection(),
        );

        let repo = BookingRepository::new(db);
        let (booking, refunded) = repo.cancel_with_refund(4, None).await.unwrap();

        assert_eq!(booking.status, ModerationStatus::Cancelled);
        assert_eq!(refunded, 1);
    }

    #[tokio::test]
    async fn test_cancel_with_refund_surfaces_refund_failure() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([exec(1)])
                .append_exec_errors([DbErr::Custom("payments table locked".to_string())])
                .into_connection(),
        );

        let repo = BookingRepository::new(db);
        let result = repo.cancel_with_refund(4, None).await;

        assert!(matches!(
            result,
            Err(AppError::Database(ref m)) if m.contains("payments table locked")
        ));
    }

    #[tokio::test]
    async fn test_cancel_with_refund_lost_race() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([exec(0)])
                .into_connection(),
        );

        let repo = BookingRepository::new(db);
        let result = repo.cancel_with_refund(4, Some(9)).await;

        assert!(matches!(result, Err(AppError::StateConflict(_))));
    }
}
