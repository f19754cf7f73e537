//! Approval workflow shared by listings and bookings.
//!
//! Hotels, restaurants, attractions, bookings and flight bookings all start
//! out `Pending` and wait for an administrator to approve or reject them.
//! Every service goes through the checks in this module instead of
//! comparing statuses itself.

use std::fmt;
use std::str::FromStr;

use voyage_common::{AppError, AppResult};
use voyage_db::entities::{
    ModerationStatus, attraction, booking, flight_booking, hotel, restaurant,
    user::{self, Role},
};

/// Everything that goes through moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Hotel,
    Restaurant,
    Attraction,
    Booking,
    FlightBooking,
}

impl ResourceKind {
    /// Bookings can additionally be cancelled once approved.
    #[must_use]
    pub const fn is_booking(self) -> bool {
        matches!(self, Self::Booking | Self::FlightBooking)
    }

    /// Human-readable name used in messages and emails.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hotel => "Hotel",
            Self::Restaurant => "Restaurant",
            Self::Attraction => "Attraction",
            Self::Booking => "Booking",
            Self::FlightBooking => "Flight booking",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    /// Parses the plural path segment used by the admin routes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotels" => Ok(Self::Hotel),
            "restaurants" => Ok(Self::Restaurant),
            "attractions" => Ok(Self::Attraction),
            "bookings" => Ok(Self::Booking),
            "flight-bookings" => Ok(Self::FlightBooking),
            other => Err(AppError::NotFound(format!("Unknown resource kind: {other}"))),
        }
    }
}

/// A record subject to moderation.
pub trait Moderated {
    /// Which kind of record this is.
    const KIND: ResourceKind;

    /// Primary key.
    fn id(&self) -> i32;

    /// Submitter.
    fn owner_id(&self) -> i32;

    /// Current moderation state.
    fn status(&self) -> ModerationStatus;
}

macro_rules! impl_moderated {
    ($model:ty, $kind:expr, $owner:ident) => {
        impl Moderated for $model {
            const KIND: ResourceKind = $kind;

            fn id(&self) -> i32 {
                self.id
            }

            fn owner_id(&self) -> i32 {
                self.$owner
            }

            fn status(&self) -> ModerationStatus {
                self.status
            }
        }
    };
}

impl_moderated!(hotel::Model, ResourceKind::Hotel, owner_id);
impl_moderated!(restaurant::Model, ResourceKind::Restaurant, owner_id);
impl_moderated!(attraction::Model, ResourceKind::Attraction, owner_id);
impl_moderated!(booking::Model, ResourceKind::Booking, user_id);
impl_moderated!(flight_booking::Model, ResourceKind::FlightBooking, user_id);

/// Whether an actor with `role` may decide on a record in `current`.
///
/// Only administrators decide, and only on pending records.
#[must_use]
pub fn can_transition(current: ModerationStatus, role: Role) -> bool {
    current == ModerationStatus::Pending && role == Role::Admin
}

/// Validate an approve/reject decision.
///
/// The role is checked before the state so that non-admins always get 403.
pub fn check_review<M: Moderated>(
    entity: &M,
    target: ModerationStatus,
    actor: &user::Model,
) -> AppResult<()> {
    if !matches!(
        target,
        ModerationStatus::Approved | ModerationStatus::Rejected
    ) {
        return Err(AppError::invalid_field(
            "status",
            "must be approved or rejected",
        ));
    }

    if actor.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only administrators can review submissions".to_string(),
        ));
    }

    if !can_transition(entity.status(), actor.role) {
        return Err(AppError::StateConflict(format!(
            "{} {} is already {}",
            M::KIND,
            entity.id(),
            entity.status()
        )));
    }

    Ok(())
}

/// Validate cancelling an approved booking.
pub fn check_cancellation<M: Moderated>(entity: &M, actor: &user::Model) -> AppResult<()> {
    if !M::KIND.is_booking() {
        return Err(AppError::BadRequest(format!(
            "{} records cannot be cancelled",
            M::KIND
        )));
    }

    ensure_owner_or_admin(entity, actor)?;

    if entity.status() != ModerationStatus::Approved {
        return Err(AppError::StateConflict(format!(
            "Only approved bookings can be cancelled; {} {} is {}",
            M::KIND,
            entity.id(),
            entity.status()
        )));
    }

    Ok(())
}

/// Status a listing takes after an edit.
///
/// Owner edits send the listing back into the review queue; admin edits
/// leave the status alone.
#[must_use]
pub fn status_after_edit(current: ModerationStatus, actor_role: Role) -> ModerationStatus {
    if actor_role == Role::Admin {
        current
    } else {
        ModerationStatus::Pending
    }
}

/// Whether the record shows up in anonymous listings.
#[must_use]
pub fn is_publicly_visible(status: ModerationStatus) -> bool {
    status == ModerationStatus::Approved
}

/// Whether `viewer` may see the record at all.
#[must_use]
pub fn can_view<M: Moderated>(entity: &M, viewer: Option<&user::Model>) -> bool {
    if !M::KIND.is_booking() && is_publicly_visible(entity.status()) {
        return true;
    }

    viewer.is_some_and(|v| v.is_admin() || v.id == entity.owner_id())
}

/// Reject anyone but the submitter or an administrator.
pub fn ensure_owner_or_admin<M: Moderated>(entity: &M, actor: &user::Model) -> AppResult<()> {
    if actor.is_admin() || actor.id == entity.owner_id() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Not allowed to modify {} {}",
            M::KIND,
            entity.id()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use serde_json::json;
    use voyage_db::entities::ListingKind;

    fn actor(id: i32, role: Role) -> user::Model {
        user::Model {
            id,
            firebase_uid: format!("uid-{id}"),
            email: format!("user{id}@example.com"),
            display_name: None,
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
            id: 1,
            owner_id: 10,
            name: "Harbour View".to_string(),
            description: String::new(),
            city: "Lisbon".to_string(),
            address: String::new(),
            price_per_night_cents: 12_000,
            star_rating: 3,
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

    fn booking(status: ModerationStatus) -> booking::Model {
        booking::Model {
            id: 2,
            user_id: 20,
            resource_type: ListingKind::Attraction,
            resource_id: 1,
            reference: "VY-00000001".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            end_date: None,
            quantity: 2,
            guests: 2,
            option: "adult".to_string(),
            amount_cents: 6_000,
            currency: "EUR".to_string(),
            special_requests: None,
            contact_email: "visitor@example.com".to_string(),
            status,
            review_note: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_can_transition_only_pending_admin() {
        assert!(can_transition(ModerationStatus::Pending, Role::Admin));
        assert!(!can_transition(ModerationStatus::Pending, Role::User));
        assert!(!can_transition(
            ModerationStatus::Pending,
            Role::BusinessAdministrator
        ));
        assert!(!can_transition(ModerationStatus::Approved, Role::Admin));
        assert!(!can_transition(ModerationStatus::Rejected, Role::Admin));
        assert!(!can_transition(ModerationStatus::Cancelled, Role::Admin));
    }

    #[test]
    fn test_check_review_non_admin_is_forbidden() {
        let err = check_review(
            &hotel(ModerationStatus::Approved),
            ModerationStatus::Approved,
            &actor(10, Role::BusinessAdministrator),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_check_review_already_reviewed_is_conflict() {
        let err = check_review(
            &hotel(ModerationStatus::Rejected),
            ModerationStatus::Approved,
            &actor(1, Role::Admin),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::StateConflict(_)));
    }

    #[test]
    fn test_check_review_target_must_be_decision() {
        let err = check_review(
            &booking(ModerationStatus::Pending),
            ModerationStatus::Cancelled,
            &actor(1, Role::Admin),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(
            check_review(
                &booking(ModerationStatus::Pending),
                ModerationStatus::Rejected,
                &actor(1, Role::Admin)
            )
            .is_ok()
        );
    }

    #[test]
    fn test_cancellation_rules() {
        let owner = actor(20, Role::User);
        let stranger = actor(21, Role::User);

        assert!(check_cancellation(&booking(ModerationStatus::Approved), &owner).is_ok());
        assert!(matches!(
            check_cancellation(&booking(ModerationStatus::Approved), &stranger),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            check_cancellation(&booking(ModerationStatus::Pending), &owner),
            Err(AppError::StateConflict(_))
        ));
        assert!(matches!(
            check_cancellation(&hotel(ModerationStatus::Approved), &actor(1, Role::Admin)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_status_after_edit() {
        assert_eq!(
            status_after_edit(ModerationStatus::Approved, Role::BusinessAdministrator),
            ModerationStatus::Pending
        );
        assert_eq!(
            status_after_edit(ModerationStatus::Rejected, Role::User),
            ModerationStatus::Pending
        );
        assert_eq!(
            status_after_edit(ModerationStatus::Approved, Role::Admin),
            ModerationStatus::Approved
        );
    }

    #[test]
    fn test_visibility() {
        let owner = actor(10, Role::BusinessAdministrator);
        let other = actor(11, Role::User);
        let admin = actor(1, Role::Admin);
        let pending = hotel(ModerationStatus::Pending);

        assert!(can_view(&hotel(ModerationStatus::Approved), None));
        assert!(!can_view(&pending, None));
        assert!(!can_view(&pending, Some(&other)));
        assert!(can_view(&pending, Some(&owner)));
        assert!(can_view(&pending, Some(&admin)));

        // Approved bookings are still private.
        assert!(!can_view(&booking(ModerationStatus::Approved), Some(&other)));
    }

    #[test]
    fn test_resource_kind_from_path() {
        assert_eq!(
            "flight-bookings".parse::<ResourceKind>().unwrap(),
            ResourceKind::FlightBooking
        );
        assert!("notes".parse::<ResourceKind>().is_err());
    }
}
