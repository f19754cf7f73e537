//! Itinerary service.

use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use voyage_common::{AppError, AppResult};
use voyage_db::entities::{itinerary, user};
use voyage_db::repositories::ItineraryRepository;

/// Kind of entry in a day plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Hotel,
    Restaurant,
    Attraction,
    Flight,
    Activity,
    Note,
}

/// One entry of a day plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    /// 1-based day of the trip.
    #[validate(range(min = 1))]
    pub day: u32,
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    pub kind: ItemKind,
    /// Listing or booking this entry points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2048))]
    pub notes: Option<String>,
}

/// Input for creating an itinerary.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItineraryInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(min = 1, max = 128))]
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 8192))]
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200), nested)]
    pub items: Vec<ItineraryItem>,
    #[serde(default)]
    pub is_public: bool,
}

/// Input for updating an itinerary.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItineraryInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// An empty string clears the notes.
    #[validate(length(max = 8192))]
    pub notes: Option<String>,
    #[validate(length(max = 200), nested)]
    pub items: Option<Vec<ItineraryItem>>,
    pub is_public: Option<bool>,
}

/// Check date order and that every item falls inside the trip.
fn check_plan(start: NaiveDate, end: NaiveDate, items: &[ItineraryItem]) -> AppResult<()> {
    if end < start {
        return Err(AppError::invalid_field(
            "endDate",
            "must not be before startDate",
        ));
    }

    let days = (end - start).num_days() + 1;
    if let Some(item) = items.iter().find(|i| i64::from(i.day) > days) {
        return Err(AppError::invalid_field(
            "items",
            format!("day {} is outside the {days}-day trip", item.day),
        ));
    }

    Ok(())
}

fn sorted_items(mut items: Vec<ItineraryItem>) -> AppResult<serde_json::Value> {
    // Untimed entries go first within a day.
    items.sort_by_key(|i| (i.day, i.time));
    serde_json::to_value(items).map_err(|e| AppError::Internal(e.to_string()))
}

/// Service for trip itineraries.
#[derive(Clone)]
pub struct ItineraryService {
    itinerary_repo: ItineraryRepository,
}

impl ItineraryService {
    /// Create a new itinerary service.
    #[must_use]
    pub const fn new(itinerary_repo: ItineraryRepository) -> Self {
        Self { itinerary_repo }
    }

    /// Get an itinerary. Private ones are only visible to their owner.
    pub async fn get(
        &self,
        id: i32,
        viewer: Option<&user::Model>,
    ) -> AppResult<itinerary::Model> {
        let itinerary = self.itinerary_repo.get_by_id(id).await?;

        let allowed = itinerary.is_public
            || viewer.is_some_and(|v| v.id == itinerary.user_id || v.is_admin());
        if !allowed {
            return Err(AppError::NotFound(format!("Itinerary {id} not found")));
        }

        Ok(itinerary)
    }

    pub async fn list_mine(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<itinerary::Model>> {
        self.itinerary_repo.find_by_user(user_id, limit, offset).await
    }

    /// Shared itineraries, optionally filtered by destination.
    pub async fn list_public(
        &self,
        destination: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<itinerary::Model>> {
        self.itinerary_repo
            .find_public(destination, limit, offset)
            .await
    }

    /// Create an itinerary.
    pub async fn create(
        &self,
        user: &user::Model,
        input: CreateItineraryInput,
    ) -> AppResult<itinerary::Model> {
        input.validate()?;
        check_plan(input.start_date, input.end_date, &input.items)?;

        let model = itinerary::ActiveModel {
            user_id: Set(user.id),
            title: Set(input.title),
            destination: Set(input.destination),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            notes: Set(input.notes),
            items: Set(sorted_items(input.items)?),
            is_public: Set(input.is_public),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };

        self.itinerary_repo.create(model).await
    }

    /// Update an itinerary owned by `user`.
    pub async fn update(
        &self,
        user: &user::Model,
        id: i32,
        input: UpdateItineraryInput,
    ) -> AppResult<itinerary::Model> {
        input.validate()?;

        let itinerary = self.owned(user, id).await?;

        let start = input.start_date.unwrap_or(itinerary.start_date);
        let end = input.end_date.unwrap_or(itinerary.end_date);
        let items = match input.items {
            Some(items) => items,
            None => serde_json::from_value(itinerary.items.clone())
                .map_err(|e| AppError::Internal(format!("Corrupt itinerary items: {e}")))?,
        };
        check_plan(start, end, &items)?;

        let mut active: itinerary::ActiveModel = itinerary.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(destination) = input.destination {
            active.destination = Set(destination);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes).filter(|n| !n.trim().is_empty()));
        }
        if let Some(is_public) = input.is_public {
            active.is_public = Set(is_public);
        }
        active.start_date = Set(start);
        active.end_date = Set(end);
        active.items = Set(sorted_items(items)?);
        active.updated_at = Set(Some(Utc::now()));

        self.itinerary_repo.update(active).await
    }

    /// Delete an itinerary owned by `user`.
    pub async fn delete(&self, user: &user::Model, id: i32) -> AppResult<()> {
        self.owned(user, id).await?;
        self.itinerary_repo.delete(id).await
    }

    async fn owned(&self, user: &user::Model, id: i32) -> AppResult<itinerary::Model> {
        let itinerary = self.itinerary_repo.get_by_id(id).await?;
        if itinerary.user_id != user.id {
            return Err(AppError::Forbidden(format!(
                "Itinerary {id} belongs to another user"
            )));
        }
        Ok(itinerary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;
    use voyage_db::entities::user::Role;

    fn item(day: u32, title: &str) -> ItineraryItem {
        ItineraryItem {
            day,
            title: title.to_string(),
            kind: ItemKind::Activity,
            reference_id: None,
            time: None,
            notes: None,
        }
    }

    fn stored(id: i32, user_id: i32, is_public: bool) -> itinerary::Model {
        itinerary::Model {
            id,
            user_id,
            title: "Lisbon long weekend".to_string(),
            destination: "Lisbon".to_string(),
            start_date: fixtures::date(2030, 5, 1),
            end_date: fixtures::date(2030, 5, 3),
            notes: None,
            items: json!([{ "day": 1, "title": "Tram 28", "kind": "activity" }]),
            is_public,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_check_plan_day_bounds() {
        let start = fixtures::date(2030, 5, 1);
        let end = fixtures::date(2030, 5, 3);

        assert!(check_plan(start, end, &[item(3, "Fado night")]).is_ok());
        assert!(check_plan(start, end, &[item(4, "Too late")]).is_err());
        assert!(check_plan(end, start, &[]).is_err());
        // Same-day trips are allowed.
        assert!(check_plan(start, start, &[item(1, "Day trip")]).is_ok());
    }

    #[test]
    fn test_items_sorted_by_day() {
        let value = sorted_items(vec![item(2, "Sintra"), item(1, "Belém")]).unwrap();
        assert_eq!(value[0]["title"], "Belém");
        assert_eq!(value[1]["day"], 2);
    }

    #[tokio::test]
    async fn test_create_itinerary() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                }])
                .append_query_results([[stored(1, 5, false)]])
                .into_connection(),
        );
        let service = ItineraryService::new(ItineraryRepository::new(db));

        let input = CreateItineraryInput {
            title: "Lisbon long weekend".to_string(),
            destination: "Lisbon".to_string(),
            start_date: fixtures::date(2030, 5, 1),
            end_date: fixtures::date(2030, 5, 3),
            notes: None,
            items: vec![item(1, "Tram 28")],
            is_public: false,
        };
        let result = service
            .create(&fixtures::user(5, Role::User), input)
            .await
            .unwrap();

        assert_eq!(result.user_id, 5);
    }

    #[tokio::test]
    async fn test_private_itinerary_hidden() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[stored(1, 5, false)]])
                .into_connection(),
        );
        let service = ItineraryService::new(ItineraryRepository::new(db));

        let result = service.get(1, Some(&fixtures::user(6, Role::User))).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_shrinking_trip_checks_items() {
        let mut existing = stored(1, 5, true);
        existing.items = json!([{ "day": 3, "title": "Sintra", "kind": "activity" }]);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let service = ItineraryService::new(ItineraryRepository::new(db));

        let input = UpdateItineraryInput {
            end_date: Some(fixtures::date(2030, 5, 2)),
            ..Default::default()
        };
        let result = service
            .update(&fixtures::user(5, Role::User), 1, input)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[stored(1, 5, true)]])
                .into_connection(),
        );
        let service = ItineraryService::new(ItineraryRepository::new(db));

        let result = service.delete(&fixtures::user(6, Role::User), 1).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
