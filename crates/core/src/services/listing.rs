//! Lookups and input helpers shared by the hotel, restaurant and attraction
//! services.

use sea_orm::prelude::Json;
use serde_json::Value;
use url::Url;
use voyage_common::{AppError, AppResult};
use voyage_db::entities::{ListingKind, ModerationStatus};
use voyage_db::repositories::{AttractionRepository, HotelRepository, RestaurantRepository};

/// Maximum number of images per listing.
pub const MAX_IMAGES: usize = 16;

/// The parts of a listing that bookings and favorites care about.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    pub kind: ListingKind,
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub status: ModerationStatus,
    pub availability: Json,
}

impl ListingSnapshot {
    /// Fail unless the listing has been approved.
    pub fn ensure_bookable(&self) -> AppResult<()> {
        if self.status == ModerationStatus::Approved {
            Ok(())
        } else {
            Err(AppError::StateConflict(format!(
                "{} {} is not open ({})",
                self.kind, self.id, self.status
            )))
        }
    }
}

/// Read access to every listing kind.
#[derive(Clone)]
pub struct ListingDirectory {
    hotels: HotelRepository,
    restaurants: RestaurantRepository,
    attractions: AttractionRepository,
}

impl ListingDirectory {
    /// Create a new listing directory.
    #[must_use]
    pub const fn new(
        hotels: HotelRepository,
        restaurants: RestaurantRepository,
        attractions: AttractionRepository,
    ) -> Self {
        Self {
            hotels,
            restaurants,
            attractions,
        }
    }

    /// Load a listing of any kind.
    pub async fn snapshot(&self, kind: ListingKind, id: i32) -> AppResult<ListingSnapshot> {
        let snapshot = match kind {
            ListingKind::Hotel => {
                let h = self.hotels.get_by_id(id).await?;
                ListingSnapshot {
                    kind,
                    id,
                    owner_id: h.owner_id,
                    name: h.name,
                    status: h.status,
                    availability: h.availability,
                }
            }
            ListingKind::Restaurant => {
                let r = self.restaurants.get_by_id(id).await?;
                ListingSnapshot {
                    kind,
                    id,
                    owner_id: r.owner_id,
                    name: r.name,
                    status: r.status,
                    availability: r.availability,
                }
            }
            ListingKind::Attraction => {
                let a = self.attractions.get_by_id(id).await?;
                ListingSnapshot {
                    kind,
                    id,
                    owner_id: a.owner_id,
                    name: a.name,
                    status: a.status,
                    availability: a.availability,
                }
            }
        };

        Ok(snapshot)
    }

    /// IDs of every listing a user owns, grouped by kind.
    pub async fn owned_ids(&self, owner_id: i32) -> AppResult<Vec<(ListingKind, Vec<i32>)>> {
        Ok(vec![
            (
                ListingKind::Hotel,
                self.hotels.find_ids_by_owner(owner_id).await?,
            ),
            (
                ListingKind::Restaurant,
                self.restaurants.find_ids_by_owner(owner_id).await?,
            ),
            (
                ListingKind::Attraction,
                self.attractions.find_ids_by_owner(owner_id).await?,
            ),
        ])
    }
}

/// Check image URLs and store them as a JSON array.
pub fn images_json(images: Vec<String>) -> AppResult<Json> {
    if images.len() > MAX_IMAGES {
        return Err(AppError::invalid_field(
            "images",
            format!("at most {MAX_IMAGES} images"),
        ));
    }

    for image in &images {
        let valid = Url::parse(image).is_ok_and(|u| matches!(u.scheme(), "http" | "https"));
        if !valid {
            return Err(AppError::invalid_field(
                "images",
                format!("'{image}' is not an http(s) URL"),
            ));
        }
    }

    Ok(Value::from(images))
}

/// Trim, drop empty entries and store as a JSON array.
#[must_use]
pub fn tags_json(tags: Vec<String>) -> Json {
    Value::from(
        tags.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_images_json_rejects_non_http() {
        let err = images_json(vec!["ftp://example.com/a.png".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let ok = images_json(vec!["https://cdn.example.com/a.png".to_string()]).unwrap();
        assert_eq!(ok, json!(["https://cdn.example.com/a.png"]));
    }

    #[test]
    fn test_tags_json_trims() {
        assert_eq!(
            tags_json(vec![" wifi ".to_string(), String::new(), "pool".to_string()]),
            json!(["wifi", "pool"])
        );
    }

    #[tokio::test]
    async fn test_snapshot_pending_is_not_bookable() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[fixtures::restaurant(
                    3,
                    1,
                    ModerationStatus::Pending,
                )]])
                .into_connection(),
        );
        let directory = ListingDirectory::new(
            HotelRepository::new(Arc::clone(&db)),
            RestaurantRepository::new(Arc::clone(&db)),
            AttractionRepository::new(db),
        );

        let snapshot = directory
            .snapshot(ListingKind::Restaurant, 3)
            .await
            .unwrap();

        assert_eq!(snapshot.owner_id, 1);
        assert!(matches!(
            snapshot.ensure_bookable(),
            Err(AppError::StateConflict(_))
        ));
    }
}
