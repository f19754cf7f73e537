//! Google Places text search proxy.

use serde::{Deserialize, Serialize};
use validator::Validate;
use voyage_common::{AppError, AppResult, config::GooglePlacesConfig};

/// Search parameters.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSearchQuery {
    #[validate(length(min = 1, max = 256))]
    pub query: String,
    /// Appended to the query as "in <city>".
    #[validate(length(min = 1, max = 128))]
    pub city: Option<String>,
    /// Google place type, e.g. `restaurant` or `lodging`.
    #[validate(length(min = 1, max = 64))]
    #[serde(rename = "type")]
    pub place_type: Option<String>,
}

/// A place returned by the search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub lat: f64,
    pub lng: f64,
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: String,
    name: String,
    formatted_address: Option<String>,
    rating: Option<f64>,
    geometry: RawGeometry,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: RawLocation,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    lat: f64,
    lng: f64,
}

impl From<RawPlace> for Place {
    fn from(raw: RawPlace) -> Self {
        Self {
            place_id: raw.place_id,
            name: raw.name,
            address: raw.formatted_address,
            rating: raw.rating,
            lat: raw.geometry.location.lat,
            lng: raw.geometry.location.lng,
            types: raw.types,
        }
    }
}

fn into_places(response: TextSearchResponse) -> AppResult<Vec<Place>> {
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(response.results.into_iter().map(Place::from).collect()),
        status => Err(AppError::ExternalService(format!(
            "Google Places error: {status} {}",
            response.error_message.unwrap_or_default()
        ))),
    }
}

/// Google Places client.
#[derive(Clone)]
pub struct PlacesService {
    config: GooglePlacesConfig,
    http_client: reqwest::Client,
}

impl PlacesService {
    /// Create a new places client.
    #[must_use]
    pub fn new(config: GooglePlacesConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Text search.
    pub async fn search(&self, query: &PlaceSearchQuery) -> AppResult<Vec<Place>> {
        query.validate()?;

        let text = match &query.city {
            Some(city) => format!("{} in {city}", query.query),
            None => query.query.clone(),
        };
        let mut params = vec![("query", text), ("key", self.config.api_key.clone())];
        if let Some(place_type) = &query.place_type {
            params.push(("type", place_type.clone()));
        }

        let response = self
            .http_client
            .get(format!("{}/textsearch/json", self.config.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Places request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalService(format!(
                "Places API error: {status}"
            )));
        }

        let body: TextSearchResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse Places response: {e}"))
        })?;

        into_places(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_results_mapped() {
        let response: TextSearchResponse = serde_json::from_value(json!({
            "status": "OK",
            "results": [{
                "place_id": "ChIJ1",
                "name": "Time Out Market",
                "formatted_address": "Av. 24 de Julho 49, Lisboa",
                "rating": 4.5,
                "geometry": { "location": { "lat": 38.7069, "lng": -9.1459 } },
                "types": ["food", "point_of_interest"]
            }]
        }))
        .unwrap();

        let places = into_places(response).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].place_id, "ChIJ1");
        assert_eq!(places[0].rating, Some(4.5));
    }

    #[test]
    fn test_zero_results_is_empty() {
        let response: TextSearchResponse =
            serde_json::from_value(json!({ "status": "ZERO_RESULTS", "results": [] })).unwrap();
        assert!(into_places(response).unwrap().is_empty());
    }

    #[test]
    fn test_denied_is_error() {
        let response: TextSearchResponse = serde_json::from_value(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }))
        .unwrap();
        assert!(matches!(
            into_places(response),
            Err(AppError::ExternalService(_))
        ));
    }
}
