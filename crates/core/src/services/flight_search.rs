//! Flight offer search backed by the Amadeus Self-Service API.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use validator::Validate;
use voyage_common::{AppError, AppResult, config::AmadeusConfig};

use super::flight_booking::AIRPORT_CODE;
use crate::pricing::{CURRENCY, CabinClass, parse_amount_cents};

/// Tokens are refreshed this long before Amadeus expires them.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Search parameters.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchQuery {
    #[validate(regex(path = *AIRPORT_CODE))]
    pub origin: String,
    #[validate(regex(path = *AIRPORT_CODE))]
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    #[serde(default = "default_adults")]
    #[validate(range(min = 1, max = 9))]
    pub adults: u32,
    pub cabin: Option<CabinClass>,
    #[validate(range(min = 1, max = 50))]
    pub max: Option<u32>,
}

const fn default_adults() -> u32 {
    1
}

/// A bookable offer, flattened to its first itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    /// Local time at the origin airport.
    pub departure_at: NaiveDateTime,
    /// Local time at the destination airport.
    pub arrival_at: NaiveDateTime,
    pub stops: usize,
    pub cabin: Option<String>,
    pub total_cents: i64,
    /// Share of the total per adult, suitable as a booking's base fare.
    pub price_per_passenger_cents: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct OffersResponse {
    #[serde(default)]
    data: Vec<RawOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOffer {
    id: String,
    itineraries: Vec<RawItinerary>,
    price: RawPrice,
    #[serde(default)]
    traveler_pricings: Vec<RawTravelerPricing>,
}

#[derive(Debug, Deserialize)]
struct RawItinerary {
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    departure: RawEndpoint,
    arrival: RawEndpoint,
    carrier_code: String,
    number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndpoint {
    iata_code: String,
    at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    currency: String,
    total: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTravelerPricing {
    #[serde(default)]
    fare_details_by_segment: Vec<RawFareDetails>,
}

#[derive(Debug, Deserialize)]
struct RawFareDetails {
    cabin: Option<String>,
}

fn to_offer(raw: RawOffer, adults: u32) -> AppResult<Option<FlightOffer>> {
    let Some(itinerary) = raw.itineraries.first() else {
        return Ok(None);
    };
    let (Some(first), Some(last)) = (itinerary.segments.first(), itinerary.segments.last()) else {
        return Ok(None);
    };

    let total_cents = parse_amount_cents(&raw.price.total)?;
    let cabin = raw
        .traveler_pricings
        .first()
        .and_then(|t| t.fare_details_by_segment.first())
        .and_then(|f| f.cabin.as_ref())
        .map(|c| c.to_lowercase());

    Ok(Some(FlightOffer {
        id: raw.id,
        airline: first.carrier_code.clone(),
        flight_number: format!("{}{}", first.carrier_code, first.number),
        origin: first.departure.iata_code.clone(),
        destination: last.arrival.iata_code.clone(),
        departure_at: first.departure.at,
        arrival_at: last.arrival.at,
        stops: itinerary.segments.len() - 1,
        cabin,
        total_cents,
        price_per_passenger_cents: total_cents / i64::from(adults.max(1)),
        currency: raw.price.currency,
    }))
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Amadeus flight search client.
#[derive(Clone)]
pub struct FlightSearchService {
    config: AmadeusConfig,
    http_client: reqwest::Client,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl FlightSearchService {
    /// Create a new flight search client.
    #[must_use]
    pub fn new(config: AmadeusConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    async fn access_token(&self) -> AppResult<String> {
        {
            let token = self.token.read().await;
            if let Some(cached) = token.as_ref()
                && cached.expires_at > Instant::now()
            {
                return Ok(cached.value.clone());
            }
        }

        let response = self
            .http_client
            .post(format!("{}/v1/security/oauth2/token", self.config.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Amadeus auth failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Amadeus auth error: {status} - {body}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse Amadeus token: {e}"))
        })?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *self.token.write().await = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        tracing::debug!(expires_in = token.expires_in, "Refreshed Amadeus access token");
        Ok(token.access_token)
    }

    /// Search offers for a route and date.
    pub async fn search(&self, query: &FlightSearchQuery) -> AppResult<Vec<FlightOffer>> {
        query.validate()?;
        if query.return_date.is_some_and(|r| r < query.departure_date) {
            return Err(AppError::invalid_field(
                "returnDate",
                "must not be before departureDate",
            ));
        }

        let token = self.access_token().await?;

        let mut params = vec![
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.departure_date.to_string()),
            ("adults", query.adults.to_string()),
            ("currencyCode", CURRENCY.to_string()),
            ("max", query.max.unwrap_or(20).to_string()),
        ];
        if let Some(return_date) = query.return_date {
            params.push(("returnDate", return_date.to_string()));
        }
        if let Some(cabin) = query.cabin {
            params.push(("travelClass", cabin.amadeus_code().to_string()));
        }

        let response = self
            .http_client
            .get(format!("{}/v2/shopping/flight-offers", self.config.base_url))
            .bearer_auth(token)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Amadeus request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Amadeus API error: {status} - {body}"
            )));
        }

        let offers: OffersResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse Amadeus offers: {e}"))
        })?;

        let mut result = Vec::with_capacity(offers.data.len());
        for raw in offers.data {
            if let Some(offer) = to_offer(raw, query.adults)? {
                result.push(offer);
            }
        }

        tracing::debug!(
            origin = %query.origin,
            destination = %query.destination,
            count = result.len(),
            "Flight search completed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_offer() -> RawOffer {
        serde_json::from_value(json!({
            "id": "1",
            "itineraries": [{
                "duration": "PT4H10M",
                "segments": [
                    {
                        "departure": { "iataCode": "LIS", "at": "2030-07-01T06:00:00" },
                        "arrival": { "iataCode": "MAD", "at": "2030-07-01T08:15:00" },
                        "carrierCode": "IB",
                        "number": "3101"
                    },
                    {
                        "departure": { "iataCode": "MAD", "at": "2030-07-01T09:00:00" },
                        "arrival": { "iataCode": "CDG", "at": "2030-07-01T11:10:00" },
                        "carrierCode": "IB",
                        "number": "3400"
                    }
                ]
            }],
            "price": { "currency": "EUR", "total": "241.50", "base": "180.00" },
            "travelerPricings": [{
                "fareDetailsBySegment": [{ "cabin": "ECONOMY" }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_offer_spans_all_segments() {
        let offer = to_offer(raw_offer(), 2).unwrap().unwrap();

        assert_eq!(offer.flight_number, "IB3101");
        assert_eq!(offer.origin, "LIS");
        assert_eq!(offer.destination, "CDG");
        assert_eq!(offer.stops, 1);
        assert_eq!(offer.cabin.as_deref(), Some("economy"));
        assert_eq!(offer.total_cents, 24_150);
        assert_eq!(offer.price_per_passenger_cents, 12_075);
    }

    #[test]
    fn test_offer_without_segments_skipped() {
        let mut raw = raw_offer();
        raw.itineraries[0].segments.clear();
        assert!(to_offer(raw, 1).unwrap().is_none());
    }

    #[test]
    fn test_query_rejects_city_names() {
        let query = FlightSearchQuery {
            origin: "Lisbon".to_string(),
            destination: "CDG".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2030, 7, 1).unwrap(),
            return_date: None,
            adults: 1,
            cabin: None,
            max: None,
        };
        assert!(query.validate().is_err());
    }
}
