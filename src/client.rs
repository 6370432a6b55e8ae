//! HTTP client for the Sky Scrapper flight-data API

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

use crate::config::ApiConfig;
use crate::models::{AirportSuggestion, FlightSearchData, NearbyAirports};
use crate::request::{DetailQuery, FlightQuery};
use crate::wire::{self, DecodedDetail, Envelope};
use crate::SearchError;

/// Main client for making requests to the flight-data API.
///
/// Holds one connection-pooled [`reqwest::Client`] with the RapidAPI
/// credentials installed as default headers. No explicit per-request
/// timeout is configured; a timeout is whatever the transport raises.
pub struct SkyClient {
    http_client: Client,
    base_url: String,
}

impl SkyClient {
    /// Create a new client from explicit configuration
    pub fn new(config: ApiConfig) -> Result<Self, SearchError> {
        debug!("Creating new sky client");
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-rapidapi-key",
            HeaderValue::from_str(&config.api_key).map_err(|_| {
                SearchError::Malformed("API key is not a valid header value".to_string())
            })?,
        );
        headers.insert(
            "x-rapidapi-host",
            HeaderValue::from_str(&config.api_host).map_err(|_| {
                SearchError::Malformed("API host is not a valid header value".to_string())
            })?,
        );

        let http_client = Client::builder().default_headers(headers).build()?;

        debug!("Sky client created successfully");
        Ok(Self {
            http_client,
            base_url: config.base_url,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> Result<Self, SearchError> {
        Self::new(ApiConfig::from_env())
    }

    /// Look up airport and city suggestions for a free-text query
    #[instrument(level = "info", skip(self))]
    pub async fn search_airport(
        &self,
        query: &str,
        locale: &str,
    ) -> Result<Vec<AirportSuggestion>, SearchError> {
        let params = vec![
            ("query", query.to_string()),
            ("locale", locale.to_string()),
        ];
        let envelope: Envelope<Vec<wire::RawSuggestion>> =
            self.get_json("/flights/searchAirport", &params).await?;
        let raw = wire::unwrap_envelope(envelope, "searchAirport")?;
        Ok(wire::decode_suggestions(raw))
    }

    /// Run a flight search and decode the session plus itinerary list
    #[instrument(level = "info", skip(self, query))]
    pub async fn search_flights(
        &self,
        query: &FlightQuery,
    ) -> Result<FlightSearchData, SearchError> {
        let params = query.query_pairs();
        let envelope: Envelope<wire::RawFlightSearch> =
            self.get_json("/flights/searchFlights", &params).await?;
        let raw = wire::unwrap_envelope(envelope, "searchFlights")?;
        let data = wire::decode_flight_search(raw)?;
        info!(
            itineraries = data.itineraries.len(),
            has_session = data.session_id.is_some(),
            "Flight search decoded"
        );
        Ok(data)
    }

    /// Fetch airports around a coordinate
    #[instrument(level = "info", skip(self))]
    pub async fn get_nearby_airports(
        &self,
        lat: f64,
        lng: f64,
        locale: &str,
    ) -> Result<NearbyAirports, SearchError> {
        let params = vec![
            ("lat", lat.to_string()),
            ("lng", lng.to_string()),
            ("locale", locale.to_string()),
        ];
        let envelope: Envelope<wire::RawNearby> =
            self.get_json("/flights/getNearByAirports", &params).await?;
        let raw = wire::unwrap_envelope(envelope, "getNearByAirports")?;
        Ok(wire::decode_nearby(raw))
    }

    /// Fetch segment-level detail and booking options for one itinerary.
    /// `Ok(None)` means the response was well-formed but held no detail.
    #[instrument(level = "info", skip(self, query))]
    pub(crate) async fn get_flight_details(
        &self,
        query: &DetailQuery,
    ) -> Result<Option<DecodedDetail>, SearchError> {
        let params = query.query_pairs()?;
        let envelope: Envelope<wire::RawDetail> =
            self.get_json("/flights/getFlightDetails", &params).await?;
        let raw = wire::unwrap_envelope(envelope, "getFlightDetails")?;
        wire::decode_detail(raw)
    }

    /// Shared GET-and-decode path with request timing
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SearchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Issuing API request");

        let start_time = std::time::Instant::now();
        let response = self.http_client.get(&url).query(params).send().await?;
        let status = response.status();

        info!(
            status = %status,
            duration_ms = start_time.elapsed().as_millis(),
            path,
            "API request completed"
        );

        if !status.is_success() {
            error!(status = %status, path, "API request failed");
            return Err(SearchError::StatusError(status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SearchError::Malformed(format!("{path}: {e}")))
    }
}
