//! Per-itinerary detail fetching with an isolated lifecycle
//!
//! Each fetch owns a fresh loading/error/detail triple: starting a new
//! fetch always clears the previous error and detail before the request
//! suspends, and a response belonging to a superseded fetch is never
//! applied. Multiple fetchers (one per open detail view) are fully
//! independent.

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::SkyClient;
use crate::models::{Itinerary, ItineraryDetail, SearchSession};
use crate::request::DetailQuery;
use crate::SearchError;

/// User-facing failure taxonomy for the detail lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetailError {
    #[error("Request timed out. Please try again.")]
    Timeout,

    /// Message supplied by the server in its failure payload
    #[error("{0}")]
    Server(String),

    #[error("No details found for this flight.")]
    NoDetails,

    #[error("Failed to fetch flight details. Please try again.")]
    Failed,
}

/// Snapshot of one detail view's lifecycle. At most one of
/// {loading, error, detail} is meaningful at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub loading: bool,
    pub error: Option<DetailError>,
    pub detail: Option<ItineraryDetail>,
}

/// Drives detail fetches for one view. The generation counter ties each
/// response to the fetch that issued it, so a late reply from an earlier
/// fetch cannot clobber a newer one.
#[derive(Debug, Default)]
pub struct DetailFetcher {
    state: DetailState,
    generation: u64,
}

impl DetailFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch: clears prior error and detail, raises the
    /// loading flag, and returns the generation token the eventual
    /// response must present.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = DetailState {
            loading: true,
            error: None,
            detail: None,
        };
        self.generation
    }

    /// Apply a completed fetch. Returns false (and changes nothing) when
    /// the generation token belongs to a superseded fetch.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<ItineraryDetail, DetailError>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "Discarding superseded detail response"
            );
            return false;
        }
        self.state.loading = false;
        match result {
            Ok(detail) => self.state.detail = Some(detail),
            Err(e) => self.state.error = Some(e),
        }
        true
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Run one full fetch cycle against the API
    pub async fn fetch(
        &mut self,
        client: &SkyClient,
        session: &SearchSession,
        itinerary: &Itinerary,
    ) -> &DetailState {
        let generation = self.begin();
        let result = fetch_detail(client, session, itinerary).await;
        self.complete(generation, result);
        self.state()
    }
}

/// Fetch and assemble the detail for a selected itinerary. The detail
/// endpoint is not guaranteed to echo a price, so the itinerary's
/// already-known list price is the fallback.
pub async fn fetch_detail(
    client: &SkyClient,
    session: &SearchSession,
    itinerary: &Itinerary,
) -> Result<ItineraryDetail, DetailError> {
    let query = DetailQuery::for_itinerary(session, itinerary).map_err(|e| {
        warn!(error = %e, itinerary = %itinerary.id, "Could not build detail request");
        DetailError::Failed
    })?;

    match client.get_flight_details(&query).await {
        Ok(Some(decoded)) => Ok(ItineraryDetail {
            legs: decoded.legs,
            price: decoded.price.unwrap_or_else(|| itinerary.price.clone()),
            destination_image: decoded.destination_image,
            pricing_options: decoded.pricing_options,
        }),
        Ok(None) => Err(DetailError::NoDetails),
        Err(e) => Err(classify_detail_error(e)),
    }
}

fn classify_detail_error(err: SearchError) -> DetailError {
    match err {
        SearchError::HttpError(e) if e.is_timeout() => DetailError::Timeout,
        SearchError::ApiError(message) => DetailError::Server(message),
        other => {
            warn!(error = %other, "Detail fetch failed");
            DetailError::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Carrier, Leg, Price};

    fn detail() -> ItineraryDetail {
        ItineraryDetail {
            legs: vec![leg()],
            price: Price {
                raw: Some(283.0),
                formatted: "$283".to_string(),
            },
            destination_image: None,
            pricing_options: Vec::new(),
        }
    }

    fn leg() -> Leg {
        Leg {
            origin_id: "LAX".to_string(),
            origin_code: "LAX".to_string(),
            origin_name: "Los Angeles International".to_string(),
            destination_id: "JFK".to_string(),
            destination_code: "JFK".to_string(),
            destination_name: "John F. Kennedy International".to_string(),
            departure: "2025-08-15T06:45:00".to_string(),
            arrival: "2025-08-15T15:10:00".to_string(),
            duration_minutes: 325,
            stop_count: 0,
            carrier: Carrier {
                name: "Delta".to_string(),
                logo_url: None,
            },
            segments: Vec::new(),
        }
    }

    #[test]
    fn test_begin_clears_prior_state() {
        let mut fetcher = DetailFetcher::new();
        let generation = fetcher.begin();
        fetcher.complete(generation, Err(DetailError::Failed));
        assert!(fetcher.state().error.is_some());

        fetcher.begin();
        let state = fetcher.state();
        assert!(state.loading);
        assert!(state.error.is_none());
        assert!(state.detail.is_none());
    }

    #[test]
    fn test_late_response_from_superseded_fetch_is_ignored() {
        let mut fetcher = DetailFetcher::new();
        let first = fetcher.begin();
        let second = fetcher.begin();

        // First fetch resolves after the second one started
        assert!(!fetcher.complete(first, Ok(detail())));
        assert!(fetcher.state().loading);
        assert!(fetcher.state().detail.is_none());

        assert!(fetcher.complete(second, Err(DetailError::Timeout)));
        assert!(!fetcher.state().loading);
        assert_eq!(fetcher.state().error, Some(DetailError::Timeout));
    }

    #[test]
    fn test_success_populates_detail_only() {
        let mut fetcher = DetailFetcher::new();
        let generation = fetcher.begin();
        assert!(fetcher.complete(generation, Ok(detail())));
        let state = fetcher.state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.detail.is_some());
    }

    #[test]
    fn test_error_messages_are_distinct() {
        assert_eq!(
            DetailError::Timeout.to_string(),
            "Request timed out. Please try again."
        );
        assert_eq!(
            DetailError::Server("session expired".to_string()).to_string(),
            "session expired"
        );
        assert_eq!(
            DetailError::NoDetails.to_string(),
            "No details found for this flight."
        );
        assert_eq!(
            DetailError::Failed.to_string(),
            "Failed to fetch flight details. Please try again."
        );
    }

    #[test]
    fn test_classify_api_error_keeps_server_message() {
        let classified =
            classify_detail_error(SearchError::ApiError("session expired".to_string()));
        assert_eq!(classified, DetailError::Server("session expired".to_string()));
    }

    #[test]
    fn test_classify_malformed_is_generic_failure() {
        let classified = classify_detail_error(SearchError::Malformed("oops".to_string()));
        assert_eq!(classified, DetailError::Failed);
    }
}
