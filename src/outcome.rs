//! Search result classification and the navigation boundary
//!
//! A completed search call lands in exactly one of three outcomes:
//! results worth rendering (with the session token carried forward for
//! detail lookups), a well-formed empty set, or a failure. Nothing is
//! retried automatically; the user must resubmit.

use tracing::warn;

use crate::models::{FlightSearchData, Itinerary, SearchSession};
use crate::{SearchError, TripCriteria};

/// User-facing message for a well-formed search with zero itineraries
pub const EMPTY_RESULTS_MESSAGE: &str = "No flights found for this route and date.";

/// User-facing message for any search failure
pub const SEARCH_FAILED_MESSAGE: &str = "Something went wrong while searching. Please try again.";

/// The three-way classification of a completed flight search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Itineraries to render, with the session token for detail lookups
    Results(SearchSession),
    /// Well-formed response with nothing to show
    Empty,
    /// Network, HTTP, or decode failure; `reason` keeps the internal
    /// detail for logs while the user sees the generic message
    Failure { reason: String },
}

impl SearchOutcome {
    /// Classify a completed search call. An empty itinerary list is
    /// Empty regardless of whether a session id came back; itineraries
    /// without a session id cannot support detail lookups and count as
    /// malformed.
    pub fn classify(result: Result<FlightSearchData, SearchError>) -> Self {
        match result {
            Err(e) => SearchOutcome::Failure {
                reason: e.to_string(),
            },
            Ok(data) if data.itineraries.is_empty() => SearchOutcome::Empty,
            Ok(data) => match data.session_id {
                Some(session_id) => SearchOutcome::Results(SearchSession {
                    session_id,
                    itineraries: data.itineraries,
                }),
                None => SearchOutcome::Failure {
                    reason: "search response carried itineraries but no session id".to_string(),
                },
            },
        }
    }

    /// Short user-facing string for the empty and failure outcomes
    pub fn user_message(&self) -> Option<&str> {
        match self {
            SearchOutcome::Results(_) => None,
            SearchOutcome::Empty => Some(EMPTY_RESULTS_MESSAGE),
            SearchOutcome::Failure { .. } => Some(SEARCH_FAILED_MESSAGE),
        }
    }
}

/// String parameters handed to the results screen. The itinerary list
/// travels as a JSON-encoded string; the consumer must parse it
/// defensively and never crash on a malformed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsParams {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub session_id: String,
    pub flights: String,
}

impl ResultsParams {
    /// Serialize a successful search for the navigation hop
    pub fn encode(criteria: &TripCriteria, session: &SearchSession) -> Self {
        let flights = serde_json::to_string(&session.itineraries).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to encode itineraries for navigation");
            "[]".to_string()
        });
        Self {
            origin: criteria
                .origin
                .as_ref()
                .map(|s| s.title.clone())
                .unwrap_or_default(),
            destination: criteria
                .destination
                .as_ref()
                .map(|s| s.title.clone())
                .unwrap_or_default(),
            date: criteria
                .departure
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            session_id: session.session_id.clone(),
            flights,
        }
    }

    /// Parse the itinerary list back out of the navigation parameter.
    /// Malformed or non-array JSON yields an empty list.
    pub fn parse_flights(raw: &str) -> Vec<Itinerary> {
        match serde_json::from_str::<Vec<Itinerary>>(raw) {
            Ok(itineraries) => itineraries,
            Err(e) => {
                warn!(error = %e, "Failed to parse flights navigation parameter");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Carrier, Leg, Price};
    use crate::{CabinClass, Passengers, TripType};
    use chrono::NaiveDate;

    fn itinerary(id: &str) -> Itinerary {
        Itinerary {
            id: id.to_string(),
            price: Price {
                raw: Some(283.0),
                formatted: "$283".to_string(),
            },
            legs: vec![Leg {
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
            }],
        }
    }

    fn criteria() -> TripCriteria {
        TripCriteria {
            trip_type: TripType::OneWay,
            origin: None,
            destination: None,
            departure: NaiveDate::from_ymd_opt(2025, 8, 15),
            return_date: None,
            cabin_class: CabinClass::Economy,
            passengers: Passengers::default(),
        }
    }

    #[test]
    fn test_classify_results() {
        let outcome = SearchOutcome::classify(Ok(FlightSearchData {
            session_id: Some("sess-123".to_string()),
            itineraries: vec![itinerary("it-1"), itinerary("it-2")],
        }));
        match outcome {
            SearchOutcome::Results(session) => {
                assert_eq!(session.session_id, "sess-123");
                assert_eq!(session.itineraries.len(), 2);
            }
            other => panic!("expected Results, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_empty_even_with_session_id() {
        let outcome = SearchOutcome::classify(Ok(FlightSearchData {
            session_id: Some("sess-123".to_string()),
            itineraries: Vec::new(),
        }));
        assert_eq!(outcome, SearchOutcome::Empty);
        assert_eq!(outcome.user_message(), Some(EMPTY_RESULTS_MESSAGE));
    }

    #[test]
    fn test_classify_results_without_session_is_failure() {
        let outcome = SearchOutcome::classify(Ok(FlightSearchData {
            session_id: None,
            itineraries: vec![itinerary("it-1")],
        }));
        assert!(matches!(outcome, SearchOutcome::Failure { .. }));
    }

    #[test]
    fn test_classify_error_is_failure_with_generic_message() {
        let outcome =
            SearchOutcome::classify(Err(SearchError::Malformed("truncated".to_string())));
        assert!(matches!(outcome, SearchOutcome::Failure { .. }));
        assert_eq!(outcome.user_message(), Some(SEARCH_FAILED_MESSAGE));
    }

    #[test]
    fn test_encode_then_parse_round_trips_ids() {
        let session = SearchSession {
            session_id: "sess-123".to_string(),
            itineraries: vec![itinerary("it-1"), itinerary("it-2")],
        };
        let params = ResultsParams::encode(&criteria(), &session);
        assert_eq!(params.session_id, "sess-123");
        assert_eq!(params.date, "2025-08-15");

        let parsed = ResultsParams::parse_flights(&params.flights);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "it-1");
        assert_eq!(parsed[1].id, "it-2");
    }

    #[test]
    fn test_parse_flights_malformed_json_yields_empty() {
        assert!(ResultsParams::parse_flights("{not valid").is_empty());
    }

    #[test]
    fn test_parse_flights_non_array_yields_empty() {
        assert!(ResultsParams::parse_flights(r#"{"id": "it-1"}"#).is_empty());
    }
}
