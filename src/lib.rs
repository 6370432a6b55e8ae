//! # Sky Search Library
//!
//! An async client pipeline for flight and airport search against the
//! Sky Scrapper API: debounced airport autocomplete with city grouping,
//! validated search-request construction, three-way result
//! classification, and per-itinerary detail fetching with an isolated
//! loading/error lifecycle.

pub mod auth;
pub mod client;
pub mod config;
pub mod debounce;
pub mod details;
pub mod models;
pub mod nearby;
pub mod outcome;
pub mod request;
pub mod resolver;
pub(crate) mod wire;

use chrono::NaiveDate;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

// Re-export main types for convenience
pub use auth::{AuthSession, FileUserStore, MemoryUserStore, UserStore};
pub use client::SkyClient;
pub use config::ApiConfig;
pub use debounce::Debouncer;
pub use details::{DetailError, DetailFetcher, DetailState};
pub use models::*;
pub use nearby::{LocationFix, DEFAULT_REGION};
pub use outcome::{ResultsParams, SearchOutcome};
pub use request::{DetailQuery, FlightQuery, DEFAULT_LOCALE};
pub use resolver::{group_suggestions, LookupTicket, ResolverState};

/// Error types for the search pipeline
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API returned HTTP status {0}")]
    StatusError(reqwest::StatusCode),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("API rejected the request: {0}")]
    ApiError(String),

    #[error("Missing required search field: {0}")]
    MissingField(&'static str),

    #[error("Invalid date format: {0}")]
    DateParseError(String),

    #[error("Invalid passenger count: {0}")]
    InvalidPassengerCount(String),
}

/// Trip type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripType {
    OneWay,
    RoundTrip,
}

impl FromStr for TripType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one-way" | "oneway" => Ok(TripType::OneWay),
            "round-trip" | "roundtrip" => Ok(TripType::RoundTrip),
            _ => Err(SearchError::Malformed(format!("Invalid trip type: {}", s))),
        }
    }
}

/// Cabin class enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    /// Wire value expected by the API
    pub fn as_param(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::PremiumEconomy => "premium_economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl FromStr for CabinClass {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "economy" => Ok(CabinClass::Economy),
            "premium-economy" | "premium_economy" => Ok(CabinClass::PremiumEconomy),
            "business" => Ok(CabinClass::Business),
            "first" => Ok(CabinClass::First),
            _ => Err(SearchError::Malformed(format!("Invalid cabin class: {}", s))),
        }
    }
}

/// Passenger bounds per category
pub const MIN_ADULTS: i32 = 1;
pub const MAX_PER_CATEGORY: i32 = 9;

/// Passenger configuration with enforced bounds: adults stays in [1, 9],
/// every other category in [0, 9]. Out-of-range increments and
/// decrements are no-ops, and no construction path violates the bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passengers {
    adults: i32,
    children: i32,
    infants_in_seat: i32,
    infants_on_lap: i32,
}

/// One of the four independent passenger counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerCategory {
    Adults,
    Children,
    InfantsInSeat,
    InfantsOnLap,
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants_in_seat: 0,
            infants_on_lap: 0,
        }
    }
}

impl Passengers {
    pub fn new(
        adults: i32,
        children: i32,
        infants_in_seat: i32,
        infants_on_lap: i32,
    ) -> Result<Self, SearchError> {
        if !(MIN_ADULTS..=MAX_PER_CATEGORY).contains(&adults) {
            return Err(SearchError::InvalidPassengerCount(format!(
                "adults must be {MIN_ADULTS}-{MAX_PER_CATEGORY}, got {adults}"
            )));
        }
        for (count, name) in [
            (children, "children"),
            (infants_in_seat, "infants_in_seat"),
            (infants_on_lap, "infants_on_lap"),
        ] {
            if !(0..=MAX_PER_CATEGORY).contains(&count) {
                return Err(SearchError::InvalidPassengerCount(format!(
                    "{name} must be 0-{MAX_PER_CATEGORY}, got {count}"
                )));
            }
        }

        Ok(Self {
            adults,
            children,
            infants_in_seat,
            infants_on_lap,
        })
    }

    pub fn adults(&self) -> i32 {
        self.adults
    }

    pub fn children(&self) -> i32 {
        self.children
    }

    pub fn infants_in_seat(&self) -> i32 {
        self.infants_in_seat
    }

    pub fn infants_on_lap(&self) -> i32 {
        self.infants_on_lap
    }

    pub fn total(&self) -> i32 {
        self.adults + self.children + self.infants_in_seat + self.infants_on_lap
    }

    /// Increment a counter; a counter already at its maximum stays put
    pub fn increment(&mut self, category: PassengerCategory) {
        let counter = self.counter_mut(category);
        if *counter < MAX_PER_CATEGORY {
            *counter += 1;
        }
    }

    /// Decrement a counter; adults never drops below one, the rest never
    /// below zero
    pub fn decrement(&mut self, category: PassengerCategory) {
        let min = match category {
            PassengerCategory::Adults => MIN_ADULTS,
            _ => 0,
        };
        let counter = self.counter_mut(category);
        if *counter > min {
            *counter -= 1;
        }
    }

    fn counter_mut(&mut self, category: PassengerCategory) -> &mut i32 {
        match category {
            PassengerCategory::Adults => &mut self.adults,
            PassengerCategory::Children => &mut self.children,
            PassengerCategory::InfantsInSeat => &mut self.infants_in_seat,
            PassengerCategory::InfantsOnLap => &mut self.infants_on_lap,
        }
    }
}

/// Screen-local search criteria assembled before submission
#[derive(Debug, Clone, PartialEq)]
pub struct TripCriteria {
    pub trip_type: TripType,
    pub origin: Option<AirportSuggestion>,
    pub destination: Option<AirportSuggestion>,
    pub departure: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub cabin_class: CabinClass,
    pub passengers: Passengers,
}

impl Default for TripCriteria {
    fn default() -> Self {
        Self {
            trip_type: TripType::OneWay,
            origin: None,
            destination: None,
            departure: None,
            return_date: None,
            cabin_class: CabinClass::Economy,
            passengers: Passengers::default(),
        }
    }
}

impl TripCriteria {
    /// Exchange origin and destination in one state update; there is no
    /// observable intermediate where both fields hold the same value.
    pub fn swap_endpoints(&mut self) {
        std::mem::swap(&mut self.origin, &mut self.destination);
    }

    /// Parse a `YYYY-MM-DD` travel date
    pub fn parse_date(s: &str) -> Result<NaiveDate, SearchError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| SearchError::DateParseError(s.to_string()))
    }
}

/// Look up grouped airport suggestions for a settled query. Autocomplete
/// failures are swallowed into an empty list; they must never block
/// typing.
pub async fn search_airports(query: &str) -> Vec<SuggestionGroup> {
    let mut state = ResolverState::new();
    let Some(ticket) = state.begin(query) else {
        return Vec::new();
    };
    let client = match SkyClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Could not build API client for airport lookup");
            return Vec::new();
        }
    };
    let result = resolver::lookup(&client, &ticket, DEFAULT_LOCALE).await;
    state.apply(&ticket, result);
    state.groups().to_vec()
}

/// Run a flight search for validated criteria. Validation failures are
/// returned as errors before any network call; network and decode
/// failures fold into [`SearchOutcome::Failure`].
pub async fn search_flights(criteria: &TripCriteria) -> Result<SearchOutcome, SearchError> {
    let query = FlightQuery::build(criteria)?;
    let client = SkyClient::from_env()?;
    Ok(SearchOutcome::classify(client.search_flights(&query).await))
}

/// Fetch segment-level detail and booking options for one itinerary
pub async fn flight_details(
    session: &SearchSession,
    itinerary: &Itinerary,
) -> Result<ItineraryDetail, DetailError> {
    let client = SkyClient::from_env().map_err(|e| {
        warn!(error = %e, "Could not build API client for detail lookup");
        DetailError::Failed
    })?;
    details::fetch_detail(&client, session, itinerary).await
}

/// Fetch airports around the device position, degrading to the default
/// region when location permission was denied
pub async fn airports_near(fix: &LocationFix) -> Result<NearbyAirports, SearchError> {
    let client = SkyClient::from_env()?;
    nearby::nearby_airports(&client, fix, DEFAULT_LOCALE).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(sky_id: &str) -> AirportSuggestion {
        AirportSuggestion {
            sky_id: sky_id.to_string(),
            entity_id: format!("e-{sky_id}"),
            title: sky_id.to_string(),
            subtitle: None,
            is_airport: true,
            parent_city: None,
        }
    }

    #[test]
    fn test_trip_type_parsing() {
        assert!(matches!("one-way".parse::<TripType>(), Ok(TripType::OneWay)));
        assert!(matches!("oneway".parse::<TripType>(), Ok(TripType::OneWay)));
        assert!(matches!(
            "roundtrip".parse::<TripType>(),
            Ok(TripType::RoundTrip)
        ));
        assert!("invalid".parse::<TripType>().is_err());
    }

    #[test]
    fn test_cabin_class_parsing() {
        assert!(matches!("economy".parse::<CabinClass>(), Ok(CabinClass::Economy)));
        assert!(matches!(
            "premium-economy".parse::<CabinClass>(),
            Ok(CabinClass::PremiumEconomy)
        ));
        assert!(matches!(
            "business".parse::<CabinClass>(),
            Ok(CabinClass::Business)
        ));
        assert!(matches!("first".parse::<CabinClass>(), Ok(CabinClass::First)));
        assert!("invalid".parse::<CabinClass>().is_err());
    }

    #[test]
    fn test_cabin_class_wire_values() {
        assert_eq!(CabinClass::PremiumEconomy.as_param(), "premium_economy");
        assert_eq!(CabinClass::Economy.as_param(), "economy");
    }

    #[test]
    fn test_passengers_default() {
        let passengers = Passengers::default();
        assert_eq!(passengers.adults(), 1);
        assert_eq!(passengers.children(), 0);
        assert_eq!(passengers.infants_in_seat(), 0);
        assert_eq!(passengers.infants_on_lap(), 0);
        assert_eq!(passengers.total(), 1);
    }

    #[test]
    fn test_passengers_construction_bounds() {
        assert!(Passengers::new(0, 0, 0, 0).is_err());
        assert!(Passengers::new(10, 0, 0, 0).is_err());
        assert!(Passengers::new(1, -1, 0, 0).is_err());
        assert!(Passengers::new(1, 0, 0, 10).is_err());
        assert!(Passengers::new(9, 9, 9, 9).is_ok());
    }

    #[test]
    fn test_adults_never_drop_below_one() {
        let mut passengers = Passengers::default();
        passengers.decrement(PassengerCategory::Adults);
        assert_eq!(passengers.adults(), 1);
    }

    #[test]
    fn test_counters_cap_at_maximum() {
        let mut passengers = Passengers::new(9, 9, 0, 0).unwrap();
        passengers.increment(PassengerCategory::Adults);
        passengers.increment(PassengerCategory::Children);
        assert_eq!(passengers.adults(), 9);
        assert_eq!(passengers.children(), 9);
    }

    #[test]
    fn test_decrement_floor_is_zero_for_non_adults() {
        let mut passengers = Passengers::default();
        passengers.decrement(PassengerCategory::Children);
        passengers.decrement(PassengerCategory::InfantsOnLap);
        assert_eq!(passengers.children(), 0);
        assert_eq!(passengers.infants_on_lap(), 0);
    }

    #[test]
    fn test_swap_endpoints_is_atomic() {
        let mut criteria = TripCriteria {
            origin: Some(suggestion("LAX")),
            destination: Some(suggestion("JFK")),
            ..TripCriteria::default()
        };
        criteria.swap_endpoints();
        assert_eq!(criteria.origin.as_ref().unwrap().sky_id, "JFK");
        assert_eq!(criteria.destination.as_ref().unwrap().sky_id, "LAX");
    }

    #[test]
    fn test_swap_endpoints_with_one_side_empty() {
        let mut criteria = TripCriteria {
            origin: Some(suggestion("LAX")),
            ..TripCriteria::default()
        };
        criteria.swap_endpoints();
        assert!(criteria.origin.is_none());
        assert_eq!(criteria.destination.as_ref().unwrap().sky_id, "LAX");
    }

    #[test]
    fn test_parse_date() {
        assert!(TripCriteria::parse_date("2025-08-15").is_ok());
        assert!(matches!(
            TripCriteria::parse_date("08/15/2025"),
            Err(SearchError::DateParseError(_))
        ));
    }
}
