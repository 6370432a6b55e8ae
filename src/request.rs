//! Wire request construction for flight search and detail lookups
//!
//! All validation happens here, before any network call: a request that
//! fails its preconditions is rejected with a validation error and never
//! dispatched.

use serde::Serialize;

use crate::models::{Itinerary, SearchSession};
use crate::{CabinClass, SearchError, TripCriteria, TripType};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_MARKET: &str = "en-US";
pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_SORT: &str = "best";

/// Fully-validated outbound flight search request
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub origin_sky_id: String,
    pub origin_entity_id: String,
    pub destination_sky_id: String,
    pub destination_entity_id: String,
    pub date: String,
    pub return_date: Option<String>,
    pub cabin_class: CabinClass,
    pub adults: i32,
    pub children: i32,
    /// Infants-in-seat and infants-on-lap collapsed into one wire field
    pub infants: i32,
}

impl FlightQuery {
    /// Build a request from screen-local criteria, enforcing the
    /// preconditions: both endpoints selected, departure date set, and a
    /// return date whenever the trip is a round trip.
    pub fn build(criteria: &TripCriteria) -> Result<Self, SearchError> {
        let origin = criteria
            .origin
            .as_ref()
            .ok_or(SearchError::MissingField("origin"))?;
        let destination = criteria
            .destination
            .as_ref()
            .ok_or(SearchError::MissingField("destination"))?;
        let departure = criteria
            .departure
            .ok_or(SearchError::MissingField("departure date"))?;

        let return_date = match criteria.trip_type {
            TripType::RoundTrip => Some(
                criteria
                    .return_date
                    .ok_or(SearchError::MissingField("return date"))?,
            ),
            TripType::OneWay => None,
        };

        Ok(Self {
            origin_sky_id: origin.sky_id.clone(),
            origin_entity_id: origin.entity_id.clone(),
            destination_sky_id: destination.sky_id.clone(),
            destination_entity_id: destination.entity_id.clone(),
            date: departure.format("%Y-%m-%d").to_string(),
            return_date: return_date.map(|d| d.format("%Y-%m-%d").to_string()),
            cabin_class: criteria.cabin_class,
            adults: criteria.passengers.adults(),
            children: criteria.passengers.children(),
            infants: criteria.passengers.infants_in_seat() + criteria.passengers.infants_on_lap(),
        })
    }

    /// Query parameters in the exact shape the API expects. Note the
    /// API's own spelling of the `childrens` key.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("originSkyId", self.origin_sky_id.clone()),
            ("destinationSkyId", self.destination_sky_id.clone()),
            ("originEntityId", self.origin_entity_id.clone()),
            ("destinationEntityId", self.destination_entity_id.clone()),
            ("date", self.date.clone()),
        ];
        if let Some(return_date) = &self.return_date {
            params.push(("returnDate", return_date.clone()));
        }
        params.push(("cabinClass", self.cabin_class.as_param().to_string()));
        params.push(("adults", self.adults.to_string()));
        params.push(("childrens", self.children.to_string()));
        params.push(("infants", self.infants.to_string()));
        params.push(("sortBy", DEFAULT_SORT.to_string()));
        params.push(("currency", DEFAULT_CURRENCY.to_string()));
        params.push(("market", DEFAULT_MARKET.to_string()));
        params.push(("countryCode", DEFAULT_COUNTRY.to_string()));
        params
    }
}

/// One leg reference inside a detail request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailLeg {
    pub origin: String,
    pub destination: String,
    pub date: String,
}

/// Request for segment-level detail on a selected itinerary, keyed by the
/// search session it came from
#[derive(Debug, Clone, PartialEq)]
pub struct DetailQuery {
    pub legs: Vec<DetailLeg>,
    pub session_id: String,
    pub itinerary_id: String,
    pub cabin_class: CabinClass,
    pub adults: i32,
}

impl DetailQuery {
    /// Build the detail request for an itinerary selected from a session.
    /// Returns a validation error when the itinerary carries no legs.
    pub fn for_itinerary(
        session: &SearchSession,
        itinerary: &Itinerary,
    ) -> Result<Self, SearchError> {
        let leg = itinerary
            .first_leg()
            .ok_or(SearchError::MissingField("itinerary legs"))?;

        Ok(Self {
            legs: vec![DetailLeg {
                origin: leg.origin_id.clone(),
                destination: leg.destination_id.clone(),
                date: leg.departure_date().to_string(),
            }],
            session_id: session.session_id.clone(),
            itinerary_id: itinerary.id.clone(),
            cabin_class: CabinClass::Economy,
            adults: 1,
        })
    }

    /// Query parameters with the legs serialized as a JSON string, the
    /// way the endpoint expects them
    pub fn query_pairs(&self) -> Result<Vec<(&'static str, String)>, SearchError> {
        let legs = serde_json::to_string(&self.legs)
            .map_err(|e| SearchError::Malformed(format!("legs encoding: {e}")))?;
        Ok(vec![
            ("legs", legs),
            ("adults", self.adults.to_string()),
            ("currency", DEFAULT_CURRENCY.to_string()),
            ("locale", DEFAULT_LOCALE.to_string()),
            ("market", DEFAULT_MARKET.to_string()),
            ("cabinClass", self.cabin_class.as_param().to_string()),
            ("countryCode", DEFAULT_COUNTRY.to_string()),
            ("sessionId", self.session_id.clone()),
            ("itineraryId", self.itinerary_id.clone()),
        ])
    }
}
