//! Raw response shapes for the Sky Scrapper API
//!
//! Every field here is optional: the remote payloads are loosely shaped,
//! so the structs below only mirror them, and the `decode_*` functions
//! are the single place raw data is turned into validated `models`
//! records. Anything that fails validation surfaces as
//! [`SearchError::Malformed`]; no partially-decoded value escapes.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::{
    AgentRating, AirportSuggestion, Carrier, FlightSearchData, Itinerary, Leg, NearbyAirports,
    ParentCity, Price, PricingOption, Segment,
};
use crate::SearchError;

/// Common `{ status, data, message }` envelope wrapping every endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub status: Option<bool>,
    pub data: Option<T>,
    pub message: Option<Value>,
}

/// Pull a human-readable message out of a failure envelope. The API sends
/// either a plain string or an array whose first element explains the
/// session problem under a `sessionId` key.
pub(crate) fn extract_message(message: Option<Value>) -> String {
    match message {
        Some(Value::String(s)) => s,
        Some(Value::Array(items)) => items
            .first()
            .and_then(|m| m.get("sessionId"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "The API rejected the request.".to_string()),
        _ => "The API rejected the request.".to_string(),
    }
}

/// Unwrap an envelope, mapping `status: false` to an API error
pub(crate) fn unwrap_envelope<T>(envelope: Envelope<T>, endpoint: &str) -> Result<T, SearchError> {
    if envelope.status == Some(false) {
        return Err(SearchError::ApiError(extract_message(envelope.message)));
    }
    envelope
        .data
        .ok_or_else(|| SearchError::Malformed(format!("{endpoint}: missing data field")))
}

// ---------------------------------------------------------------------------
// searchAirport

#[derive(Debug, Deserialize)]
pub(crate) struct RawSuggestion {
    pub presentation: Option<RawPresentation>,
    pub navigation: Option<RawNavigation>,
    #[serde(rename = "skyId")]
    pub sky_id: Option<String>,
    #[serde(rename = "entityId")]
    pub entity_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPresentation {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(rename = "suggestionTitle")]
    pub suggestion_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNavigation {
    #[serde(rename = "entityType")]
    pub entity_type: Option<String>,
    #[serde(rename = "relevantFlightParams")]
    pub relevant_flight_params: Option<RawFlightParams>,
    #[serde(rename = "relevantHotelParams")]
    pub relevant_hotel_params: Option<RawHotelParams>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFlightParams {
    #[serde(rename = "skyId")]
    pub sky_id: Option<String>,
    #[serde(rename = "entityId")]
    pub entity_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHotelParams {
    #[serde(rename = "entityType")]
    pub entity_type: Option<String>,
    #[serde(rename = "entityId")]
    pub entity_id: Option<String>,
    #[serde(rename = "localizedName")]
    pub localized_name: Option<String>,
}

/// Decode the suggestion list. Entries missing their identifier pair are
/// skipped with a warning instead of failing the whole lookup.
pub(crate) fn decode_suggestions(raw: Vec<RawSuggestion>) -> Vec<AirportSuggestion> {
    raw.into_iter().filter_map(decode_suggestion).collect()
}

fn decode_suggestion(raw: RawSuggestion) -> Option<AirportSuggestion> {
    let flight_params = raw
        .navigation
        .as_ref()
        .and_then(|n| n.relevant_flight_params.as_ref());
    let sky_id = flight_params
        .and_then(|p| p.sky_id.clone())
        .or(raw.sky_id);
    let entity_id = flight_params
        .and_then(|p| p.entity_id.clone())
        .or(raw.entity_id);
    let title = raw.presentation.as_ref().and_then(|p| {
        p.suggestion_title
            .clone()
            .or_else(|| p.title.clone())
    });

    let (Some(sky_id), Some(entity_id), Some(title)) = (sky_id, entity_id, title) else {
        warn!("Skipping suggestion without identifiers");
        return None;
    };

    let is_airport = raw
        .navigation
        .as_ref()
        .and_then(|n| n.entity_type.as_deref())
        == Some("AIRPORT");

    let parent_city = raw
        .navigation
        .as_ref()
        .and_then(|n| n.relevant_hotel_params.as_ref())
        .filter(|h| is_airport && h.entity_type.as_deref() == Some("CITY"))
        .and_then(|h| {
            Some(ParentCity {
                entity_id: h.entity_id.clone()?,
                name: h.localized_name.clone()?,
            })
        });

    Some(AirportSuggestion {
        sky_id,
        entity_id,
        title,
        subtitle: raw.presentation.and_then(|p| p.subtitle),
        is_airport,
        parent_city,
    })
}

// ---------------------------------------------------------------------------
// searchFlights

#[derive(Debug, Deserialize)]
pub(crate) struct RawFlightSearch {
    pub context: Option<RawContext>,
    pub itineraries: Option<Vec<RawItinerary>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawContext {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawItinerary {
    pub id: Option<String>,
    pub price: Option<RawPrice>,
    pub legs: Option<Vec<RawLeg>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPrice {
    pub raw: Option<f64>,
    pub formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLeg {
    pub origin: Option<RawPlace>,
    pub destination: Option<RawPlace>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    #[serde(rename = "durationInMinutes")]
    pub duration_in_minutes: Option<i64>,
    #[serde(rename = "stopCount")]
    pub stop_count: Option<i32>,
    pub carriers: Option<RawCarriers>,
    pub segments: Option<Vec<RawSegment>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "displayCode")]
    pub display_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCarriers {
    pub marketing: Option<Vec<RawCarrier>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCarrier {
    pub name: Option<String>,
    #[serde(rename = "logoUrl")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSegment {
    pub origin: Option<RawPlace>,
    pub destination: Option<RawPlace>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    #[serde(rename = "durationInMinutes")]
    pub duration_in_minutes: Option<i64>,
    #[serde(rename = "flightNumber")]
    pub flight_number: Option<String>,
    #[serde(rename = "marketingCarrier")]
    pub marketing_carrier: Option<RawMarketingCarrier>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMarketingCarrier {
    #[serde(rename = "displayCode")]
    pub display_code: Option<String>,
}

pub(crate) fn decode_flight_search(raw: RawFlightSearch) -> Result<FlightSearchData, SearchError> {
    let itineraries = raw
        .itineraries
        .unwrap_or_default()
        .into_iter()
        .map(decode_itinerary)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FlightSearchData {
        session_id: raw.context.and_then(|c| c.session_id),
        itineraries,
    })
}

fn decode_itinerary(raw: RawItinerary) -> Result<Itinerary, SearchError> {
    let id = raw
        .id
        .ok_or_else(|| SearchError::Malformed("itinerary missing id".to_string()))?;
    let price = decode_price(raw.price)
        .ok_or_else(|| SearchError::Malformed(format!("itinerary {id} missing price")))?;
    let legs = raw
        .legs
        .unwrap_or_default()
        .into_iter()
        .map(decode_leg)
        .collect::<Result<Vec<_>, _>>()?;
    if legs.is_empty() {
        return Err(SearchError::Malformed(format!("itinerary {id} has no legs")));
    }

    Ok(Itinerary { id, price, legs })
}

pub(crate) fn decode_price(raw: Option<RawPrice>) -> Option<Price> {
    let raw = raw?;
    Some(Price {
        raw: raw.raw,
        formatted: raw.formatted?,
    })
}

pub(crate) fn decode_leg(raw: RawLeg) -> Result<Leg, SearchError> {
    let origin = raw
        .origin
        .ok_or_else(|| SearchError::Malformed("leg missing origin".to_string()))?;
    let destination = raw
        .destination
        .ok_or_else(|| SearchError::Malformed("leg missing destination".to_string()))?;
    let carrier = raw
        .carriers
        .and_then(|c| c.marketing)
        .and_then(|mut m| if m.is_empty() { None } else { Some(m.remove(0)) })
        .ok_or_else(|| SearchError::Malformed("leg missing marketing carrier".to_string()))?;

    let segments = raw
        .segments
        .unwrap_or_default()
        .into_iter()
        .filter_map(decode_segment)
        .collect();

    Ok(Leg {
        origin_id: place_id(&origin)
            .ok_or_else(|| SearchError::Malformed("leg origin missing id".to_string()))?,
        origin_code: origin.display_code.clone().unwrap_or_default(),
        origin_name: origin.name.unwrap_or_default(),
        destination_id: place_id(&destination)
            .ok_or_else(|| SearchError::Malformed("leg destination missing id".to_string()))?,
        destination_code: destination.display_code.clone().unwrap_or_default(),
        destination_name: destination.name.unwrap_or_default(),
        departure: raw
            .departure
            .ok_or_else(|| SearchError::Malformed("leg missing departure".to_string()))?,
        arrival: raw
            .arrival
            .ok_or_else(|| SearchError::Malformed("leg missing arrival".to_string()))?,
        duration_minutes: raw.duration_in_minutes.unwrap_or(0),
        stop_count: raw.stop_count.unwrap_or(0),
        carrier: Carrier {
            name: carrier.name.unwrap_or_default(),
            logo_url: carrier.logo_url,
        },
        segments,
    })
}

fn place_id(place: &RawPlace) -> Option<String> {
    place.id.clone().or_else(|| place.display_code.clone())
}

/// Segments are presentation-only, so a short entry is dropped rather than
/// failing the itinerary.
fn decode_segment(raw: RawSegment) -> Option<Segment> {
    Some(Segment {
        origin: raw.origin.as_ref().and_then(|p| p.display_code.clone())?,
        destination: raw
            .destination
            .as_ref()
            .and_then(|p| p.display_code.clone())?,
        departure: raw.departure?,
        arrival: raw.arrival?,
        duration_minutes: raw.duration_in_minutes.unwrap_or(0),
        flight_number: raw.flight_number?,
        marketing_carrier: raw.marketing_carrier.and_then(|c| c.display_code)?,
    })
}

// ---------------------------------------------------------------------------
// getFlightDetails

#[derive(Debug, Deserialize)]
pub(crate) struct RawDetail {
    pub itinerary: Option<RawDetailItinerary>,
    #[serde(rename = "destinationImage")]
    pub destination_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDetailItinerary {
    pub legs: Option<Vec<RawLeg>>,
    pub price: Option<RawPrice>,
    #[serde(rename = "pricingOptions")]
    pub pricing_options: Option<Vec<RawPricingOption>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPricingOption {
    #[serde(rename = "totalPrice")]
    pub total_price: Option<f64>,
    pub agents: Option<Vec<RawAgent>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAgent {
    pub name: Option<String>,
    pub url: Option<String>,
    pub rating: Option<RawRating>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRating {
    pub value: Option<f64>,
    pub count: Option<i64>,
}

/// Detail payload decoded up to the price merge performed by the fetcher.
/// `price` stays optional here because the endpoint does not always echo it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecodedDetail {
    pub legs: Vec<Leg>,
    pub price: Option<Price>,
    pub destination_image: Option<String>,
    pub pricing_options: Vec<PricingOption>,
}

/// Decode a detail payload. `Ok(None)` means the response was well-formed
/// but carried no itinerary, which the fetcher reports as "no details".
pub(crate) fn decode_detail(raw: RawDetail) -> Result<Option<DecodedDetail>, SearchError> {
    let Some(itinerary) = raw.itinerary else {
        return Ok(None);
    };

    let legs = itinerary
        .legs
        .unwrap_or_default()
        .into_iter()
        .map(decode_leg)
        .collect::<Result<Vec<_>, _>>()?;
    if legs.is_empty() {
        return Ok(None);
    }

    let pricing_options = itinerary
        .pricing_options
        .unwrap_or_default()
        .into_iter()
        .filter_map(decode_pricing_option)
        .collect();

    Ok(Some(DecodedDetail {
        legs,
        price: decode_price(itinerary.price),
        destination_image: raw.destination_image,
        pricing_options,
    }))
}

fn decode_pricing_option(raw: RawPricingOption) -> Option<PricingOption> {
    let total_price = raw.total_price?;
    let mut agents = raw.agents?;
    if agents.is_empty() {
        return None;
    }
    let agent = agents.remove(0);
    Some(PricingOption {
        agent_name: agent.name?,
        total_price,
        rating: agent.rating.and_then(|r| {
            Some(AgentRating {
                value: r.value?,
                count: r.count?,
            })
        }),
        url: agent.url?,
    })
}

// ---------------------------------------------------------------------------
// getNearByAirports

#[derive(Debug, Deserialize)]
pub(crate) struct RawNearby {
    pub current: Option<RawSuggestion>,
    pub nearby: Option<Vec<RawSuggestion>>,
}

pub(crate) fn decode_nearby(raw: RawNearby) -> NearbyAirports {
    NearbyAirports {
        current: raw.current.and_then(decode_suggestion),
        nearby: decode_suggestions(raw.nearby.unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_string() {
        let msg = extract_message(Some(Value::String("bad key".to_string())));
        assert_eq!(msg, "bad key");
    }

    #[test]
    fn test_extract_message_session_array() {
        let value: Value =
            serde_json::from_str(r#"[{"sessionId": "session expired"}]"#).unwrap();
        assert_eq!(extract_message(Some(value)), "session expired");
    }

    #[test]
    fn test_decode_suggestion_skips_missing_ids() {
        let raw: Vec<RawSuggestion> = serde_json::from_str(
            r#"[
                {"presentation": {"title": "Nowhere"}},
                {
                    "presentation": {"title": "London Heathrow", "suggestionTitle": "London Heathrow (LHR)"},
                    "navigation": {
                        "entityType": "AIRPORT",
                        "relevantFlightParams": {"skyId": "LHR", "entityId": "95565050"}
                    }
                }
            ]"#,
        )
        .unwrap();

        let decoded = decode_suggestions(raw);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].sky_id, "LHR");
        assert_eq!(decoded[0].title, "London Heathrow (LHR)");
        assert!(decoded[0].is_airport);
    }

    #[test]
    fn test_decode_itinerary_requires_legs() {
        let raw = RawItinerary {
            id: Some("it-1".to_string()),
            price: Some(RawPrice {
                raw: Some(120.0),
                formatted: Some("$120".to_string()),
            }),
            legs: Some(Vec::new()),
        };
        assert!(matches!(
            decode_itinerary(raw),
            Err(SearchError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_detail_without_itinerary() {
        let raw = RawDetail {
            itinerary: None,
            destination_image: Some("https://example.com/nyc.jpg".to_string()),
        };
        assert!(decode_detail(raw).unwrap().is_none());
    }
}
