//! Domain records produced by the API boundary
//!
//! Everything in this module is a validated, read-only value: the raw
//! payload shapes live in `wire` and are decoded exactly once, so the
//! rest of the pipeline never touches untyped JSON.

use chrono::DateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Geographic coordinate used by the nearby-airports flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// City a suggested airport belongs to, used for grouping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentCity {
    pub entity_id: String,
    pub name: String,
}

/// One airport or city suggestion returned by the airport lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportSuggestion {
    pub sky_id: String,
    pub entity_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub is_airport: bool,
    pub parent_city: Option<ParentCity>,
}

/// Suggestions grouped for rendering: a city header owning zero or more
/// airports, or a singleton group carrying its source suggestion directly
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionGroup {
    pub key: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub airports: Vec<AirportSuggestion>,
    /// Set on singleton groups so the entry is selectable as-is
    pub direct: Option<AirportSuggestion>,
}

/// Price as supplied by the API, with the formatted string kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub raw: Option<f64>,
    pub formatted: String,
}

/// Formatted price split into currency symbol and numeric amount
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPrice {
    pub currency: String,
    pub amount: f64,
}

impl Price {
    /// Parse the formatted string (e.g. "$1,234") into currency and amount.
    /// Returns None when the string carries no digits.
    pub fn parse_formatted(&self) -> Option<ParsedPrice> {
        let cleaned = self.formatted.replace(',', "");
        let re = Regex::new(r"([^\d]*)(\d+(?:\.\d+)?)").ok()?;
        let captures = re.captures(&cleaned)?;
        let currency = captures
            .get(1)
            .map_or("", |m| m.as_str())
            .trim()
            .to_string();
        let amount = captures.get(2)?.as_str().parse::<f64>().ok()?;
        Some(ParsedPrice {
            currency: if currency.is_empty() {
                "$".to_string()
            } else {
                currency
            },
            amount,
        })
    }
}

/// Marketing carrier operating a leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub name: String,
    pub logo_url: Option<String>,
}

/// One physical flight number within a leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub origin: String,
    pub destination: String,
    pub departure: String,
    pub arrival: String,
    pub duration_minutes: i64,
    pub flight_number: String,
    pub marketing_carrier: String,
}

/// One directional flight between two airports within an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub origin_id: String,
    pub origin_code: String,
    pub origin_name: String,
    pub destination_id: String,
    pub destination_code: String,
    pub destination_name: String,
    pub departure: String,
    pub arrival: String,
    pub duration_minutes: i64,
    pub stop_count: i32,
    pub carrier: Carrier,
    pub segments: Vec<Segment>,
}

impl Leg {
    /// Travel date portion (`YYYY-MM-DD`) of the departure timestamp
    pub fn departure_date(&self) -> &str {
        self.departure.split('T').next().unwrap_or(&self.departure)
    }
}

/// One priced itinerary with one (one-way) or two (round-trip) legs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: String,
    pub price: Price,
    pub legs: Vec<Leg>,
}

impl Itinerary {
    /// Outbound leg. Decoding guarantees at least one leg per itinerary.
    pub fn first_leg(&self) -> Option<&Leg> {
        self.legs.first()
    }
}

/// Result of a successful flight search: the session token issued by the
/// API plus the ordered itinerary list. The token must be threaded into
/// every per-itinerary detail request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSession {
    pub session_id: String,
    pub itineraries: Vec<Itinerary>,
}

/// Decoded flight-search payload before outcome classification
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearchData {
    pub session_id: Option<String>,
    pub itineraries: Vec<Itinerary>,
}

/// Agent rating attached to a pricing option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRating {
    pub value: f64,
    pub count: i64,
}

/// One bookable offer for an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOption {
    pub agent_name: String,
    pub total_price: f64,
    pub rating: Option<AgentRating>,
    pub url: String,
}

/// Segment-level detail for a selected itinerary, including booking options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDetail {
    pub legs: Vec<Leg>,
    pub price: Price,
    pub destination_image: Option<String>,
    pub pricing_options: Vec<PricingOption>,
}

/// Airports around a coordinate: the closest match plus the wider list
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyAirports {
    pub current: Option<AirportSuggestion>,
    pub nearby: Vec<AirportSuggestion>,
}

/// Render a duration in minutes as "7h 25m"
pub fn format_duration(minutes: i64) -> String {
    let h = minutes / 60;
    let m = minutes % 60;
    format!("{}h {}m", h, m)
}

/// Render the time-of-day portion of an ISO timestamp as "HH:MM".
/// Unparseable input renders as "-" rather than failing the view.
pub fn format_clock_time(iso: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return dt.format("%H:%M").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%H:%M").to_string();
    }
    "-".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(445), "7h 25m");
        assert_eq!(format_duration(60), "1h 0m");
        assert_eq!(format_duration(0), "0h 0m");
    }

    #[test]
    fn test_format_clock_time() {
        assert_eq!(format_clock_time("2025-08-15T06:45:00"), "06:45");
        assert_eq!(format_clock_time("2025-08-15T06:45:00+02:00"), "06:45");
        assert_eq!(format_clock_time("not-a-timestamp"), "-");
    }

    #[test]
    fn test_parse_formatted_price() {
        let price = Price {
            raw: Some(1234.0),
            formatted: "$1,234".to_string(),
        };
        let parsed = price.parse_formatted().unwrap();
        assert_eq!(parsed.currency, "$");
        assert_eq!(parsed.amount, 1234.0);

        let euro = Price {
            raw: None,
            formatted: "€89.50".to_string(),
        };
        let parsed = euro.parse_formatted().unwrap();
        assert_eq!(parsed.currency, "€");
        assert_eq!(parsed.amount, 89.5);

        let empty = Price {
            raw: None,
            formatted: "free".to_string(),
        };
        assert!(empty.parse_formatted().is_none());
    }

    #[test]
    fn test_departure_date() {
        let leg = sample_leg();
        assert_eq!(leg.departure_date(), "2025-08-15");
    }

    fn sample_leg() -> Leg {
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
}
