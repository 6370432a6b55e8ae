//! Nearby-airport browsing with graceful location degradation

use tracing::warn;

use crate::client::SkyClient;
use crate::models::{Coordinate, NearbyAirports};
use crate::SearchError;

/// Fallback region used when no device position is available (New York)
pub const DEFAULT_REGION: Coordinate = Coordinate {
    latitude: 40.7128,
    longitude: -74.006,
};

/// What the location collaborator yielded: a position, or a denial that
/// must degrade to the default region rather than block the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationFix {
    Position(Coordinate),
    PermissionDenied,
}

impl LocationFix {
    /// The coordinate to search around, falling back to the default
    /// region on permission denial
    pub fn effective_position(&self) -> Coordinate {
        match self {
            LocationFix::Position(coordinate) => *coordinate,
            LocationFix::PermissionDenied => {
                warn!("Location permission denied, falling back to default region");
                DEFAULT_REGION
            }
        }
    }
}

/// Fetch the airports around the effective position
pub async fn nearby_airports(
    client: &SkyClient,
    fix: &LocationFix,
    locale: &str,
) -> Result<NearbyAirports, SearchError> {
    let position = fix.effective_position();
    client
        .get_nearby_airports(position.latitude, position.longitude, locale)
        .await
}
