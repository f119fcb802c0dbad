use serde::{Deserialize, Serialize};

use super::card::Card;

/// A device position fix
///
/// Serializes as the `{ latitude, longitude }` body of a location check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Coordinates echoed back by the backend in a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A merchant near the evaluated location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub name: String,
    pub category: String,
    /// Distance from the evaluated location, in miles
    #[serde(default)]
    pub distance: f64,
}

/// Backend-computed card suggestion for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// `None` when no card beats a zero rate at the matched merchant
    pub card: Option<Card>,
    pub merchant: Merchant,
    pub rate: f64,
    pub location: LatLng,
    #[serde(default)]
    pub all_nearby: Vec<Merchant>,
}

/// Body of `POST /api/location/check`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationCheckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
}

impl LocationCheckResponse {
    /// The recommendation worth showing, if any
    pub fn into_recommendation(self) -> Option<Recommendation> {
        if !self.success {
            return None;
        }
        self.recommendation.filter(|r| r.card.is_some())
    }
}
