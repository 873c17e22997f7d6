//! Location model for a resolved geocoding match

use serde::{Deserialize, Serialize};

/// First match returned by the geocoding provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeoResult {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Place name as spelled by the provider
    pub location_name: String,
}

impl GeoResult {
    /// Create a new geocoding match
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, location_name: String) -> Self {
        Self {
            latitude,
            longitude,
            location_name,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
