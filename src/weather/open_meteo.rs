//! `OpenMeteo` API response structures

use serde::Deserialize;

use crate::models::GeoResult;

/// Instantaneous fields requested from the forecast endpoint
pub const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,weather_code";

/// Daily series requested from the forecast endpoint
pub const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,weather_code";

/// Geocoding response from `OpenMeteo`. `results` is absent when nothing matched.
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
}

impl GeocodingResult {
    /// Name qualified with region and country, e.g. `Antwerpen, Flanders, Belgium`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        [Some(self.name.as_str()), self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<GeocodingResult> for GeoResult {
    fn from(result: GeocodingResult) -> Self {
        GeoResult::new(result.latitude, result.longitude, result.name)
    }
}

/// Forecast response from `OpenMeteo`. Both blocks are required.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub timezone: Option<String>,
    pub current: CurrentData,
    pub daily: DailyData,
}

/// Current weather data from `OpenMeteo`. Any variable may come back `null`
/// when the model has no value for it yet.
#[derive(Debug, Deserialize)]
pub struct CurrentData {
    pub time: String,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<f64>,
    #[serde(rename = "relative_humidity_2m")]
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<f64>,
    pub weather_code: Option<u8>,
}

/// Daily weather data from `OpenMeteo`, one parallel array per variable
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<Option<f64>>,
    #[serde(rename = "precipitation_sum")]
    pub precipitation: Vec<Option<f64>>,
    pub weather_code: Vec<Option<u8>>,
}
