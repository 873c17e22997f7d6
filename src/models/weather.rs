//! Weather snapshot returned by `/weather/{location}`

use serde::{Deserialize, Serialize};

use super::DailyForecast;

/// Current conditions plus the daily forecast for one resolved location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// Precipitation amount in mm
    pub precipitation: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
    /// WMO weather code
    pub weather_code: Option<u8>,
    /// Observation time in the location's timezone
    pub current_time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    /// One entry per upstream daily timestamp, in provider order
    pub forecast_daily: Vec<DailyForecast>,
}

impl WeatherSnapshot {
    /// Human-readable description of the current weather code
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.weather_code
            .map_or("Unknown", weather_code_to_description)
    }
}

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 | 57 => "Freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
