//! Data models for the VoiceRelay service
//!
//! Response shapes handed to clients, organized by concern:
//! - Location: a resolved geocoding match
//! - Weather: current conditions plus the flattened daily forecast
//! - Forecast: one day of the daily series
//! - Search: the single denormalized search answer

pub mod forecast;
pub mod location;
pub mod search;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::DailyForecast;
pub use location::GeoResult;
pub use search::SearchResult;
pub use weather::WeatherSnapshot;
