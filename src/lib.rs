//! `VoiceRelay` - backend relay for a realtime voice assistant
//!
//! This library mints ephemeral realtime-session tokens and aggregates
//! weather (Open-Meteo) and web/image search (Serper) answers for the
//! assistant's tool calls.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod session;
pub mod telemetry;
pub mod upstream;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::VoiceRelayConfig;
pub use error::{ApiError, VoiceRelayError};
pub use models::{DailyForecast, GeoResult, SearchResult, WeatherSnapshot};
pub use search::SerperClient;
pub use session::{RealtimeSessionClient, SessionRequest};
pub use weather::OpenMeteoClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, VoiceRelayError>;
