//! Weather aggregation backed by `OpenMeteo`
//!
//! A free-text location is resolved to coordinates with the geocoding API,
//! the forecast API is queried for those coordinates, and both answers are
//! flattened into one [`WeatherSnapshot`].

use std::time::Instant;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::{DailyForecast, GeoResult, WeatherSnapshot};
use crate::upstream::read_json;
use crate::{Result, VoiceRelayError};

pub mod open_meteo;

use open_meteo::{CURRENT_FIELDS, DAILY_FIELDS, DailyData, ForecastResponse, GeocodingResponse};

/// `OpenMeteo` geocoding + forecast client
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
    forecast_days: u8,
}

impl OpenMeteoClient {
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            forecast_days: config.forecast_days,
        }
    }

    /// Resolve `location` and return its current weather and daily forecast
    pub async fn weather_for(&self, location: &str) -> Result<WeatherSnapshot> {
        let start_time = Instant::now();

        let resolved = self.geocode(location).await?;
        let forecast = self.fetch_forecast(&resolved).await?;
        let snapshot = build_snapshot(resolved, forecast)?;

        let total_duration = start_time.elapsed();
        let temperature = snapshot
            .temperature
            .map_or_else(|| "n/a".to_string(), |t| format!("{t:.1}°C"));
        info!(
            "Weather for '{}': {}, {} ({} forecast days) in {:.3}s",
            snapshot.location_name,
            temperature,
            snapshot.description(),
            snapshot.forecast_daily.len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow weather lookup detected: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(snapshot)
    }

    /// Resolve a place name to its first geocoding match
    #[instrument(skip(self))]
    pub async fn geocode(&self, location: &str) -> Result<GeoResult> {
        let url = format!(
            "{}?name={}&count=1&format=json",
            self.geocoding_url,
            urlencoding::encode(location)
        );
        debug!("OpenMeteo geocoding request URL: {}", url);

        let response = self.client.get(&url).send().await?;
        let geocoding: GeocodingResponse = read_json(response, "OpenMeteo geocoding").await?;

        let Some(first) = geocoding.results.and_then(|results| results.into_iter().next()) else {
            warn!("No results found for location '{}'", location);
            return Err(VoiceRelayError::not_found(format!(
                "Could not find coordinates for {location}"
            )));
        };

        let qualified_name = first.qualified_name();
        let resolved = GeoResult::from(first);
        debug!(
            "Resolved '{}' to {} ({})",
            location,
            qualified_name,
            resolved.format_coordinates()
        );
        Ok(resolved)
    }

    /// Fetch current conditions and the daily series for a resolved location
    #[instrument(skip(self, location), fields(lat = location.latitude, lon = location.longitude))]
    pub async fn fetch_forecast(&self, location: &GeoResult) -> Result<ForecastResponse> {
        let url = format!(
            "{}?latitude={}&longitude={}&current={}&daily={}&timezone=auto&forecast_days={}",
            self.forecast_url,
            location.latitude,
            location.longitude,
            CURRENT_FIELDS,
            DAILY_FIELDS,
            self.forecast_days
        );
        debug!("OpenMeteo forecast request URL: {}", url);

        let response = self.client.get(&url).send().await?;
        let forecast: ForecastResponse = read_json(response, "OpenMeteo forecast").await?;

        debug!(
            "Forecast timezone {} with {} daily entries",
            forecast.timezone.as_deref().unwrap_or("unknown"),
            forecast.daily.time.len()
        );
        Ok(forecast)
    }
}

/// Combine a geocoding match and its forecast into one snapshot
pub fn build_snapshot(location: GeoResult, forecast: ForecastResponse) -> Result<WeatherSnapshot> {
    let forecast_daily = flatten_daily(&forecast.daily)?;
    let current = forecast.current;

    Ok(WeatherSnapshot {
        temperature: current.temperature,
        humidity: current.humidity,
        precipitation: current.precipitation,
        wind_speed: current.wind_speed,
        weather_code: current.weather_code,
        current_time: current.time,
        latitude: location.latitude,
        longitude: location.longitude,
        location_name: location.location_name,
        forecast_daily,
    })
}

/// Zip the parallel daily arrays by index into one record per day.
///
/// `daily.time` drives the length; a shorter companion array is an error
/// rather than a silently truncated forecast.
pub fn flatten_daily(daily: &DailyData) -> Result<Vec<DailyForecast>> {
    let expected = daily.time.len();

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| {
            Ok(DailyForecast {
                date: date.clone(),
                max_temp: column(&daily.temperature_max, i, expected, "temperature_2m_max")?,
                min_temp: column(&daily.temperature_min, i, expected, "temperature_2m_min")?,
                precipitation: column(&daily.precipitation, i, expected, "precipitation_sum")?,
                weather_code: column(&daily.weather_code, i, expected, "weather_code")?,
            })
        })
        .collect()
}

fn column<T: Copy>(
    values: &[Option<T>],
    index: usize,
    expected: usize,
    name: &str,
) -> Result<Option<T>> {
    values.get(index).copied().ok_or_else(|| {
        VoiceRelayError::decode(format!(
            "daily.{name} has {} entries, expected {expected}",
            values.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use open_meteo::CurrentData;

    fn daily(days: &[&str]) -> DailyData {
        DailyData {
            time: days.iter().map(|d| (*d).to_string()).collect(),
            temperature_max: days.iter().map(|_| Some(10.0)).collect(),
            temperature_min: days.iter().map(|_| Some(2.0)).collect(),
            precipitation: days.iter().map(|_| Some(0.0)).collect(),
            weather_code: days.iter().map(|_| Some(3)).collect(),
        }
    }

    fn current() -> CurrentData {
        CurrentData {
            time: "2024-12-17T14:00".to_string(),
            temperature: Some(6.4),
            humidity: Some(87.0),
            precipitation: Some(0.1),
            wind_speed: Some(11.2),
            weather_code: Some(3),
        }
    }

    #[test]
    fn test_flatten_keeps_provider_order_and_length() {
        let days = ["2024-12-17", "2024-12-18", "2024-12-19"];
        let mut data = daily(&days);
        data.temperature_max = vec![Some(7.5), Some(8.0), Some(6.1)];

        let flattened = flatten_daily(&data).unwrap();

        assert_eq!(flattened.len(), data.time.len());
        for (i, day) in flattened.iter().enumerate() {
            assert_eq!(day.date, data.time[i]);
        }
        assert_eq!(flattened[1].max_temp, Some(8.0));
        assert_eq!(flattened[2].weather_code, Some(3));
    }

    #[test]
    fn test_flatten_zips_by_index_not_by_date() {
        // Dates out of order upstream stay out of order.
        let data = daily(&["2024-12-19", "2024-12-17"]);
        let flattened = flatten_daily(&data).unwrap();
        assert_eq!(flattened[0].date, "2024-12-19");
        assert_eq!(flattened[1].date, "2024-12-17");
    }

    #[test]
    fn test_flatten_passes_nulls_through() {
        let mut data = daily(&["2024-12-17"]);
        data.precipitation = vec![None];
        let flattened = flatten_daily(&data).unwrap();
        assert_eq!(flattened[0].precipitation, None);
        assert_eq!(flattened[0].max_temp, Some(10.0));
    }

    #[test]
    fn test_flatten_rejects_short_companion_array() {
        let mut data = daily(&["2024-12-17", "2024-12-18"]);
        data.temperature_min = vec![Some(1.0)];
        let err = flatten_daily(&data).unwrap_err();
        assert!(matches!(err, VoiceRelayError::Decode { .. }));
        assert!(err.to_string().contains("temperature_2m_min has 1 entries, expected 2"));
    }

    #[test]
    fn test_flatten_empty_series() {
        assert!(flatten_daily(&daily(&[])).unwrap().is_empty());
    }

    #[test]
    fn test_build_snapshot_combines_both_calls() {
        let location = GeoResult::new(51.21989, 4.40346, "Antwerpen".to_string());
        let forecast = ForecastResponse {
            timezone: Some("Europe/Brussels".to_string()),
            current: current(),
            daily: daily(&["2024-12-17", "2024-12-18"]),
        };

        let snapshot = build_snapshot(location, forecast).unwrap();

        assert_eq!(snapshot.location_name, "Antwerpen");
        assert_eq!(snapshot.latitude, 51.21989);
        assert_eq!(snapshot.temperature, Some(6.4));
        assert_eq!(snapshot.humidity, Some(87.0));
        assert_eq!(snapshot.current_time, "2024-12-17T14:00");
        assert_eq!(snapshot.forecast_daily.len(), 2);
    }

    #[test]
    fn test_build_snapshot_keeps_missing_current_values() {
        let location = GeoResult::new(51.21989, 4.40346, "Antwerpen".to_string());
        let mut now = current();
        now.precipitation = None;
        now.weather_code = None;
        let forecast = ForecastResponse {
            timezone: None,
            current: now,
            daily: daily(&["2024-12-17"]),
        };

        let snapshot = build_snapshot(location, forecast).unwrap();

        assert_eq!(snapshot.precipitation, None);
        assert_eq!(snapshot.weather_code, None);
        assert_eq!(snapshot.wind_speed, Some(11.2));
        assert_eq!(snapshot.description(), "Unknown");
    }
}
