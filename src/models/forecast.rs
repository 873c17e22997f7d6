//! One entry of the flattened daily forecast

use serde::{Deserialize, Serialize};

/// A single day of the forecast, built from index `i` of every daily array.
///
/// Values are copied from the provider as-is; the provider may report `null`
/// for days it has no data for.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    /// Calendar date in the location's timezone (`YYYY-MM-DD`)
    pub date: String,
    /// Daily maximum temperature in Celsius
    pub max_temp: Option<f64>,
    /// Daily minimum temperature in Celsius
    pub min_temp: Option<f64>,
    /// Precipitation sum in mm
    pub precipitation: Option<f64>,
    /// WMO weather code
    pub weather_code: Option<u8>,
}
