use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Geographic position of a resolved city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResult {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub time: String,
    pub temperature: f64,
    pub weather_code: i32,
}

/// One day of a daily series. Values may be missing for days the provider has
/// no observation for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: String,
    pub weather_code: Option<i32>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub forecast: Vec<DailyRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalResult {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: String,
    pub weather_code: Option<i32>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
}

/// Failure value handed back to the caller in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

impl From<LookupError> for ErrorResult {
    fn from(err: LookupError) -> Self {
        Self { error: err.to_string() }
    }
}

/// Either a successful record or an [`ErrorResult`].
///
/// Serialized untagged, so callers see the flat record or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupOutcome<T> {
    Found(T),
    Failed(ErrorResult),
}

impl<T> LookupOutcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LookupOutcome::Found(_) => None,
            LookupOutcome::Failed(e) => Some(e.error.as_str()),
        }
    }
}

impl<T> From<Result<T, LookupError>> for LookupOutcome<T> {
    fn from(res: Result<T, LookupError>) -> Self {
        match res {
            Ok(value) => LookupOutcome::Found(value),
            Err(err) => LookupOutcome::Failed(err.into()),
        }
    }
}

/// Coarse reading of a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    FreezingDrizzle,
    Rain,
    FreezingRain,
    Snow,
    SnowGrains,
    RainShowers,
    SnowShowers,
    Thunderstorm,
    ThunderstormWithHail,
    Unknown,
}

impl WeatherCondition {
    /// Map a WMO code as reported by Open-Meteo.
    ///
    /// - 0: clear sky
    /// - 1, 2, 3: mainly clear, partly cloudy, overcast
    /// - 45, 48: fog
    /// - 51-55 drizzle, 56-57 freezing drizzle
    /// - 61-65 rain, 66-67 freezing rain
    /// - 71-75 snow, 77 snow grains
    /// - 80-82 rain showers, 85-86 snow showers
    /// - 95 thunderstorm, 96/99 with hail
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => WeatherCondition::Clear,
            1 => WeatherCondition::MainlyClear,
            2 => WeatherCondition::PartlyCloudy,
            3 => WeatherCondition::Overcast,
            45 | 48 => WeatherCondition::Fog,
            51..=55 => WeatherCondition::Drizzle,
            56 | 57 => WeatherCondition::FreezingDrizzle,
            61..=65 => WeatherCondition::Rain,
            66 | 67 => WeatherCondition::FreezingRain,
            71..=75 => WeatherCondition::Snow,
            77 => WeatherCondition::SnowGrains,
            80..=82 => WeatherCondition::RainShowers,
            85 | 86 => WeatherCondition::SnowShowers,
            95 => WeatherCondition::Thunderstorm,
            96 | 99 => WeatherCondition::ThunderstormWithHail,
            _ => WeatherCondition::Unknown,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "clear sky",
            WeatherCondition::MainlyClear => "mainly clear",
            WeatherCondition::PartlyCloudy => "partly cloudy",
            WeatherCondition::Overcast => "overcast",
            WeatherCondition::Fog => "fog",
            WeatherCondition::Drizzle => "drizzle",
            WeatherCondition::FreezingDrizzle => "freezing drizzle",
            WeatherCondition::Rain => "rain",
            WeatherCondition::FreezingRain => "freezing rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::SnowGrains => "snow grains",
            WeatherCondition::RainShowers => "rain showers",
            WeatherCondition::SnowShowers => "snow showers",
            WeatherCondition::Thunderstorm => "thunderstorm",
            WeatherCondition::ThunderstormWithHail => "thunderstorm with hail",
            WeatherCondition::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
