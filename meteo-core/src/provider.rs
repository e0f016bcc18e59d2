use crate::{
    Config,
    error::LookupError,
    model::{Coordinates, DailyRecord},
    provider::openmeteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

pub mod openmeteo;

/// `current_weather` block of a forecast response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub time: String,
    pub temperature: f64,
    pub weathercode: i32,
}

/// `daily` block shared by the forecast and archive endpoints: parallel
/// arrays indexed by day.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub weathercode: Vec<Option<i32>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Zip the parallel arrays into one record per day.
    pub fn records(&self) -> Result<Vec<DailyRecord>, LookupError> {
        let n = self.time.len();
        if self.weathercode.len() != n
            || self.temperature_2m_max.len() != n
            || self.temperature_2m_min.len() != n
        {
            return Err(LookupError::InconsistentDaily);
        }

        Ok((0..n).filter_map(|i| self.day(i)).collect())
    }

    /// Record for day `index`, if every array has an entry there.
    pub fn day(&self, index: usize) -> Option<DailyRecord> {
        Some(DailyRecord {
            date: self.time.get(index)?.clone(),
            weather_code: *self.weathercode.get(index)?,
            temp_max: *self.temperature_2m_max.get(index)?,
            temp_min: *self.temperature_2m_min.get(index)?,
        })
    }
}

/// Raw access to a weather data source.
///
/// `Ok(None)` means the service answered but left out the section asked for;
/// `Err` means the request itself failed.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Best match for `city`, if any.
    async fn geocode(&self, city: &str) -> anyhow::Result<Option<Coordinates>>;

    async fn current(&self, at: Coordinates) -> anyhow::Result<Option<CurrentWeather>>;

    async fn daily_forecast(&self, at: Coordinates) -> anyhow::Result<Option<DailySeries>>;

    /// Observed daily values for a single past `date` (YYYY-MM-DD).
    async fn archive_day(&self, at: Coordinates, date: &str)
    -> anyhow::Result<Option<DailySeries>>;
}

/// Construct the Open-Meteo provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let http = config.http_client()?;
    Ok(Box::new(OpenMeteoProvider::with_client(config.endpoints.clone(), http)))
}
