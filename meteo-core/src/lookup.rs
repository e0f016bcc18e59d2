//! City-level weather lookups.
//!
//! Every operation geocodes the city first and then makes one weather request.
//! Failures come back as [`LookupOutcome::Failed`], never as a fault.

use tracing::{debug, warn};

use crate::{
    Config,
    error::LookupError,
    model::{Coordinates, ForecastResult, HistoricalResult, LookupOutcome, WeatherResult},
    provider::{WeatherProvider, provider_from_config},
};

#[derive(Debug)]
pub struct WeatherLookup {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherLookup {
    pub fn new(provider: impl WeatherProvider + 'static) -> Self {
        Self { provider: Box::new(provider) }
    }

    pub fn from_boxed(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::from_boxed(provider_from_config(config)?))
    }

    /// Resolve `city` to coordinates. Any failure, including a transport
    /// error, is reported as [`LookupError::CityNotFound`].
    pub async fn resolve_coordinates(&self, city: &str) -> Result<Coordinates, LookupError> {
        match self.provider.geocode(city).await {
            Ok(Some(coords)) => Ok(coords),
            Ok(None) => {
                debug!(city, "geocoding returned no results");
                Err(LookupError::CityNotFound)
            }
            Err(err) => {
                debug!(city, error = %format!("{err:#}"), "geocoding failed");
                Err(LookupError::CityNotFound)
            }
        }
    }

    pub async fn fetch_current(&self, city: &str) -> Result<WeatherResult, LookupError> {
        let at = self.resolve_coordinates(city).await?;

        let current = self
            .provider
            .current(at)
            .await
            .map_err(|err| upstream(city, "current weather", &err))?
            .ok_or(LookupError::WeatherUnavailable)?;

        Ok(WeatherResult {
            city: city.to_string(),
            latitude: at.latitude,
            longitude: at.longitude,
            time: current.time,
            temperature: current.temperature,
            weather_code: current.weathercode,
        })
    }

    pub async fn fetch_forecast(&self, city: &str) -> Result<ForecastResult, LookupError> {
        let at = self.resolve_coordinates(city).await?;

        let daily = self
            .provider
            .daily_forecast(at)
            .await
            .map_err(|err| upstream(city, "daily forecast", &err))?
            .ok_or(LookupError::ForecastUnavailable)?;

        if daily.is_empty() {
            return Err(LookupError::ForecastUnavailable);
        }

        Ok(ForecastResult {
            city: city.to_string(),
            latitude: at.latitude,
            longitude: at.longitude,
            forecast: daily.records()?,
        })
    }

    /// Observed weather on `date` (YYYY-MM-DD). The date is passed through to
    /// the archive service as given.
    pub async fn fetch_historical(
        &self,
        city: &str,
        date: &str,
    ) -> Result<HistoricalResult, LookupError> {
        let at = self.resolve_coordinates(city).await?;

        let daily = self
            .provider
            .archive_day(at, date)
            .await
            .map_err(|err| upstream(city, "archive", &err))?
            .ok_or(LookupError::HistoricalUnavailable)?;

        if daily.is_empty() {
            return Err(LookupError::NoDataForDate);
        }

        let day = daily.day(0).ok_or(LookupError::InconsistentDaily)?;

        Ok(HistoricalResult {
            city: city.to_string(),
            latitude: at.latitude,
            longitude: at.longitude,
            date: day.date,
            weather_code: day.weather_code,
            temp_max: day.temp_max,
            temp_min: day.temp_min,
        })
    }

    /// `getTodayWeather`
    pub async fn get_today_weather(&self, city: &str) -> LookupOutcome<WeatherResult> {
        self.fetch_current(city).await.into()
    }

    /// `get7DayForecast`
    pub async fn get_7day_forecast(&self, city: &str) -> LookupOutcome<ForecastResult> {
        self.fetch_forecast(city).await.into()
    }

    /// `getPastWeather`
    pub async fn get_past_weather(
        &self,
        city: &str,
        date: &str,
    ) -> LookupOutcome<HistoricalResult> {
        self.fetch_historical(city, date).await.into()
    }
}

fn upstream(city: &str, what: &str, err: &anyhow::Error) -> LookupError {
    warn!(city, what, error = %format!("{err:#}"), "weather request failed");
    LookupError::upstream(err)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::provider::{CurrentWeather, DailySeries};
    use async_trait::async_trait;
    use serde_json::json;

    /// Canned provider. `None` in a slot means "section missing"; an `Err`
    /// string simulates a transport failure.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct FakeProvider {
        pub geocode: Option<Result<Option<Coordinates>, String>>,
        pub current: Option<Result<Option<CurrentWeather>, String>>,
        pub forecast: Option<Result<Option<DailySeries>, String>>,
        pub archive: Option<Result<Option<DailySeries>, String>>,
    }

    fn reply<T: Clone>(slot: &Option<Result<Option<T>, String>>) -> anyhow::Result<Option<T>> {
        match slot {
            Some(Ok(v)) => Ok(v.clone()),
            Some(Err(msg)) => Err(anyhow::anyhow!(msg.clone())),
            None => Ok(None),
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn geocode(&self, _city: &str) -> anyhow::Result<Option<Coordinates>> {
            reply(&self.geocode)
        }

        async fn current(&self, _at: Coordinates) -> anyhow::Result<Option<CurrentWeather>> {
            reply(&self.current)
        }

        async fn daily_forecast(&self, _at: Coordinates) -> anyhow::Result<Option<DailySeries>> {
            reply(&self.forecast)
        }

        async fn archive_day(
            &self,
            _at: Coordinates,
            _date: &str,
        ) -> anyhow::Result<Option<DailySeries>> {
            reply(&self.archive)
        }
    }

    pub(crate) const PARIS: Coordinates = Coordinates { latitude: 48.8566, longitude: 2.3522 };

    pub(crate) fn paris() -> FakeProvider {
        FakeProvider { geocode: Some(Ok(Some(PARIS))), ..Default::default() }
    }

    pub(crate) fn week() -> DailySeries {
        DailySeries {
            time: (1..=7).map(|d| format!("2024-01-{d:02}")).collect(),
            weathercode: vec![Some(0), Some(1), Some(2), Some(3), Some(45), Some(61), Some(95)],
            temperature_2m_max: (0..7).map(|d| Some(8.0 + d as f64)).collect(),
            temperature_2m_min: (0..7).map(|d| Some(d as f64 - 2.5)).collect(),
        }
    }

    #[tokio::test]
    async fn resolves_exact_coordinates() {
        let lookup = WeatherLookup::new(paris());
        assert_eq!(lookup.resolve_coordinates("Paris").await, Ok(PARIS));
    }

    #[tokio::test]
    async fn empty_results_is_city_not_found() {
        let lookup = WeatherLookup::new(FakeProvider {
            geocode: Some(Ok(None)),
            ..Default::default()
        });

        assert_eq!(lookup.resolve_coordinates("Atlantis").await, Err(LookupError::CityNotFound));
    }

    #[tokio::test]
    async fn geocoding_transport_failure_is_city_not_found() {
        let lookup = WeatherLookup::new(FakeProvider {
            geocode: Some(Err("connection reset".into())),
            current: Some(Ok(None)),
            ..Default::default()
        });

        let outcome = lookup.get_today_weather("Paris").await;
        assert_eq!(outcome.error(), Some("City not found"));
    }

    #[tokio::test]
    async fn today_weather_example() {
        let lookup = WeatherLookup::new(FakeProvider {
            current: Some(Ok(Some(CurrentWeather {
                time: "2024-01-01T12:00".into(),
                temperature: 5.2,
                weathercode: 3,
            }))),
            ..paris()
        });

        let outcome = lookup.get_today_weather("Paris").await;

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "city": "Paris",
                "latitude": 48.8566,
                "longitude": 2.3522,
                "time": "2024-01-01T12:00",
                "temperature": 5.2,
                "weatherCode": 3
            })
        );
    }

    #[tokio::test]
    async fn missing_current_weather_is_unavailable() {
        let lookup = WeatherLookup::new(FakeProvider { current: Some(Ok(None)), ..paris() });

        assert_eq!(lookup.fetch_current("Paris").await, Err(LookupError::WeatherUnavailable));
    }

    #[tokio::test]
    async fn weather_transport_failure_becomes_error_result() {
        let lookup =
            WeatherLookup::new(FakeProvider { current: Some(Err("timed out".into())), ..paris() });

        let outcome = lookup.get_today_weather("Paris").await;
        assert_eq!(outcome.error(), Some("Weather service request failed: timed out"));
    }

    #[tokio::test]
    async fn seven_day_forecast_in_order() {
        let daily = week();
        let lookup =
            WeatherLookup::new(FakeProvider { forecast: Some(Ok(Some(daily.clone()))), ..paris() });

        let result = lookup.fetch_forecast("Paris").await.unwrap();

        assert_eq!(result.city, "Paris");
        assert_eq!((result.latitude, result.longitude), (PARIS.latitude, PARIS.longitude));
        assert_eq!(result.forecast.len(), 7);
        for (i, day) in result.forecast.iter().enumerate() {
            assert_eq!(day.date, daily.time[i]);
            assert_eq!(day.weather_code, daily.weathercode[i]);
            assert_eq!(day.temp_max, daily.temperature_2m_max[i]);
            assert_eq!(day.temp_min, daily.temperature_2m_min[i]);
        }
    }

    #[tokio::test]
    async fn missing_daily_is_forecast_unavailable() {
        let lookup = WeatherLookup::new(FakeProvider { forecast: Some(Ok(None)), ..paris() });

        let outcome = lookup.get_7day_forecast("Paris").await;
        assert_eq!(outcome.error(), Some("Forecast data unavailable"));
    }

    #[tokio::test]
    async fn empty_daily_is_forecast_unavailable() {
        let lookup = WeatherLookup::new(FakeProvider {
            forecast: Some(Ok(Some(DailySeries::default()))),
            ..paris()
        });

        assert_eq!(lookup.fetch_forecast("Paris").await, Err(LookupError::ForecastUnavailable));
    }

    #[tokio::test]
    async fn ragged_forecast_is_rejected() {
        let mut daily = week();
        daily.temperature_2m_max.truncate(5);
        let lookup =
            WeatherLookup::new(FakeProvider { forecast: Some(Ok(Some(daily))), ..paris() });

        assert_eq!(lookup.fetch_forecast("Paris").await, Err(LookupError::InconsistentDaily));
    }

    #[tokio::test]
    async fn past_weather_reads_single_day() {
        let daily = DailySeries {
            time: vec!["2023-07-14".into()],
            weathercode: vec![Some(1)],
            temperature_2m_max: vec![Some(29.3)],
            temperature_2m_min: vec![Some(17.8)],
        };
        let lookup = WeatherLookup::new(FakeProvider { archive: Some(Ok(Some(daily))), ..paris() });

        let result = lookup.fetch_historical("Paris", "2023-07-14").await.unwrap();

        assert_eq!(
            result,
            HistoricalResult {
                city: "Paris".into(),
                latitude: 48.8566,
                longitude: 2.3522,
                date: "2023-07-14".into(),
                weather_code: Some(1),
                temp_max: Some(29.3),
                temp_min: Some(17.8),
            }
        );
    }

    #[tokio::test]
    async fn past_weather_missing_daily() {
        let lookup = WeatherLookup::new(FakeProvider { archive: Some(Ok(None)), ..paris() });

        let outcome = lookup.get_past_weather("Paris", "2023-07-14").await;
        assert_eq!(outcome.error(), Some("Historical data not available"));
    }

    #[tokio::test]
    async fn past_weather_empty_time_is_no_data() {
        let lookup = WeatherLookup::new(FakeProvider {
            archive: Some(Ok(Some(DailySeries::default()))),
            ..paris()
        });

        assert_eq!(
            lookup.fetch_historical("Paris", "1700-01-01").await,
            Err(LookupError::NoDataForDate)
        );
    }

    #[tokio::test]
    async fn past_weather_short_arrays_are_inconsistent() {
        let daily = DailySeries { time: vec!["2023-07-14".into()], ..Default::default() };
        let lookup = WeatherLookup::new(FakeProvider { archive: Some(Ok(Some(daily))), ..paris() });

        assert_eq!(
            lookup.fetch_historical("Paris", "2023-07-14").await,
            Err(LookupError::InconsistentDaily)
        );
    }

    #[tokio::test]
    async fn unknown_city_short_circuits_weather_call() {
        let lookup = WeatherLookup::new(FakeProvider {
            geocode: Some(Ok(None)),
            archive: Some(Err("must not be called".into())),
            ..Default::default()
        });

        let outcome = lookup.get_past_weather("Atlantis", "2023-07-14").await;
        assert_eq!(outcome.error(), Some("City not found"));
    }
}
