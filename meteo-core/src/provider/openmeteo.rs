use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{config::Endpoints, model::Coordinates};

use super::{CurrentWeather, DailySeries, WeatherProvider};

const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    endpoints: Endpoints,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(endpoints: Endpoints) -> Self {
        Self::with_client(endpoints, Client::new())
    }

    pub fn with_client(endpoints: Endpoints, http: Client) -> Self {
        Self { endpoints, http }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!(target: "meteo_core::http", what, url, ?query, "GET");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse Open-Meteo {what} JSON"))
    }
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: Option<DailySeries>,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn geocode(&self, city: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}/v1/search", trim_base(&self.endpoints.geocoding));

        let parsed: GeoResponse = self
            .get_json("geocoding", &url, &[("name", city), ("language", "en"), ("count", "1")])
            .await?;

        Ok(parsed
            .results
            .and_then(|results| results.into_iter().next())
            .map(|first| Coordinates::new(first.latitude, first.longitude)))
    }

    async fn current(&self, at: Coordinates) -> Result<Option<CurrentWeather>> {
        let url = format!("{}/v1/forecast", trim_base(&self.endpoints.forecast));
        let (lat, lon) = format_coords(at);

        let parsed: CurrentResponse = self
            .get_json(
                "current weather",
                &url,
                &[
                    ("latitude", lat.as_str()),
                    ("longitude", lon.as_str()),
                    ("current", "temperature_2m,weathercode"),
                    ("current_weather", "true"),
                    ("timezone", "UTC"),
                ],
            )
            .await?;

        Ok(parsed.current_weather)
    }

    async fn daily_forecast(&self, at: Coordinates) -> Result<Option<DailySeries>> {
        let url = format!("{}/v1/forecast", trim_base(&self.endpoints.forecast));
        let (lat, lon) = format_coords(at);

        let parsed: DailyResponse = self
            .get_json(
                "daily forecast",
                &url,
                &[
                    ("latitude", lat.as_str()),
                    ("longitude", lon.as_str()),
                    ("daily", DAILY_FIELDS),
                    ("timezone", "UTC"),
                ],
            )
            .await?;

        Ok(parsed.daily)
    }

    async fn archive_day(&self, at: Coordinates, date: &str) -> Result<Option<DailySeries>> {
        let url = format!("{}/v1/archive", trim_base(&self.endpoints.archive));
        let (lat, lon) = format_coords(at);

        let parsed: DailyResponse = self
            .get_json(
                "archive",
                &url,
                &[
                    ("latitude", lat.as_str()),
                    ("longitude", lon.as_str()),
                    ("start_date", date),
                    ("end_date", date),
                    ("daily", DAILY_FIELDS),
                    ("timezone", "UTC"),
                ],
            )
            .await?;

        Ok(parsed.daily)
    }
}

fn format_coords(at: Coordinates) -> (String, String) {
    (format!("{:.4}", at.latitude), format!("{:.4}", at.longitude))
}

fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
