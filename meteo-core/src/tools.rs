use anyhow::{Result, anyhow};
use serde::Serialize;
use serde_json::Value;
use std::convert::TryFrom;

use crate::lookup::WeatherLookup;

/// The callable operations, addressed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    TodayWeather,
    SevenDayForecast,
    PastWeather,
}

impl ToolId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::TodayWeather => "getTodayWeather",
            ToolId::SevenDayForecast => "get7DayForecast",
            ToolId::PastWeather => "getPastWeather",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolId::TodayWeather => "Get today's weather for a specified city",
            ToolId::SevenDayForecast => "Get a 7-day weather forecast for a specified city",
            ToolId::PastWeather => {
                "Get weather data for a past day for a specified city (format YYYY-MM-DD)"
            }
        }
    }

    /// Argument names, in call order.
    pub fn params(&self) -> &'static [&'static str] {
        match self {
            ToolId::TodayWeather | ToolId::SevenDayForecast => &["city"],
            ToolId::PastWeather => &["city", "date"],
        }
    }

    pub const fn all() -> &'static [ToolId] {
        &[ToolId::TodayWeather, ToolId::SevenDayForecast, ToolId::PastWeather]
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ToolId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ToolId::all()
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                let names: Vec<&str> = ToolId::all().iter().map(ToolId::as_str).collect();
                anyhow!("Unknown tool '{value}'. Supported tools: {}.", names.join(", "))
            })
    }
}

/// Invoke `tool` with a JSON object of arguments.
///
/// Lookup failures are part of the returned value (`{"error": ...}`); `Err` is
/// reserved for malformed arguments.
pub async fn call_tool(lookup: &WeatherLookup, tool: ToolId, args: &Value) -> Result<Value> {
    let city = string_arg(tool, args, "city")?;

    match tool {
        ToolId::TodayWeather => to_value(lookup.get_today_weather(city).await),
        ToolId::SevenDayForecast => to_value(lookup.get_7day_forecast(city).await),
        ToolId::PastWeather => {
            let date = string_arg(tool, args, "date")?;
            to_value(lookup.get_past_weather(city, date).await)
        }
    }
}

fn string_arg<'a>(tool: ToolId, args: &'a Value, name: &str) -> Result<&'a str> {
    let obj = args
        .as_object()
        .ok_or_else(|| anyhow!("Arguments for '{tool}' must be a JSON object."))?;

    match obj.get(name) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => {
            Err(anyhow!("Argument '{name}' for '{tool}' must be a string, got {other}."))
        }
        None => Err(anyhow!("Missing argument '{name}' for '{tool}'.")),
    }
}

fn to_value(outcome: impl Serialize) -> Result<Value> {
    Ok(serde_json::to_value(outcome)?)
}
