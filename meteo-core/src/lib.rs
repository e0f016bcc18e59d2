//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Configuration of the upstream Open-Meteo endpoints
//! - The provider abstraction and its Open-Meteo HTTP implementation
//! - [`WeatherLookup`]: geocode a city, fetch weather, reshape the response
//! - A small tool registry exposing the lookups by name with JSON arguments
//!
//! It is used by `meteo-cli`, but can also be embedded in other hosts.

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod tools;

pub use config::{Config, Endpoints};
pub use error::LookupError;
pub use lookup::WeatherLookup;
pub use model::{
    Coordinates, DailyRecord, ErrorResult, ForecastResult, HistoricalResult, LookupOutcome,
    WeatherCondition, WeatherResult,
};
pub use provider::{WeatherProvider, openmeteo::OpenMeteoProvider};
pub use tools::{ToolId, call_tool};
