use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text, validator::Validation};
use meteo_core::{Config, ToolId, WeatherLookup, call_tool};
use serde_json::Value;
use tracing::debug;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "City weather from Open-Meteo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current weather for a city.
    Today {
        city: String,

        /// Print the raw JSON result.
        #[arg(long)]
        json: bool,
    },

    /// 7-day forecast for a city.
    Forecast {
        city: String,

        #[arg(long)]
        json: bool,
    },

    /// Observed weather for a city on a past day.
    Past {
        city: String,

        /// Day to look up, YYYY-MM-DD.
        #[arg(long)]
        date: String,

        #[arg(long)]
        json: bool,
    },

    /// Invoke a tool by name, e.g. `getPastWeather`, and print its JSON result.
    Tool {
        name: String,

        /// JSON object with the tool arguments.
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// List the available tools.
    Tools,

    /// Interactively set endpoint URLs and request timeout.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Today { city, json } => {
                let outcome = lookup()?.get_today_weather(&city).await;
                if json {
                    output::print_json(&outcome)?;
                } else {
                    output::print_today(&outcome);
                }
            }
            Command::Forecast { city, json } => {
                let outcome = lookup()?.get_7day_forecast(&city).await;
                if json {
                    output::print_json(&outcome)?;
                } else {
                    output::print_forecast(&outcome);
                }
            }
            Command::Past { city, date, json } => {
                let outcome = lookup()?.get_past_weather(&city, &date).await;
                if json {
                    output::print_json(&outcome)?;
                } else {
                    output::print_past(&outcome);
                }
            }
            Command::Tool { name, args } => {
                let tool = ToolId::try_from(name.as_str())?;
                let args: Value = serde_json::from_str(&args)
                    .with_context(|| format!("Invalid JSON arguments for '{tool}'"))?;

                let value = call_tool(&lookup()?, tool, &args).await?;
                output::print_json(&value)?;
            }
            Command::Tools => output::print_tools(),
            Command::Configure => configure()?,
        }

        Ok(())
    }
}

fn load_config() -> Result<Config> {
    let mut cfg = Config::load()?;
    cfg.apply_env_overrides()?;
    debug!(?cfg, "loaded configuration");
    Ok(cfg)
}

fn lookup() -> Result<WeatherLookup> {
    WeatherLookup::from_config(&load_config()?)
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    cfg.endpoints.geocoding = prompt_url("Geocoding API base URL:", &cfg.endpoints.geocoding)?;
    cfg.endpoints.forecast = prompt_url("Forecast API base URL:", &cfg.endpoints.forecast)?;
    cfg.endpoints.archive = prompt_url("Archive API base URL:", &cfg.endpoints.archive)?;

    let timeout = CustomType::<u64>::new("Request timeout in seconds (0 for transport default):")
        .with_default(cfg.timeout_secs.unwrap_or(0))
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;
    cfg.timeout_secs = (timeout > 0).then_some(timeout);

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn prompt_url(message: &str, current: &str) -> Result<String> {
    let url = Text::new(message)
        .with_default(current)
        .with_validator(|input: &str| {
            if input.starts_with("http://") || input.starts_with("https://") {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Expected an http:// or https:// URL".into()))
            }
        })
        .prompt()
        .with_context(|| format!("Failed to read '{message}'"))?;

    Ok(url.trim().to_string())
}
