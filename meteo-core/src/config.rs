use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com";

pub const ENV_GEOCODING_URL: &str = "METEO_GEOCODING_URL";
pub const ENV_FORECAST_URL: &str = "METEO_FORECAST_URL";
pub const ENV_ARCHIVE_URL: &str = "METEO_ARCHIVE_URL";

/// Base URLs of the three upstream services, without the `/v1/...` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
    pub archive: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: DEFAULT_GEOCODING_URL.to_string(),
            forecast: DEFAULT_FORECAST_URL.to_string(),
            archive: DEFAULT_ARCHIVE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point all three services at one host, e.g. a local mock server.
    pub fn single_host(base: &str) -> Self {
        Self {
            geocoding: base.to_string(),
            forecast: base.to_string(),
            archive: base.to_string(),
        }
    }
}

/// Where the three Open-Meteo services live and how long to wait on them.
///
/// Stored on disk as TOML; every key is optional and falls back to the public
/// Open-Meteo hosts. Example:
/// ```toml
/// timeout_secs = 10
///
/// [endpoints]
/// geocoding = "https://geocoding-api.open-meteo.com"
/// forecast = "https://api.open-meteo.com"
/// archive = "https://archive-api.open-meteo.com"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Request timeout; transport defaults apply when unset.
    pub timeout_secs: Option<u64>,

    pub endpoints: Endpoints,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace endpoints with values from `METEO_*_URL` variables when set.
    /// The result is validated like a config file.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_GEOCODING_URL) {
            self.endpoints.geocoding = url;
        }
        if let Some(url) = non_empty(ENV_FORECAST_URL) {
            self.endpoints.forecast = url;
        }
        if let Some(url) = non_empty(ENV_ARCHIVE_URL) {
            self.endpoints.archive = url;
        }

        self.validate().context("Invalid METEO_*_URL override")
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Build the HTTP client shared by all lookups made with this config.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build().context("Failed to build HTTP client")
    }

    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("geocoding", &self.endpoints.geocoding),
            ("forecast", &self.endpoints.forecast),
            ("archive", &self.endpoints.archive),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!(
                    "Invalid {name} endpoint '{url}': expected an http:// or https:// URL."
                ));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be greater than zero."));
        }

        Ok(())
    }
}
