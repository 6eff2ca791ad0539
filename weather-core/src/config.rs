use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_LOCATION: &str = "55.7569,37.6151";
pub const DEFAULT_DAYS: u32 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_location = "55.7569,37.6151"
/// default_days = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint root; `forecast.json` is appended to it.
    pub base_url: String,

    pub api_key: Option<String>,

    /// `"lat,lon"` in decimal degrees.
    pub default_location: String,

    pub default_days: u32,

    /// Covers the whole request/response cycle.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            default_location: DEFAULT_LOCATION.to_string(),
            default_days: DEFAULT_DAYS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Query parameters of one forecast request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub api_key: String,
    pub location: String,
    pub days: u32,
}

impl Config {
    /// Load config from disk and apply `WEATHER_*` environment overrides.
    pub fn load() -> Result<Self> {
        let cfg = Self::load_from(&Self::config_file_path()?)?;
        cfg.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
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

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override fields from `WEATHER_*` variables resolved through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WEATHER_BASE_URL") {
            self.base_url = url;
        }
        if let Some(key) = lookup("WEATHER_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(location) = lookup("WEATHER_LOCATION") {
            self.default_location = location;
        }
        if let Some(days) = lookup("WEATHER_DAYS") {
            self.default_days = days
                .trim()
                .parse()
                .with_context(|| format!("WEATHER_DAYS is not a number: {days}"))?;
        }
        if let Some(secs) = lookup("WEATHER_TIMEOUT_SECS") {
            self.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("WEATHER_TIMEOUT_SECS is not a number: {secs}"))?;
        }

        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the API key, if present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Check every field needed to issue a request.
    pub fn validate(&self) -> Result<()> {
        self.validate_connection()?;
        parse_location(&self.default_location)?;
        validate_days(self.default_days)
    }

    /// Base URL, credential and timeout; everything but the query target.
    fn validate_connection(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base_url '{}'", self.base_url))?;

        if self.api_key().is_none() {
            bail!(
                "No API key configured.\n\
                 Hint: run `weather configure` or set WEATHER_API_KEY."
            );
        }

        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }

        Ok(())
    }

    /// Build the request parameters, overriding location and day count if given.
    pub fn forecast_query(
        &self,
        location: Option<&str>,
        days: Option<u32>,
    ) -> Result<ForecastQuery> {
        self.validate_connection()?;

        let location = location.unwrap_or(&self.default_location).trim();
        parse_location(location)?;

        let days = days.unwrap_or(self.default_days);
        validate_days(days)?;

        Ok(ForecastQuery {
            api_key: self.api_key().unwrap_or_default().to_string(),
            location: location.to_string(),
            days,
        })
    }
}

/// Parse a `"lat,lon"` pair of decimal degrees.
pub fn parse_location(value: &str) -> Result<(f64, f64)> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("Location '{value}' must look like \"lat,lon\""))?;

    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("Invalid latitude in location '{value}'"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .with_context(|| format!("Invalid longitude in location '{value}'"))?;

    if !(-90.0..=90.0).contains(&lat) {
        bail!("Latitude {lat} is out of range -90..=90");
    }
    if !(-180.0..=180.0).contains(&lon) {
        bail!("Longitude {lon} is out of range -180..=180");
    }

    Ok((lat, lon))
}

pub fn validate_days(days: u32) -> Result<()> {
    if days < 1 {
        bail!("Day count must be at least 1, got {days}");
    }
    Ok(())
}
