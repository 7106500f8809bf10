//! Configuration for the availability calendar.

use crate::calendar::{WeekLayout, DEFAULT_HORIZON_MONTHS};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "STAY_CALENDAR_API_URL";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub calendar: CalendarConfig,
}

/// REST API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the rental API, e.g. `https://rentals.example.com/api`
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
            user_agent: concat!("stay-calendar/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Calendar display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Months ahead of today that are fetched and can be browsed
    pub horizon_months: u32,
    pub week_layout: WeekLayout,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            week_layout: WeekLayout::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or `stay-calendar.toml` in the working directory,
    /// or defaults; then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                let default_path = PathBuf::from("stay-calendar.toml");
                if default_path.exists() {
                    info!("Loading config from {}", default_path.display());
                    Self::from_file(&default_path)?
                } else {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(std::env::var(API_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            debug!("{} overrides api.base_url", API_URL_ENV);
            self.api.base_url = url;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs must be > 0".to_string()));
        }
        if self.calendar.horizon_months == 0 {
            return Err(ConfigError::Invalid(
                "calendar.horizon_months must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
