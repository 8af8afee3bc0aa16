//! Application configuration
//!
//! Split into focused sub-modules:
//! - `prim`: PRIM marketplace credentials shared by the journey planner and the bike router
//! - `policy`: timezone and holiday calendar of the bike-carriage policy
//!
//! Provider settings that need no translation (geocoding, weather, parking,
//! retry, logging) reuse the client-side configuration types directly.

mod policy;
mod prim;

use std::path::Path;

use integration_transit::NominatimConfig;
use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};

pub use policy::PolicyConfig;
pub use prim::PrimAppConfig;

use crate::{parking::ParkingConfig, retry::RetryConfig, telemetry::LoggingConfig};

/// Prefix of the environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "CYCLOFLOW";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Journey planner and bike router
    #[serde(default)]
    pub prim: PrimAppConfig,

    /// Address geocoding
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Weather forecasts; `None` disables the provider
    #[serde(default = "default_weather")]
    pub weather: Option<WeatherConfig>,

    /// Bike-parking dataset
    #[serde(default)]
    pub parking: ParkingConfig,

    /// Bike-carriage policy
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Backoff applied to every provider call
    #[serde(default)]
    pub retry: RetryConfig,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[allow(clippy::unnecessary_wraps)]
fn default_weather() -> Option<WeatherConfig> {
    Some(WeatherConfig::default())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prim: PrimAppConfig::default(),
            geocoding: NominatimConfig::default(),
            weather: default_weather(),
            parking: ParkingConfig::default(),
            policy: PolicyConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file, or `config.*` in the working
    /// directory when `path` is `None`
    ///
    /// Environment variables override the file, e.g.
    /// `CYCLOFLOW_PRIM__API_KEY` or `CYCLOFLOW_LOGGING__LEVEL`. Nested keys
    /// are separated by a double underscore since most keys contain one.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or a source cannot be
    /// parsed.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns every invalid setting, one per line.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if let Err(e) = self.prim.validate() {
            problems.push(e);
        }
        if let Err(e) = self.geocoding.validate() {
            problems.push(format!("geocoding: {e}"));
        }
        if let Some(weather) = &self.weather {
            if let Err(e) = weather.validate() {
                problems.push(format!("weather: {e}"));
            }
        }
        if let Err(e) = self.policy.to_policy() {
            problems.push(e);
        }
        if let Err(e) = self.retry.validate() {
            problems.push(format!("retry: {e}"));
        }
        if let Err(e) = self.logging.validate() {
            problems.push(format!("logging: {e}"));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("\n"))
        }
    }
}
