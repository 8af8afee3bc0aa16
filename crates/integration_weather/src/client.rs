//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo hourly forecast API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use domain::Coordinate;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ApiResponse, ForecastHour, HourlyData, HourlyForecast};

/// Hourly variables requested from Open-Meteo
const HOURLY_VARIABLES: &str = "temperature_2m,apparent_temperature,precipitation_probability,\
                                precipitation,weather_code,wind_speed_10m,wind_gusts_10m";

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The series holds no hour at all
    #[error("No forecast available for {0}")]
    NoForecast(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl WeatherError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::RateLimitExceeded
                | Self::Timeout { .. }
        )
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Forecast horizon in days (1-16, default: 3)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// IANA timezone the hourly series is expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_forecast_days() -> u8 {
    3
}

fn default_timezone() -> String {
    "Europe/Paris".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            forecast_days: default_forecast_days(),
            timezone: default_timezone(),
        }
    }
}

impl WeatherConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if !(1..=16).contains(&self.forecast_days) {
            return Err("forecast_days must be between 1 and 16".to_string());
        }
        if self.timezone.trim().is_empty() {
            return Err("timezone must not be empty".to_string());
        }
        Ok(())
    }
}

/// Weather client trait for fetching forecasts
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Hourly forecast series for a location
    async fn hourly_forecast(&self, location: &Coordinate) -> Result<HourlyForecast, WeatherError>;

    /// Forecast hour nearest to a local instant
    async fn forecast_at(
        &self,
        location: &Coordinate,
        instant: NaiveDateTime,
    ) -> Result<ForecastHour, WeatherError> {
        let forecast = self.hourly_forecast(location).await?;
        forecast
            .nearest(instant)
            .cloned()
            .ok_or_else(|| WeatherError::NoForecast(instant.to_string()))
    }
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("CycloFlow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Query string of a forecast request
    fn forecast_params(&self, location: &Coordinate) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", location.latitude().to_string()),
            ("longitude", location.longitude().to_string()),
            ("hourly", HOURLY_VARIABLES.to_string()),
            ("timezone", self.config.timezone.clone()),
            (
                "forecast_days",
                self.config.forecast_days.clamp(1, 16).to_string(),
            ),
        ]
    }

    fn parse_forecast_response(body: &str) -> Result<HourlyForecast, WeatherError> {
        let api: ApiResponse =
            serde_json::from_str(body).map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let hourly = api.hourly.ok_or_else(|| {
            WeatherError::ParseError("No hourly forecast data in response".to_string())
        })?;

        Ok(HourlyForecast {
            latitude: api.latitude,
            longitude: api.longitude,
            timezone: api.timezone,
            hours: Self::parse_hours(&hourly)?,
        })
    }

    fn parse_hours(hourly: &HourlyData) -> Result<Vec<ForecastHour>, WeatherError> {
        fn at<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
            values.get(i).copied().flatten()
        }

        hourly
            .time
            .iter()
            .enumerate()
            .map(|(i, time)| {
                Ok(ForecastHour {
                    time: Self::parse_hour(time)?,
                    temperature: at(&hourly.temperature_2m, i),
                    apparent_temperature: at(&hourly.apparent_temperature, i),
                    precipitation_probability: at(&hourly.precipitation_probability, i),
                    precipitation: at(&hourly.precipitation, i),
                    weather_code: at(&hourly.weather_code, i),
                    wind_speed: at(&hourly.wind_speed_10m, i),
                    wind_gusts: at(&hourly.wind_gusts_10m, i),
                })
            })
            .collect()
    }

    /// Open-Meteo local hours (`2026-02-05T14:00`)
    fn parse_hour(s: &str) -> Result<NaiveDateTime, WeatherError> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| WeatherError::ParseError(format!("Invalid datetime format: {s}")))
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self), fields(location = %location))]
    async fn hourly_forecast(&self, location: &Coordinate) -> Result<HourlyForecast, WeatherError> {
        let url = format!("{}/forecast", self.config.base_url.trim_end_matches('/'));
        debug!(url = %url, "Fetching hourly forecast");

        let response = self
            .client
            .get(&url)
            .query(&self.forecast_params(location))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WeatherError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    WeatherError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let forecast = Self::parse_forecast_response(&body)?;
        debug!(hours = forecast.hours.len(), "Forecast received");
        Ok(forecast)
    }
}
