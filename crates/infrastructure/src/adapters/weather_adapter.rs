//! Weather adapter - Implements WeatherPort using the Open-Meteo client

use std::sync::Arc;

use application::{ApplicationError, WeatherPort};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use domain::{Coordinate, WeatherSnapshot, WeatherStatus};
use integration_weather::{
    ForecastHour, OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError,
};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Adapter for hourly forecasts
pub struct WeatherAdapter {
    client: Arc<dyn WeatherClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl WeatherAdapter {
    pub fn new(client: Arc<dyn WeatherClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Build the adapter over the Open-Meteo client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: WeatherConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenMeteoClient::new(config).map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(client), retry))
    }

    /// Every weather failure is reported the same way; the composer falls back
    fn map_error(err: &WeatherError) -> ApplicationError {
        ApplicationError::WeatherUnavailable(err.to_string())
    }

    fn to_snapshot(hour: ForecastHour) -> WeatherSnapshot {
        WeatherSnapshot {
            at: hour.time,
            status: WeatherStatus::Available,
            condition: hour.condition(),
            temperature: hour.temperature,
            apparent_temperature: hour.apparent_temperature,
            precipitation_probability: hour.precipitation_probability,
            precipitation: hour.precipitation,
            wind_speed: hour.wind_speed,
            wind_gusts: hour.wind_gusts,
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(skip(self), fields(%location))]
    async fn forecast(
        &self,
        at: NaiveDateTime,
        location: &Coordinate,
    ) -> Result<WeatherSnapshot, ApplicationError> {
        let hour = retry(&self.retry, "weather", || self.client.forecast_at(location, at))
            .await
            .map_err(|e| Self::map_error(&e))?;

        debug!(hour = %hour.time, "Forecast hour selected");
        Ok(Self::to_snapshot(hour))
    }
}
