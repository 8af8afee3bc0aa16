//! Weather service port

use async_trait::async_trait;
use chrono::NaiveDateTime;
use domain::{Coordinate, WeatherSnapshot};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather forecasts
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Forecast for the hour nearest to the local instant `at`
    async fn forecast(
        &self,
        at: NaiveDateTime,
        location: &Coordinate,
    ) -> Result<WeatherSnapshot, ApplicationError>;
}
