//! Public transit journey port

use async_trait::async_trait;
use chrono::NaiveDateTime;
use domain::{Coordinate, DatetimeRepresents, TransitJourney};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for public transit journey search
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransitPort: Send + Sync {
    /// Candidate journeys in the provider's preference order
    ///
    /// `at` is a local wall-clock instant read as a departure or an arrival
    /// time according to `represents`.
    async fn journeys(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        at: NaiveDateTime,
        represents: DatetimeRepresents,
    ) -> Result<Vec<TransitJourney>, ApplicationError>;
}
