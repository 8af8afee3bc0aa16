//! Parking dataset port

use async_trait::async_trait;
use domain::{ParkingFacility, ParkingFilter};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port over the pre-materialised parking filter views
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ParkingPort: Send + Sync {
    /// Facilities of the view named by `filter`
    async fn facilities_matching(
        &self,
        filter: ParkingFilter,
    ) -> Result<Vec<ParkingFacility>, ApplicationError>;
}
