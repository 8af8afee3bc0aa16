//! Nearest bike-parking lookup

use std::{fmt, sync::Arc};

use domain::{Coordinate, ParkingFacility, ParkingFilter, nearest_facility};
use tracing::{debug, instrument};

use crate::{error::ApplicationError, ports::ParkingPort};

/// Finds the closest facility satisfying a filter
pub struct NearestFacilityLocator {
    parking: Arc<dyn ParkingPort>,
}

impl fmt::Debug for NearestFacilityLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearestFacilityLocator").finish_non_exhaustive()
    }
}

impl NearestFacilityLocator {
    pub fn new(parking: Arc<dyn ParkingPort>) -> Self {
        Self { parking }
    }

    /// Closest matching facility to `target`, planar distance
    ///
    /// The filter is re-applied to whatever the dataset view returns, so a
    /// result always satisfies it.
    #[instrument(skip(self))]
    pub async fn locate(
        &self,
        target: &Coordinate,
        filter: ParkingFilter,
    ) -> Result<ParkingFacility, ApplicationError> {
        let candidates = self.parking.facilities_matching(filter).await?;
        debug!(count = candidates.len(), "Parking candidates loaded");

        nearest_facility(&candidates, target, filter)
            .cloned()
            .ok_or_else(|| ApplicationError::NoFacilityFound {
                filter: filter.name().to_string(),
            })
    }
}
