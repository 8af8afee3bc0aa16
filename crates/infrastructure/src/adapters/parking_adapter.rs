//! Parking adapter - Implements ParkingPort over the in-memory dataset

use std::path::Path;
use std::sync::Arc;

use application::{ApplicationError, ParkingPort};
use async_trait::async_trait;
use domain::{ParkingFacility, ParkingFilter};
use tracing::{debug, instrument};

use crate::parking::ParkingDataset;

/// Serves the pre-materialised filter views
#[derive(Debug, Clone)]
pub struct ParkingAdapter {
    dataset: Arc<ParkingDataset>,
}

impl ParkingAdapter {
    pub fn new(dataset: Arc<ParkingDataset>) -> Self {
        Self { dataset }
    }

    /// Load the dataset from a GeoJSON file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing or malformed.
    pub async fn load(path: &Path) -> Result<Self, ApplicationError> {
        let dataset = ParkingDataset::load(path)
            .await
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(dataset)))
    }

    #[must_use]
    pub fn dataset(&self) -> &ParkingDataset {
        &self.dataset
    }
}

#[async_trait]
impl ParkingPort for ParkingAdapter {
    #[instrument(skip(self))]
    async fn facilities_matching(
        &self,
        filter: ParkingFilter,
    ) -> Result<Vec<ParkingFacility>, ApplicationError> {
        let view = self.dataset.view(filter);
        debug!(filter = filter.name(), count = view.len(), "Parking view read");
        Ok(view.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use domain::{AccessClass, Coordinate, ShelterClass};

    use super::*;

    fn facility(id: &str) -> ParkingFacility {
        ParkingFacility::new(id, Coordinate::new_unchecked(2.35, 48.85))
    }

    #[tokio::test]
    async fn views_are_served_by_filter() {
        let dataset = ParkingDataset::from_facilities(vec![
            facility("a")
                .with_access(AccessClass::Private)
                .with_shelter(ShelterClass::Shelter),
            facility("b").with_shelter(ShelterClass::Locker),
            facility("c").supervised(),
        ]);
        let adapter = ParkingAdapter::new(Arc::new(dataset));

        let lockers = adapter
            .facilities_matching(ParkingFilter::Locker)
            .await
            .unwrap();
        assert_eq!(lockers.len(), 1);
        assert_eq!(lockers[0].id, "b");

        let supervised = adapter
            .facilities_matching(ParkingFilter::Supervised)
            .await
            .unwrap();
        assert_eq!(supervised[0].id, "c");
    }

    #[tokio::test]
    async fn missing_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ParkingAdapter::load(&dir.path().join("absent.geojson"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
