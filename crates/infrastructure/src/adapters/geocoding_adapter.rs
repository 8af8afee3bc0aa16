//! Geocoding adapter - Implements GeocodingPort using the Nominatim client

use std::sync::Arc;

use application::{ApplicationError, GeocodingPort};
use async_trait::async_trait;
use domain::Coordinate;
use integration_transit::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Resolves free-text addresses to coordinates
pub struct GeocodingAdapter {
    client: Arc<dyn GeocodingClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl GeocodingAdapter {
    pub fn new(client: Arc<dyn GeocodingClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Build the adapter over a Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(
        config: &NominatimConfig,
        retry: RetryConfig,
    ) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(client), retry))
    }

    fn map_error(err: GeocodingError, address: &str) -> ApplicationError {
        match err {
            GeocodingError::AddressNotFound(_) => ApplicationError::NoAddressFound {
                address: address.to_string(),
            },
            GeocodingError::RateLimitExceeded => ApplicationError::RateLimited,
            GeocodingError::ConnectionFailed(e) | GeocodingError::RequestFailed(e) => {
                ApplicationError::ExternalService(format!("geocoding: {e}"))
            },
            GeocodingError::Timeout => {
                ApplicationError::ExternalService("geocoding: request timed out".to_string())
            },
            GeocodingError::ParseError(e) => ApplicationError::Internal(format!("geocoding: {e}")),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn resolve(&self, address: &str) -> Result<Coordinate, ApplicationError> {
        if address.trim().is_empty() {
            return Err(ApplicationError::NoAddressFound {
                address: address.to_string(),
            });
        }

        let coordinate = retry(&self.retry, "geocoding", || self.client.geocode(address))
            .await
            .map_err(|e| Self::map_error(e, address))?;

        debug!(%coordinate, "Address resolved");
        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_address() {
        let err = GeocodingAdapter::map_error(
            GeocodingError::AddressNotFound("nowhere".to_string()),
            "1 rue de Nulle Part",
        );
        match err {
            ApplicationError::NoAddressFound { address } => {
                assert_eq!(address, "1 rue de Nulle Part");
            },
            other => unreachable!("unexpected {other:?}"),
        }
    }

    #[test]
    fn transient_errors_stay_retryable() {
        let err = GeocodingAdapter::map_error(GeocodingError::Timeout, "x");
        assert!(err.is_retryable());
        let err = GeocodingAdapter::map_error(GeocodingError::RateLimitExceeded, "x");
        assert!(matches!(err, ApplicationError::RateLimited));
    }

    #[tokio::test]
    async fn blank_address_is_rejected_without_a_call() {
        let adapter =
            GeocodingAdapter::from_config(&NominatimConfig::for_testing(), RetryConfig::disabled())
                .unwrap();
        let err = adapter.resolve("   ").await.unwrap_err();
        assert!(matches!(err, ApplicationError::NoAddressFound { .. }));
    }
}
