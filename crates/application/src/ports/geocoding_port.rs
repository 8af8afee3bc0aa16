//! Address resolution port

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port resolving free-text addresses
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve an address to exactly one WGS84 coordinate
    ///
    /// Fails with `ApplicationError::NoAddressFound` when the provider has
    /// no match.
    async fn resolve(&self, address: &str) -> Result<Coordinate, ApplicationError>;
}
