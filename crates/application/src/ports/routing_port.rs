//! Bike and walking routing ports

use async_trait::async_trait;
use domain::{Coordinate, RouteOption};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Cyclist profile used when the caller does not pick one
pub const DEFAULT_BIKE_PROFILE: &str = "Default";

/// Port for bike routing
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BikeRoutingPort: Send + Sync {
    /// Every route variant the provider offers between two points
    async fn route(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        profile: &str,
    ) -> Result<Vec<RouteOption>, ApplicationError>;
}

/// Port for walking routing
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WalkingRoutingPort: Send + Sync {
    /// The single walking route between two points
    async fn route(
        &self,
        from: &Coordinate,
        to: &Coordinate,
    ) -> Result<RouteOption, ApplicationError>;
}
