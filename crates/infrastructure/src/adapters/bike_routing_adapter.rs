//! Bike routing adapter - Implements BikeRoutingPort using the Geovelo client

use std::sync::Arc;

use application::{ApplicationError, BikeRoutingPort};
use async_trait::async_trait;
use domain::{Coordinate, PathGeometry, RouteOption, RouteSection, Waypoint};
use integration_geovelo::{
    ComputedRoute, GeoveloClient, GeoveloConfig, GeoveloError, HttpGeoveloClient,
};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Bike route variants between two points
pub struct BikeRoutingAdapter {
    client: Arc<dyn GeoveloClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for BikeRoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BikeRoutingAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl BikeRoutingAdapter {
    pub fn new(client: Arc<dyn GeoveloClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Build the adapter over the HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: &GeoveloConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = HttpGeoveloClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(client), retry))
    }

    pub(crate) fn map_error(err: GeoveloError) -> ApplicationError {
        match err {
            GeoveloError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            GeoveloError::Unauthorized(e) => {
                ApplicationError::Configuration(format!("bike router rejected the API key: {e}"))
            },
            GeoveloError::ConnectionFailed(e) | GeoveloError::ServiceUnavailable(e) => {
                ApplicationError::ExternalService(format!("bike router: {e}"))
            },
            GeoveloError::Timeout { timeout_secs } => ApplicationError::ExternalService(format!(
                "bike router timed out after {timeout_secs}s"
            )),
            GeoveloError::RequestFailed(e) | GeoveloError::ParseError(e) => {
                ApplicationError::Internal(format!("bike router: {e}"))
            },
        }
    }

    fn to_route_option(route: ComputedRoute) -> RouteOption {
        RouteOption {
            id: route.id,
            title: route.title,
            duration: route.duration_secs,
            distances: route.distances,
            sections: route
                .sections
                .into_iter()
                .map(|s| RouteSection {
                    geometry: s.geometry.map(|polyline| PathGeometry::Encoded { polyline }),
                    details: s.details,
                })
                .collect(),
            waypoints: route
                .waypoints
                .into_iter()
                .map(|w| Waypoint {
                    longitude: w.longitude,
                    latitude: w.latitude,
                    title: w.title,
                })
                .collect(),
            estimated_departure: route.estimated_departure,
            estimated_arrival: route.estimated_arrival,
            details: route.details,
        }
    }
}

#[async_trait]
impl BikeRoutingPort for BikeRoutingAdapter {
    #[instrument(skip(self), fields(%from, %to))]
    async fn route(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        profile: &str,
    ) -> Result<Vec<RouteOption>, ApplicationError> {
        let routes = retry(&self.retry, "bike_routing", || {
            self.client.compute_routes(from, to, profile)
        })
        .await
        .map_err(Self::map_error)?;

        debug!(variants = routes.len(), "Bike routes computed");
        Ok(routes.into_iter().map(Self::to_route_option).collect())
    }
}
