//! Walking adapter - Implements WalkingRoutingPort over an unrestricted journey search

use std::collections::BTreeMap;
use std::sync::Arc;

use application::{ApplicationError, RouteLeg, WalkingRoutingPort};
use async_trait::async_trait;
use domain::{Coordinate, PathGeometry, RouteOption, RouteSection, Waypoint};
use integration_transit::{Journey, NavitiaTransitClient, TransitClient, TransitConfig, TransitError};
use tracing::{debug, instrument};

use super::transit_adapter::TransitAdapter;
use crate::retry::{RetryConfig, retry};

/// Label of the walking leg
pub const WALK_LABEL: &str = "WALK";

/// Walking route from a parking facility to the arrival address
pub struct WalkingAdapter {
    client: Arc<dyn TransitClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for WalkingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkingAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl WalkingAdapter {
    pub fn new(client: Arc<dyn TransitClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Build the adapter over the Navitia client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: &TransitConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = NavitiaTransitClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(client), retry))
    }

    fn to_route_option(journey: Journey, from: &Coordinate, to: &Coordinate) -> RouteOption {
        let walking_distance = journey.walking_distance();
        let sections = journey
            .sections
            .into_iter()
            .filter(|s| !s.geometry.is_empty())
            .map(|s| RouteSection {
                geometry: Some(PathGeometry::LineString {
                    coordinates: s.geometry,
                }),
                details: None,
            })
            .collect();

        RouteOption {
            id: None,
            title: Some(WALK_LABEL.to_string()),
            duration: journey.duration_secs,
            distances: BTreeMap::from([("walking".to_string(), walking_distance)]),
            sections,
            waypoints: vec![Waypoint::from(*from), Waypoint::from(*to)],
            estimated_departure: None,
            estimated_arrival: None,
            details: None,
        }
    }
}

#[async_trait]
impl WalkingRoutingPort for WalkingAdapter {
    #[instrument(skip(self), fields(%from, %to))]
    async fn route(
        &self,
        from: &Coordinate,
        to: &Coordinate,
    ) -> Result<RouteOption, ApplicationError> {
        let journey = retry(&self.retry, "walking", || self.client.walking_journey(from, to))
            .await
            .map_err(|e| match e {
                TransitError::NoRoutesFound { .. } => {
                    ApplicationError::routing(RouteLeg::Walk, e.to_string())
                },
                other => TransitAdapter::map_error(other),
            })?;

        debug!(
            duration_secs = journey.duration_secs,
            distance_m = journey.walking_distance(),
            "Walking route selected"
        );
        Ok(Self::to_route_option(journey, from, to))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use integration_transit::Section;

    use super::*;

    #[test]
    fn walking_journey_becomes_walk_option() {
        let at = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let line = vec![
            Coordinate::new_unchecked(2.30, 48.80),
            Coordinate::new_unchecked(2.31, 48.81),
        ];
        let journey = Journey {
            journey_type: Some("non_pt_walk".to_string()),
            duration_secs: 420,
            departure: at,
            arrival: at,
            distances: BTreeMap::from([("walking".to_string(), 510.0)]),
            sections: vec![
                Section {
                    section_type: "street_network".to_string(),
                    mode: Some("walking".to_string()),
                    departure: at,
                    arrival: at,
                    duration_secs: 420,
                    from: None,
                    to: None,
                    geometry: line.clone(),
                    display: None,
                    co2_emission: None,
                },
                Section {
                    section_type: "waiting".to_string(),
                    mode: None,
                    departure: at,
                    arrival: at,
                    duration_secs: 0,
                    from: None,
                    to: None,
                    geometry: vec![],
                    display: None,
                    co2_emission: None,
                },
            ],
            co2_emission: None,
        };

        let option = WalkingAdapter::to_route_option(journey, &line[0], &line[1]);

        assert_eq!(option.label(), Some(WALK_LABEL));
        assert_eq!(option.duration, 420);
        assert!((option.distance("walking") - 510.0).abs() < f64::EPSILON);
        assert_eq!(option.sections.len(), 1);
        assert_eq!(
            option.sections[0].geometry,
            Some(PathGeometry::LineString { coordinates: line })
        );
        assert_eq!(option.waypoints.len(), 2);
        assert!((option.waypoints[1].latitude - 48.81).abs() < f64::EPSILON);
    }
}
