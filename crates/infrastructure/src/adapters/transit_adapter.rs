//! Transit adapter - Implements TransitPort using the Navitia journey planner

use std::sync::Arc;

use application::{ApplicationError, TransitPort};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use domain::{
    Coordinate, DatetimeRepresents, DisplayInformation, SectionKind, StopDescriptor,
    TransitJourney, TransitSection,
};
use integration_transit::{
    DisplayInfo, Journey, JourneyQuery, NavitiaTransitClient, Place, Section, TransitClient,
    TransitConfig, TransitError,
};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Bike-compatible transit journeys between two points
pub struct TransitAdapter {
    client: Arc<dyn TransitClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for TransitAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitAdapter")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl TransitAdapter {
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

    /// Translate planner errors; shared with the walking adapter
    pub(crate) fn map_error(err: TransitError) -> ApplicationError {
        match err {
            TransitError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
            TransitError::Unauthorized(e) => {
                ApplicationError::Configuration(format!("journey planner rejected the API key: {e}"))
            },
            TransitError::ConnectionFailed(e) | TransitError::ServiceUnavailable(e) => {
                ApplicationError::ExternalService(format!("journey planner: {e}"))
            },
            TransitError::Timeout { timeout_secs } => ApplicationError::ExternalService(format!(
                "journey planner timed out after {timeout_secs}s"
            )),
            err @ TransitError::NoRoutesFound { .. } => ApplicationError::Internal(err.to_string()),
            TransitError::RequestFailed(e) | TransitError::ParseError(e) => {
                ApplicationError::Internal(format!("journey planner: {e}"))
            },
        }
    }

    pub(crate) fn section_kind(section_type: &str) -> SectionKind {
        match section_type {
            "public_transport" => SectionKind::PublicTransport,
            "street_network" => SectionKind::StreetNetwork,
            "transfer" => SectionKind::Transfer,
            "waiting" => SectionKind::Waiting,
            "crow_fly" => SectionKind::CrowFly,
            "on_demand_transport" => SectionKind::OnDemandTransport,
            _ => SectionKind::Other,
        }
    }

    fn to_stop(place: Place) -> StopDescriptor {
        StopDescriptor {
            id: place.id,
            name: place.name,
            coordinate: place.coordinate,
        }
    }

    fn to_display(display: DisplayInfo) -> DisplayInformation {
        DisplayInformation {
            commercial_mode: display.commercial_mode,
            physical_mode: display.physical_mode,
            code: display.code,
            network: display.network,
            direction: display.direction,
        }
    }

    fn to_section(section: Section) -> TransitSection {
        TransitSection {
            kind: Self::section_kind(&section.section_type),
            departure: section.departure,
            arrival: section.arrival,
            duration_secs: section.duration_secs,
            from: section.from.map(Self::to_stop),
            to: section.to.map(Self::to_stop),
            geometry: section.geometry,
            display: section.display.map(Self::to_display),
            co2_emission: section.co2_emission,
        }
    }

    fn to_journey(journey: Journey) -> TransitJourney {
        TransitJourney {
            kind: journey.journey_type,
            duration_secs: journey.duration_secs,
            departure: journey.departure,
            arrival: journey.arrival,
            sections: journey.sections.into_iter().map(Self::to_section).collect(),
        }
    }
}

#[async_trait]
impl TransitPort for TransitAdapter {
    #[instrument(skip(self), fields(%from, %to))]
    async fn journeys(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        at: NaiveDateTime,
        represents: DatetimeRepresents,
    ) -> Result<Vec<TransitJourney>, ApplicationError> {
        let query = JourneyQuery::transit(*from, *to).at(at, represents);

        let journeys = retry(&self.retry, "transit", || self.client.search_journeys(&query))
            .await
            .map_err(Self::map_error)?;

        debug!(count = journeys.len(), "Transit journeys received");
        Ok(journeys.into_iter().map(Self::to_journey).collect())
    }
}
