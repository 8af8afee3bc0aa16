//! Application-level errors

use std::fmt;

use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Leg of an itinerary, used to locate routing failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteLeg {
    /// Transit journey search
    Transit,
    /// Bike from the departure to the first boarding stop
    BikeToTransit,
    /// Bike from the current position to the parking facility
    BikeToParking,
    /// Bike from the current position to the arrival address
    BikeToArrival,
    /// Walk from the parking facility to the arrival address
    Walk,
}

impl fmt::Display for RouteLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transit => "transit",
            Self::BikeToTransit => "bike to transit",
            Self::BikeToParking => "bike to parking",
            Self::BikeToArrival => "bike to arrival",
            Self::Walk => "walk",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Geocoding returned nothing for an address
    #[error("No address found for '{address}'")]
    NoAddressFound { address: String },

    /// The parking filter matched no facility
    #[error("No parking facility matches filter '{filter}'")]
    NoFacilityFound { filter: String },

    /// A mandatory routing or transit call failed or returned unusable data
    #[error("Routing failed on {leg} leg: {reason}")]
    RoutingFailure { leg: RouteLeg, reason: String },

    /// Weather provider unavailable; never fatal to a composition
    #[error("Weather unavailable: {0}")]
    WeatherUnavailable(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::RateLimited
                | ApplicationError::ExternalService(_)
                | ApplicationError::WeatherUnavailable(_)
        )
    }

    /// Attribute an upstream failure to a leg
    ///
    /// Failures already attributed to a leg and rate limits are kept as they
    /// are.
    #[must_use]
    pub fn on_leg(self, leg: RouteLeg) -> Self {
        match self {
            Self::RoutingFailure { .. } | Self::RateLimited => self,
            other => Self::RoutingFailure {
                leg,
                reason: other.to_string(),
            },
        }
    }

    pub fn routing(leg: RouteLeg, reason: impl Into<String>) -> Self {
        Self::RoutingFailure {
            leg,
            reason: reason.into(),
        }
    }
}
