//! Application services - Use case implementations

mod facility_locator;
mod itinerary_service;
mod transit_eligibility;
mod variant_aggregator;

pub use facility_locator::NearestFacilityLocator;
pub use itinerary_service::{ItineraryRequest, ItineraryService};
pub use transit_eligibility::TransitEligibilityFilter;
pub use variant_aggregator::RouteVariantAggregator;
