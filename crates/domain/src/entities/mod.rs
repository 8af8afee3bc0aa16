//! Domain entities
//!
//! Reference data (parking facilities), provider-sourced journeys and route
//! options, and the aggregated itinerary that the engine hands to callers.

mod itinerary;
mod parking;
mod route_option;
mod transit;
mod weather;

pub use itinerary::{ItineraryResult, ItineraryVariant};
pub use parking::{AccessClass, ParkingFacility, ParkingFilter, ShelterClass, nearest_facility};
pub use route_option::{PathGeometry, RouteOption, RouteSection, Waypoint};
pub use transit::{
    DatetimeRepresents, DisplayInformation, SectionKind, StopDescriptor, TransitJourney,
    TransitSection,
};
pub use weather::{WeatherCondition, WeatherSnapshot, WeatherStatus};
