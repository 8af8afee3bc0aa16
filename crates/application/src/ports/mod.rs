//! Port definitions for application layer
//!
//! Ports are the capability interfaces the itinerary engine consumes.
//! Adapters in the infrastructure layer implement them over the provider
//! clients; tests substitute fakes.

mod geocoding_port;
mod parking_port;
mod routing_port;
mod transit_port;
mod weather_port;

pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use parking_port::ParkingPort;
#[cfg(test)]
pub use parking_port::MockParkingPort;
pub use routing_port::{BikeRoutingPort, DEFAULT_BIKE_PROFILE, WalkingRoutingPort};
#[cfg(test)]
pub use routing_port::{MockBikeRoutingPort, MockWalkingRoutingPort};
pub use transit_port::TransitPort;
#[cfg(test)]
pub use transit_port::MockTransitPort;
pub use weather_port::WeatherPort;
#[cfg(test)]
pub use weather_port::MockWeatherPort;
