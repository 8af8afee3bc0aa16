//! Adapters implementing the application ports
//!
//! Each adapter wraps one provider client, routes the call through
//! [`crate::retry::retry`] and translates provider errors and payloads into
//! application and domain types.

mod bike_routing_adapter;
mod geocoding_adapter;
mod parking_adapter;
mod transit_adapter;
mod walking_adapter;
mod weather_adapter;

pub use bike_routing_adapter::BikeRoutingAdapter;
pub use geocoding_adapter::GeocodingAdapter;
pub use parking_adapter::ParkingAdapter;
pub use transit_adapter::TransitAdapter;
pub use walking_adapter::WalkingAdapter;
pub use weather_adapter::WeatherAdapter;
