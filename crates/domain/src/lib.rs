//! Domain layer for CycloFlow
//!
//! Contains the journey vocabulary (coordinates, parking facilities, transit
//! journeys, route options, itinerary variants) and the pure policies that
//! operate on it. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod policies;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use policies::*;
pub use value_objects::*;
