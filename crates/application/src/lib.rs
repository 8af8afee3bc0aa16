//! Application layer - Use cases and orchestration
//!
//! Defines the capability ports the itinerary engine depends on and the
//! services that compose bike, transit and walking legs into one result.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, RouteLeg};
pub use ports::*;
pub use services::*;
