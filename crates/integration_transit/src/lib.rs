//! Journey planner integration for CycloFlow
//!
//! Provides transit and walking journeys via a Navitia-compatible journey
//! planner (Île-de-France Mobilités' PRIM marketplace) and address geocoding
//! via [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org).
//!
//! # Architecture
//!
//! [`TransitClient`] defines the interface for journey planning,
//! implemented by [`NavitiaTransitClient`]. [`GeocodingClient`] handles
//! address-to-coordinate conversion via [`NominatimGeocodingClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_transit::{JourneyQuery, NavitiaTransitClient, TransitClient, TransitConfig};
//!
//! let client = NavitiaTransitClient::new(&TransitConfig::default())?;
//! let journeys = client
//!     .search_journeys(&JourneyQuery::transit(from, to).at(instant, DatetimeRepresents::Departure))
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod geocoding;
mod models;

pub use client::{NavitiaTransitClient, TransitClient, select_walking_journey};
pub use config::TransitConfig;
pub use error::TransitError;
pub use geocoding::{GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient};
pub use models::{DisplayInfo, Journey, JourneyQuery, Place, Section};
