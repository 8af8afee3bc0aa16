//! Geovelo bike routing integration for CycloFlow
//!
//! Computes cycling routes through the Geovelo `computedroutes` endpoint
//! exposed on the PRIM marketplace. One request yields several labelled
//! variants (`RECOMMENDED`, `FASTER`, `SAFER`, ...), each with an encoded
//! polyline per section.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geovelo::{GeoveloClient, GeoveloConfig, HttpGeoveloClient};
//!
//! let client = HttpGeoveloClient::new(&GeoveloConfig::default())?;
//! let routes = client.compute_routes(&from, &to, "Default").await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{GeoveloClient, HttpGeoveloClient};
pub use config::GeoveloConfig;
pub use error::GeoveloError;
pub use models::{ComputedRoute, RouteSectionData, RouteWaypoint};
