//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports over the provider clients and the
//! parking dataset, and carries configuration loading, retries and tracing
//! setup.

pub mod adapters;
pub mod config;
pub mod parking;
pub mod retry;
pub mod telemetry;
mod wiring;

pub use adapters::*;
pub use config::{AppConfig, PolicyConfig, PrimAppConfig};
pub use parking::{ParkingConfig, ParkingDataset, ParkingDatasetError};
pub use retry::{RetryConfig, Retryable, retry};
pub use telemetry::{LoggingConfig, TelemetryError, init_tracing};
pub use wiring::build_itinerary_service;
