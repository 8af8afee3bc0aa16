//! Bike-parking reference dataset

mod dataset;

pub use dataset::{ParkingConfig, ParkingDataset, ParkingDatasetError};
