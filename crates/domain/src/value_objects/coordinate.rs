//! Coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// A longitude/latitude pair
///
/// Provider calls use WGS84 degrees. Nearest-neighbour comparisons treat the
/// pair as a planar point in whatever frame the parking dataset is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: longitude must be -180 to 180, latitude must be -90 to 90"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if longitude is not in [-180, 180],
    /// latitude is not in [-90, 90], or either is not finite.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Create a coordinate without validation (for trusted sources)
    #[must_use]
    pub const fn new_unchecked(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Planar Euclidean distance to another coordinate, in the units of the
    /// stored frame. No geodesic correction is applied.
    #[must_use]
    pub fn planar_distance(&self, other: &Self) -> f64 {
        (self.longitude - other.longitude).hypot(self.latitude - other.latitude)
    }

    /// Exact bit pattern of the pair, usable as a hash key
    #[must_use]
    pub const fn bit_key(&self) -> (u64, u64) {
        (self.longitude.to_bits(), self.latitude.to_bits())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.longitude, self.latitude)
    }
}

/// Common locations for defaults
impl Coordinate {
    /// Paris, Hôtel de Ville
    #[must_use]
    pub const fn paris() -> Self {
        Self::new_unchecked(2.3522, 48.8566)
    }
}
