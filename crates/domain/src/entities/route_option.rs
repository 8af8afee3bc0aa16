//! Single-leg route options as returned by a routing provider

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::value_objects::Coordinate;

/// Path of one route section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathGeometry {
    /// Google encoded polyline, as sent by the bike router
    Encoded { polyline: String },
    /// Explicit `[lon, lat]` points
    LineString { coordinates: Vec<Coordinate> },
}

/// One section of a route option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RouteSection {
    pub geometry: Option<PathGeometry>,
    /// Provider-specific per-section data, passed through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// A point the route passes through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Waypoint {
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            title: None,
        }
    }

    /// Exact `(longitude, latitude)` bit pattern
    #[must_use]
    pub const fn key(&self) -> (u64, u64) {
        (self.longitude.to_bits(), self.latitude.to_bits())
    }
}

impl From<Coordinate> for Waypoint {
    fn from(c: Coordinate) -> Self {
        Self::new(c.longitude(), c.latitude())
    }
}

/// One named variant of a single-leg route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RouteOption {
    pub id: Option<String>,
    /// Variant label such as `RECOMMENDED` or `FASTER`
    pub title: Option<String>,
    /// Seconds
    pub duration: u64,
    /// Metres by category (`total`, `cycle_track`, `walking`, ...)
    #[serde(default)]
    pub distances: BTreeMap<String, f64>,
    #[serde(default)]
    pub sections: Vec<RouteSection>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    pub estimated_departure: Option<DateTime<FixedOffset>>,
    pub estimated_arrival: Option<DateTime<FixedOffset>>,
    pub details: Option<serde_json::Value>,
}

impl RouteOption {
    /// The label, ignoring blank titles
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Distance for one category, 0 when absent
    #[must_use]
    pub fn distance(&self, category: &str) -> f64 {
        self.distances.get(category).copied().unwrap_or_default()
    }
}
