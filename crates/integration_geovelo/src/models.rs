//! Bike route models

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Section of a computed route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSectionData {
    /// Google encoded polyline
    pub geometry: Option<String>,
    /// Untyped section details, passed through
    pub details: Option<serde_json::Value>,
}

/// A waypoint echoed back by the router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteWaypoint {
    pub longitude: f64,
    pub latitude: f64,
    pub title: Option<String>,
}

/// One labelled route variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputedRoute {
    pub id: Option<String>,
    /// Variant label (`RECOMMENDED`, `FASTER`, `SAFER`, ...)
    pub title: Option<String>,
    /// Seconds
    pub duration_secs: u64,
    /// Metres by road category
    pub distances: BTreeMap<String, f64>,
    pub sections: Vec<RouteSectionData>,
    pub waypoints: Vec<RouteWaypoint>,
    pub estimated_departure: Option<DateTime<FixedOffset>>,
    pub estimated_arrival: Option<DateTime<FixedOffset>>,
    pub details: Option<serde_json::Value>,
}

impl ComputedRoute {
    /// Total length in metres
    #[must_use]
    pub fn total_distance(&self) -> f64 {
        self.distances.get("total").copied().unwrap_or_default()
    }
}
