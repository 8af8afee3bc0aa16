//! Aggregated itinerary variants and the composed result

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{
    parking::ParkingFacility,
    route_option::{RouteSection, Waypoint},
    transit::TransitSection,
    weather::WeatherSnapshot,
};
use crate::value_objects::Coordinate;

/// Cross-leg merge of every fragment sharing one variant label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryVariant {
    pub label: String,
    /// First non-empty provider id seen for this label
    pub id: Option<String>,
    /// Seconds, summed over legs
    pub duration: u64,
    /// Metres by category, summed over legs
    pub distances: BTreeMap<String, f64>,
    /// Sections of every leg, in traversal order
    pub sections: Vec<RouteSection>,
    /// Unique waypoints, first-seen order
    pub waypoints: Vec<Waypoint>,
    pub details: Option<serde_json::Value>,
    pub estimated_departure: Option<DateTime<FixedOffset>>,
    pub estimated_arrival: Option<DateTime<FixedOffset>>,
    /// Number of leg fragments folded into this variant
    pub fragment_count: usize,
}

impl ItineraryVariant {
    /// Empty variant for a newly seen label
    #[must_use]
    pub fn seeded(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: None,
            duration: 0,
            distances: BTreeMap::new(),
            sections: Vec::new(),
            waypoints: Vec::new(),
            details: None,
            estimated_departure: None,
            estimated_arrival: None,
            fragment_count: 0,
        }
    }

    /// Distance for one category, 0 when absent
    #[must_use]
    pub fn distance(&self, category: &str) -> f64 {
        self.distances.get(category).copied().unwrap_or_default()
    }
}

/// Everything the engine returns for one planning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryResult {
    /// Resolved departure point
    pub departure: Coordinate,
    /// Resolved arrival point
    pub arrival: Coordinate,
    pub bike_variants: Vec<ItineraryVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_leg: Option<ItineraryVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_sections: Option<Vec<TransitSection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<ParkingFacility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
}

impl ItineraryResult {
    /// Whether at least one bike variant was found
    #[must_use]
    pub fn has_route(&self) -> bool {
        !self.bike_variants.is_empty()
    }

    /// Seconds spent on board transit sections
    #[must_use]
    pub fn transit_duration_secs(&self) -> u64 {
        self.transit_sections
            .as_deref()
            .map_or(0, |sections| sections.iter().map(|s| s.duration_secs).sum())
    }

    /// Door-to-door duration when riding `variant`
    #[must_use]
    pub fn total_duration_secs(&self, variant: &ItineraryVariant) -> u64 {
        let walk = self.walk_leg.as_ref().map_or(0, |w| w.duration);
        variant.duration + walk + self.transit_duration_secs()
    }

    /// Bike plus walking distance when riding `variant`, in metres
    #[must_use]
    pub fn total_distance_m(&self, variant: &ItineraryVariant) -> f64 {
        let walk = self.walk_leg.as_ref().map_or(0.0, |w| w.distance("walking"));
        variant.distance("total") + walk
    }

    /// Variant by label
    #[must_use]
    pub fn variant(&self, label: &str) -> Option<&ItineraryVariant> {
        self.bike_variants.iter().find(|v| v.label == label)
    }
}
