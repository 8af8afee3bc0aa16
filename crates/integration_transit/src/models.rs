//! Journey planner data models

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use domain::{Coordinate, DatetimeRepresents};
use serde::{Deserialize, Serialize};

/// Journey type Navitia assigns to a walking-only itinerary
pub const WALK_ONLY_JOURNEY: &str = "non_pt_walk";

/// Parameters of a `/journeys` search
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyQuery {
    /// Origin
    pub from: Coordinate,
    /// Destination
    pub to: Coordinate,
    /// Local instant the search is anchored on; planner's "now" when unset
    pub datetime: Option<NaiveDateTime>,
    /// Whether `datetime` is a departure or an arrival
    pub represents: DatetimeRepresents,
    /// Restrict to the configured bike-carrying commercial modes
    pub restrict_modes: bool,
}

impl JourneyQuery {
    /// Transit search restricted to bike-carrying modes
    #[must_use]
    pub const fn transit(from: Coordinate, to: Coordinate) -> Self {
        Self {
            from,
            to,
            datetime: None,
            represents: DatetimeRepresents::Departure,
            restrict_modes: true,
        }
    }

    /// Unrestricted search used to obtain a walking journey
    #[must_use]
    pub const fn walking(from: Coordinate, to: Coordinate) -> Self {
        Self {
            from,
            to,
            datetime: None,
            represents: DatetimeRepresents::Departure,
            restrict_modes: false,
        }
    }

    /// Anchor the search on a local instant
    #[must_use]
    pub const fn at(mut self, datetime: NaiveDateTime, represents: DatetimeRepresents) -> Self {
        self.datetime = Some(datetime);
        self.represents = represents;
        self
    }
}

/// A stop, address or POI referenced by a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Navitia identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Position, when the planner provides one
    pub coordinate: Option<Coordinate>,
}

/// Line information of a public transport section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub commercial_mode: Option<String>,
    pub physical_mode: Option<String>,
    pub code: Option<String>,
    pub network: Option<String>,
    pub direction: Option<String>,
    pub label: Option<String>,
}

/// One section of a journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Raw Navitia section type (`public_transport`, `street_network`, ...)
    pub section_type: String,
    /// Street network mode (`walking`, `bike`) when relevant
    pub mode: Option<String>,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration_secs: u64,
    pub from: Option<Place>,
    pub to: Option<Place>,
    /// GeoJSON line as `(lon, lat)` pairs
    pub geometry: Vec<Coordinate>,
    pub display: Option<DisplayInfo>,
    /// Emission estimate in gEC
    pub co2_emission: Option<f64>,
}

impl Section {
    /// Returns true for sections travelled aboard a vehicle
    #[must_use]
    pub fn is_public_transport(&self) -> bool {
        self.section_type == "public_transport"
    }
}

/// A complete journey returned by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    /// Navitia journey type (`best`, `fastest`, `non_pt_walk`, ...)
    pub journey_type: Option<String>,
    pub duration_secs: u64,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    /// Distances by mode in metres
    pub distances: BTreeMap<String, f64>,
    pub sections: Vec<Section>,
    pub co2_emission: Option<f64>,
}

impl Journey {
    /// Returns true if Navitia flagged this journey as walking only
    #[must_use]
    pub fn is_walk_only(&self) -> bool {
        self.journey_type.as_deref() == Some(WALK_ONLY_JOURNEY)
    }

    /// Walking distance in metres
    #[must_use]
    pub fn walking_distance(&self) -> f64 {
        self.distances.get("walking").copied().unwrap_or_default()
    }

    /// Number of vehicle sections
    #[must_use]
    pub fn transfers(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.is_public_transport())
            .count()
            .saturating_sub(1)
    }
}
