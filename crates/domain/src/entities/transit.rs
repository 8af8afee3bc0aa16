//! Transit journeys as returned by the journey planner

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{policies::TimeWindowPolicy, value_objects::Coordinate};

/// Kind of a journey section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    PublicTransport,
    StreetNetwork,
    Transfer,
    Waiting,
    CrowFly,
    OnDemandTransport,
    #[serde(other)]
    Other,
}

/// Whether a requested instant is a departure or an arrival time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatetimeRepresents {
    #[default]
    Departure,
    Arrival,
}

impl DatetimeRepresents {
    /// Query value understood by the planner
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Departure => "departure",
            Self::Arrival => "arrival",
        }
    }
}

/// Origin or destination of a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopDescriptor {
    pub id: String,
    pub name: String,
    pub coordinate: Option<Coordinate>,
}

/// Line and mode labels of a public-transport section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DisplayInformation {
    pub commercial_mode: Option<String>,
    pub physical_mode: Option<String>,
    /// Line code, e.g. `RER B`
    pub code: Option<String>,
    pub network: Option<String>,
    pub direction: Option<String>,
}

/// One section of a transit journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitSection {
    pub kind: SectionKind,
    /// Local wall-clock departure
    pub departure: NaiveDateTime,
    /// Local wall-clock arrival
    pub arrival: NaiveDateTime,
    pub duration_secs: u64,
    pub from: Option<StopDescriptor>,
    pub to: Option<StopDescriptor>,
    /// Line geometry, `[lon, lat]` ordered
    #[serde(default)]
    pub geometry: Vec<Coordinate>,
    pub display: Option<DisplayInformation>,
    /// Grams of CO2 equivalent
    pub co2_emission: Option<f64>,
}

impl TransitSection {
    /// Whether this section rides a public-transport vehicle
    #[must_use]
    pub fn is_public_transport(&self) -> bool {
        self.kind == SectionKind::PublicTransport
    }
}

/// Ordered sections of one candidate journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitJourney {
    /// Planner tag such as `best`, `fastest` or `non_pt_walk`
    pub kind: Option<String>,
    pub duration_secs: u64,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub sections: Vec<TransitSection>,
}

impl TransitJourney {
    /// Sections ridden on a public-transport vehicle, in order
    pub fn public_transport_sections(&self) -> impl Iterator<Item = &TransitSection> {
        self.sections.iter().filter(|s| s.is_public_transport())
    }

    /// Whether every public-transport section may carry a bike at its own
    /// departure time
    #[must_use]
    pub fn is_eligible(&self, policy: &TimeWindowPolicy) -> bool {
        self.public_transport_sections()
            .all(|s| policy.permits(s.departure))
    }

    /// Boarding stop of the first public-transport section and alighting
    /// stop of the last one
    #[must_use]
    pub fn boundary_stops(&self) -> Option<(Coordinate, Coordinate)> {
        let first = self.public_transport_sections().next()?;
        let last = self.public_transport_sections().last()?;
        let origin = first.from.as_ref()?.coordinate?;
        let destination = last.to.as_ref()?.coordinate?;
        Some((origin, destination))
    }

    /// Whether the planner tagged this as a walking-only journey
    #[must_use]
    pub fn is_plain_walk(&self) -> bool {
        self.kind.as_deref() == Some("non_pt_walk")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::policies::HolidayCalendar;

    fn wednesday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 12)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn stop(id: &str, x: f64, y: f64) -> StopDescriptor {
        StopDescriptor {
            id: id.to_string(),
            name: id.to_string(),
            coordinate: Some(Coordinate::new_unchecked(x, y)),
        }
    }

    fn section(kind: SectionKind, departure: NaiveDateTime, from: &str, to: &str) -> TransitSection {
        TransitSection {
            kind,
            departure,
            arrival: departure,
            duration_secs: 600,
            from: Some(stop(from, 2.0, 48.0)),
            to: Some(stop(to, 2.5, 48.5)),
            geometry: vec![],
            display: None,
            co2_emission: None,
        }
    }

    fn journey(sections: Vec<TransitSection>) -> TransitJourney {
        TransitJourney {
            kind: Some("best".to_string()),
            duration_secs: 1800,
            departure: sections[0].departure,
            arrival: sections[sections.len() - 1].arrival,
            sections,
        }
    }

    fn policy() -> TimeWindowPolicy {
        TimeWindowPolicy::new(chrono_tz::Europe::Paris, HolidayCalendar::none())
    }

    #[test]
    fn one_rush_hour_section_disqualifies() {
        let j = journey(vec![
            section(SectionKind::PublicTransport, wednesday(10, 0), "a", "b"),
            section(SectionKind::PublicTransport, wednesday(17, 0), "b", "c"),
        ]);
        assert!(!j.is_eligible(&policy()));
    }

    #[test]
    fn non_transit_sections_are_ignored() {
        let j = journey(vec![
            section(SectionKind::StreetNetwork, wednesday(8, 0), "home", "a"),
            section(SectionKind::PublicTransport, wednesday(10, 0), "a", "b"),
        ]);
        assert!(j.is_eligible(&policy()));
    }

    #[test]
    fn boundary_stops_use_first_and_last_public_transport() {
        let mut first = section(SectionKind::PublicTransport, wednesday(10, 0), "a", "b");
        first.from = Some(stop("a", 1.0, 1.0));
        let mut last = section(SectionKind::PublicTransport, wednesday(10, 30), "b", "c");
        last.to = Some(stop("c", 3.0, 3.0));
        let j = journey(vec![
            section(SectionKind::StreetNetwork, wednesday(9, 50), "home", "a"),
            first,
            section(SectionKind::Transfer, wednesday(10, 20), "b", "b"),
            last,
        ]);
        let (origin, destination) = j.boundary_stops().unwrap();
        assert_eq!(origin, Coordinate::new_unchecked(1.0, 1.0));
        assert_eq!(destination, Coordinate::new_unchecked(3.0, 3.0));
    }

    #[test]
    fn boundary_stops_absent_without_transit() {
        let j = journey(vec![section(SectionKind::StreetNetwork, wednesday(10, 0), "a", "b")]);
        assert!(j.boundary_stops().is_none());
    }

    #[test]
    fn unknown_section_kind_deserializes_as_other() {
        let kind: SectionKind = serde_json::from_str("\"ridesharing\"").unwrap();
        assert_eq!(kind, SectionKind::Other);
    }
}
