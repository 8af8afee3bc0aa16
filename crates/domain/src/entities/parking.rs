//! Bike-parking facilities and the named filters applied before a
//! nearest-neighbour search

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::Coordinate};

/// Who may use a facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccessClass {
    /// Residents or employees only
    Private,
    /// Customers of a shop or service
    Clientele,
    /// Public or not recorded
    #[default]
    Unspecified,
}

/// Physical protection offered by a facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShelterClass {
    /// Roofed shelter
    Shelter,
    /// Individual lockable box
    Locker,
    /// Open racks or not recorded
    #[default]
    Unspecified,
}

/// One bike-parking facility from the reference dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingFacility {
    /// Source identifier (OSM id)
    pub id: String,
    /// Display name, if the dataset has one
    pub name: Option<String>,
    /// Number of bike places
    pub capacity: Option<u32>,
    /// Location in the dataset's native frame
    pub location: Coordinate,
    pub access: AccessClass,
    pub shelter: ShelterClass,
    pub supervised: bool,
    pub covered: bool,
    pub paying: bool,
    /// Commune name
    pub commune: Option<String>,
    /// INSEE commune code
    pub insee: Option<String>,
}

impl ParkingFacility {
    /// Create a facility with only the required attributes set
    #[must_use]
    pub fn new(id: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: None,
            capacity: None,
            location,
            access: AccessClass::Unspecified,
            shelter: ShelterClass::Unspecified,
            supervised: false,
            covered: false,
            paying: false,
            commune: None,
            insee: None,
        }
    }

    /// Set the access class
    #[must_use]
    pub const fn with_access(mut self, access: AccessClass) -> Self {
        self.access = access;
        self
    }

    /// Set the shelter class
    #[must_use]
    pub const fn with_shelter(mut self, shelter: ShelterClass) -> Self {
        self.shelter = shelter;
        self
    }

    /// Mark the facility as supervised
    #[must_use]
    pub const fn supervised(mut self) -> Self {
        self.supervised = true;
        self
    }

    /// Set the capacity
    #[must_use]
    pub const fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

/// Named predicate selecting the candidate facilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ParkingFilter {
    /// Private access and sheltered
    #[serde(rename = "privee_abris")]
    PrivateShelter,
    /// Customer access and sheltered
    #[serde(rename = "clientele_abris")]
    ClienteleShelter,
    /// Secure lockers
    #[serde(rename = "casier")]
    Locker,
    /// Supervised facilities
    #[serde(rename = "surveille")]
    Supervised,
    /// Union of all the above
    #[serde(rename = "default")]
    #[default]
    Default,
}

impl ParkingFilter {
    /// Every filter, in display order
    pub const ALL: [Self; 5] = [
        Self::PrivateShelter,
        Self::ClienteleShelter,
        Self::Locker,
        Self::Supervised,
        Self::Default,
    ];

    /// Whether a facility satisfies this filter
    #[must_use]
    pub fn matches(self, facility: &ParkingFacility) -> bool {
        match self {
            Self::PrivateShelter => {
                facility.access == AccessClass::Private && facility.shelter == ShelterClass::Shelter
            },
            Self::ClienteleShelter => {
                facility.access == AccessClass::Clientele
                    && facility.shelter == ShelterClass::Shelter
            },
            Self::Locker => facility.shelter == ShelterClass::Locker,
            Self::Supervised => facility.supervised,
            Self::Default => [
                Self::PrivateShelter,
                Self::ClienteleShelter,
                Self::Locker,
                Self::Supervised,
            ]
            .iter()
            .any(|f| f.matches(facility)),
        }
    }

    /// Dataset key of the filter view
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PrivateShelter => "privee_abris",
            Self::ClienteleShelter => "clientele_abris",
            Self::Locker => "casier",
            Self::Supervised => "surveille",
            Self::Default => "default",
        }
    }

    /// Human label shown next to the filter
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PrivateShelter => "Privé (abri)",
            Self::ClienteleShelter => "Clientèle (abri)",
            Self::Locker => "Casier sécurisé",
            Self::Supervised => "Surveillé",
            Self::Default => "Tous parkings",
        }
    }
}

impl fmt::Display for ParkingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParkingFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownParkingFilter(s.to_string()))
    }
}

/// Facility closest to `target` among those matching `filter`
///
/// Distance is planar in the dataset frame. On equal distance the facility
/// seen first wins.
pub fn nearest_facility<'a, I>(
    facilities: I,
    target: &Coordinate,
    filter: ParkingFilter,
) -> Option<&'a ParkingFacility>
where
    I: IntoIterator<Item = &'a ParkingFacility>,
{
    facilities
        .into_iter()
        .filter(|f| filter.matches(f))
        .fold(None, |best: Option<(&ParkingFacility, f64)>, candidate| {
            let distance = candidate.location.planar_distance(target);
            match best {
                Some((_, best_distance)) if distance >= best_distance || distance.is_nan() => best,
                _ => Some((candidate, distance)),
            }
        })
        .map(|(facility, _)| facility)
}
