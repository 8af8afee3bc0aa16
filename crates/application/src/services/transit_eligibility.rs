//! Selection of journeys that accept a bike on board

use domain::{Coordinate, TimeWindowPolicy, TransitJourney};
use tracing::debug;

/// Keeps journeys whose every public-transport section passes the
/// bike-carriage policy
#[derive(Debug, Clone, Default)]
pub struct TransitEligibilityFilter {
    policy: TimeWindowPolicy,
}

impl TransitEligibilityFilter {
    #[must_use]
    pub const fn new(policy: TimeWindowPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &TimeWindowPolicy {
        &self.policy
    }

    /// Eligible journeys, input order preserved
    #[must_use]
    pub fn filter(&self, journeys: Vec<TransitJourney>) -> Vec<TransitJourney> {
        journeys
            .into_iter()
            .filter(|journey| {
                let eligible = journey.is_eligible(&self.policy);
                if !eligible {
                    debug!(
                        departure = %journey.departure,
                        "Journey rejected: bike not allowed on a section"
                    );
                }
                eligible
            })
            .collect()
    }

    /// First eligible journey in provider order
    #[must_use]
    pub fn first_eligible(&self, journeys: Vec<TransitJourney>) -> Option<TransitJourney> {
        self.filter(journeys).into_iter().next()
    }

    /// First eligible journey that rides a located public-transport section
    ///
    /// Walk-only or bike-only journeys pass the policy trivially and are
    /// skipped, as are journeys whose boarding or alighting stop has no
    /// coordinate.
    #[must_use]
    pub fn first_boardable(
        &self,
        journeys: Vec<TransitJourney>,
    ) -> Option<(TransitJourney, (Coordinate, Coordinate))> {
        self.filter(journeys).into_iter().find_map(|journey| {
            let Some(stops) = journey.boundary_stops() else {
                debug!(kind = ?journey.kind, "Journey skipped: no located public transport stop");
                return None;
            };
            Some((journey, stops))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use domain::{HolidayCalendar, SectionKind, StopDescriptor, TransitSection};

    use super::*;

    fn wed(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 12)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn journey(tag: &str, departures: &[NaiveDateTime]) -> TransitJourney {
        let sections = departures
            .iter()
            .map(|d| TransitSection {
                kind: SectionKind::PublicTransport,
                departure: *d,
                arrival: *d,
                duration_secs: 600,
                from: None,
                to: None,
                geometry: vec![],
                display: None,
                co2_emission: None,
            })
            .collect();
        TransitJourney {
            kind: Some(tag.to_string()),
            duration_secs: 600,
            departure: departures[0],
            arrival: departures[0],
            sections,
        }
    }

    fn filter() -> TransitEligibilityFilter {
        TransitEligibilityFilter::new(TimeWindowPolicy::new(
            chrono_tz::Europe::Paris,
            HolidayCalendar::none(),
        ))
    }

    #[test]
    fn keeps_order_of_eligible_journeys() {
        let kept = filter().filter(vec![
            journey("a", &[wed(10)]),
            journey("b", &[wed(8)]),
            journey("c", &[wed(20)]),
        ]);
        let tags: Vec<_> = kept.iter().filter_map(|j| j.kind.as_deref()).collect();
        assert_eq!(tags, vec!["a", "c"]);
    }

    #[test]
    fn one_bad_section_excludes_journey() {
        let kept = filter().filter(vec![journey("a", &[wed(10), wed(17)])]);
        assert!(kept.is_empty());
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert!(filter().filter(vec![]).is_empty());
        assert!(filter().first_eligible(vec![]).is_none());
    }

    fn located(mut journey: TransitJourney) -> TransitJourney {
        for section in &mut journey.sections {
            section.from = Some(StopDescriptor {
                id: "stop:a".to_string(),
                name: "A".to_string(),
                coordinate: Some(Coordinate::new_unchecked(2.0, 48.0)),
            });
            section.to = Some(StopDescriptor {
                id: "stop:b".to_string(),
                name: "B".to_string(),
                coordinate: Some(Coordinate::new_unchecked(2.1, 48.1)),
            });
        }
        journey
    }

    #[test]
    fn boardable_skips_journeys_without_transit() {
        let mut walk = journey("non_pt_walk", &[wed(10)]);
        walk.sections[0].kind = SectionKind::StreetNetwork;
        let walk = located(walk);
        let unlocated = journey("unlocated", &[wed(10)]);
        let train = located(journey("train", &[wed(11)]));

        let (picked, (boarding, alighting)) = filter()
            .first_boardable(vec![walk, unlocated, train])
            .unwrap();
        assert_eq!(picked.kind.as_deref(), Some("train"));
        assert_eq!(boarding, Coordinate::new_unchecked(2.0, 48.0));
        assert_eq!(alighting, Coordinate::new_unchecked(2.1, 48.1));
    }

    #[test]
    fn boardable_none_when_only_walks() {
        let mut walk = journey("non_pt_walk", &[wed(10)]);
        walk.sections[0].kind = SectionKind::StreetNetwork;
        assert!(filter().first_boardable(vec![located(walk)]).is_none());
    }

    #[test]
    fn first_fit_not_best_fit() {
        let first = filter()
            .first_eligible(vec![journey("slow", &[wed(11)]), journey("fast", &[wed(12)])])
            .unwrap();
        assert_eq!(first.kind.as_deref(), Some("slow"));
    }
}
