//! Cross-leg merging of route variants
//!
//! Each routing leg yields a list of variants ("RECOMMENDED", "FASTER", ...).
//! Fragments sharing a label are folded into one `ItineraryVariant` whose
//! duration and distances are summed, sections concatenated in traversal
//! order and waypoints deduplicated by exact coordinate.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use domain::{ItineraryVariant, RouteOption};

/// Running state for one label
struct Accumulator {
    variant: ItineraryVariant,
    seen_waypoints: HashSet<(u64, u64)>,
    departures: Vec<DateTime<FixedOffset>>,
    arrivals: Vec<DateTime<FixedOffset>>,
}

impl Accumulator {
    fn new(label: String) -> Self {
        Self {
            variant: ItineraryVariant::seeded(label),
            seen_waypoints: HashSet::new(),
            departures: Vec::new(),
            arrivals: Vec::new(),
        }
    }

    fn fold(&mut self, fragment: &RouteOption) {
        let v = &mut self.variant;
        v.duration += fragment.duration;
        for (category, meters) in &fragment.distances {
            *v.distances.entry(category.clone()).or_default() += meters;
        }
        v.sections.extend(fragment.sections.iter().cloned());
        for waypoint in &fragment.waypoints {
            if self.seen_waypoints.insert(waypoint.key()) {
                v.waypoints.push(waypoint.clone());
            }
        }
        if v.id.is_none() {
            v.id = fragment.id.clone().filter(|id| !id.is_empty());
        }
        if v.details.is_none() {
            v.details = fragment.details.clone().filter(|d| !d.is_null());
        }
        self.departures.extend(fragment.estimated_departure);
        self.arrivals.extend(fragment.estimated_arrival);
        v.fragment_count += 1;
    }

    fn finish(mut self) -> ItineraryVariant {
        self.variant.estimated_departure = self.departures.into_iter().min();
        self.variant.estimated_arrival = self.arrivals.into_iter().max();
        self.variant
    }
}

/// Folds per-leg route option lists into per-label itinerary variants
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteVariantAggregator;

impl RouteVariantAggregator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Merge legs given in traversal order
    ///
    /// Output order follows the first appearance of each label. Untitled
    /// fragments get a synthetic `Itinéraire {n}` label, `n` being one more
    /// than the number of labels seen so far. A single leg passes through
    /// option by option, without folding options that share a label.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn merge(&self, legs: &[Vec<RouteOption>]) -> Vec<ItineraryVariant> {
        if let [only] = legs {
            return Self::pass_through(only);
        }

        let mut order: Vec<Accumulator> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for fragment in legs.iter().flatten() {
            let label = fragment
                .label()
                .map_or_else(|| format!("Itinéraire {}", order.len() + 1), str::to_string);
            let slot = *index.entry(label.clone()).or_insert_with(|| {
                order.push(Accumulator::new(label));
                order.len() - 1
            });
            order[slot].fold(fragment);
        }

        order.into_iter().map(Accumulator::finish).collect()
    }

    fn pass_through(options: &[RouteOption]) -> Vec<ItineraryVariant> {
        options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let label = option
                    .label()
                    .map_or_else(|| format!("Itinéraire {}", i + 1), str::to_string);
                let mut accumulator = Accumulator::new(label);
                accumulator.fold(option);
                accumulator.finish()
            })
            .collect()
    }
}
