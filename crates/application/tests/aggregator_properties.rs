//! Property-based tests for route variant merging

use std::collections::BTreeSet;

use application::RouteVariantAggregator;
use domain::{RouteOption, Waypoint};
use proptest::prelude::*;

const LABELS: [&str; 3] = ["RECOMMENDED", "FASTER", "SAFER"];

fn fragment_strategy() -> impl Strategy<Value = RouteOption> {
    (
        prop::sample::select(LABELS.to_vec()),
        0u64..10_000,
        0u32..50_000,
        prop::collection::vec((0i32..20, 0i32..20), 0..6),
    )
        .prop_map(|(label, duration, total, points)| {
            let mut option = RouteOption {
                title: Some(label.to_string()),
                duration,
                waypoints: points
                    .into_iter()
                    .map(|(x, y)| Waypoint::new(f64::from(x) / 10.0, f64::from(y) / 10.0))
                    .collect(),
                ..RouteOption::default()
            };
            // integral metres keep float sums exact regardless of grouping
            option.distances.insert("total".to_string(), f64::from(total));
            option
        })
}

fn legs_strategy() -> impl Strategy<Value = Vec<Vec<RouteOption>>> {
    prop::collection::vec(prop::collection::vec(fragment_strategy(), 0..4), 0..5)
}

fn totals(legs: &[Vec<RouteOption>]) -> Vec<(String, u64, f64)> {
    let mut out: Vec<_> = RouteVariantAggregator::new()
        .merge(legs)
        .into_iter()
        .map(|v| {
            let total = v.distance("total");
            (v.label, v.duration, total)
        })
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

proptest! {
    #[test]
    fn label_set_is_preserved(legs in legs_strategy()) {
        let input: BTreeSet<String> = legs
            .iter()
            .flatten()
            .filter_map(|o| o.title.clone())
            .collect();
        let output: BTreeSet<String> = RouteVariantAggregator::new()
            .merge(&legs)
            .into_iter()
            .map(|v| v.label)
            .collect();
        prop_assert_eq!(input, output);
    }

    #[test]
    fn totals_ignore_leg_grouping(
        a in prop::collection::vec(fragment_strategy(), 0..4),
        b in prop::collection::vec(fragment_strategy(), 0..4),
        c in prop::collection::vec(fragment_strategy(), 0..4)
    ) {
        let ab_c = vec![[a.clone(), b.clone()].concat(), c.clone()];
        let a_bc = vec![a.clone(), [b.clone(), c.clone()].concat()];
        let flat = vec![a, b, c];
        prop_assert_eq!(totals(&ab_c), totals(&a_bc));
        prop_assert_eq!(totals(&ab_c), totals(&flat));
    }

    #[test]
    fn totals_never_decrease_with_more_fragments(
        legs in legs_strategy(),
        extra in fragment_strategy()
    ) {
        let before = totals(&legs);
        let mut more = legs.clone();
        more.push(vec![extra]);
        let after = totals(&more);
        for (label, duration, distance) in before {
            let (_, d, m) = after.iter().find(|t| t.0 == label).cloned().unwrap();
            prop_assert!(d >= duration);
            prop_assert!(m >= distance);
        }
    }

    #[test]
    fn merging_same_fragment_twice_adds_no_waypoint(fragment in fragment_strategy()) {
        let once = RouteVariantAggregator::new().merge(&[vec![fragment.clone()]]);
        let twice = RouteVariantAggregator::new().merge(&[vec![fragment.clone()], vec![fragment]]);
        prop_assert_eq!(&once[0].waypoints, &twice[0].waypoints);
    }

    #[test]
    fn waypoints_are_unique(legs in legs_strategy()) {
        for variant in RouteVariantAggregator::new().merge(&legs) {
            let keys: BTreeSet<_> = variant.waypoints.iter().map(Waypoint::key).collect();
            prop_assert_eq!(keys.len(), variant.waypoints.len());
        }
    }
}
