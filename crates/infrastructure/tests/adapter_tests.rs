//! Adapter behaviour over mocked provider clients

use std::sync::Arc;

use application::{ApplicationError, BikeRoutingPort, RouteLeg, WalkingRoutingPort};
use async_trait::async_trait;
use domain::Coordinate;
use infrastructure::{BikeRoutingAdapter, RetryConfig, WalkingAdapter};
use integration_geovelo::{ComputedRoute, GeoveloClient, GeoveloError};
use integration_transit::{Journey, JourneyQuery, TransitClient, TransitError};
use mockall::mock;
use proptest::prelude::*;

mock! {
    pub Router {}

    #[async_trait]
    impl GeoveloClient for Router {
        async fn compute_routes(
            &self,
            from: &Coordinate,
            to: &Coordinate,
            profile: &str,
        ) -> Result<Vec<ComputedRoute>, GeoveloError>;
    }
}

mock! {
    pub Planner {}

    #[async_trait]
    impl TransitClient for Planner {
        async fn search_journeys(&self, query: &JourneyQuery) -> Result<Vec<Journey>, TransitError>;
    }
}

const FROM: Coordinate = Coordinate::new_unchecked(2.347, 48.8583);
const TO: Coordinate = Coordinate::new_unchecked(2.238, 48.892);

fn route(title: &str) -> ComputedRoute {
    ComputedRoute {
        title: Some(title.to_string()),
        duration_secs: 1200,
        ..ComputedRoute::default()
    }
}

#[tokio::test]
async fn test_bike_adapter_retries_transient_failure() {
    let mut router = MockRouter::new();
    let mut calls = 0;
    router
        .expect_compute_routes()
        .times(2)
        .returning(move |_, _, profile| {
            calls += 1;
            if calls == 1 {
                Err(GeoveloError::ServiceUnavailable("HTTP 502".to_string()))
            } else {
                assert_eq!(profile, "Sporty");
                Ok(vec![route("RECOMMENDED"), route("FASTER")])
            }
        });

    let adapter = BikeRoutingAdapter::new(Arc::new(router), RetryConfig::for_testing());
    let options = adapter.route(&FROM, &TO, "Sporty").await.unwrap();

    assert_eq!(options.len(), 2);
    assert_eq!(options[1].label(), Some("FASTER"));
}

#[tokio::test]
async fn test_bike_adapter_does_not_retry_bad_request() {
    let mut router = MockRouter::new();
    router
        .expect_compute_routes()
        .times(1)
        .returning(|_, _, _| Err(GeoveloError::RequestFailed("HTTP 400".to_string())));

    let adapter = BikeRoutingAdapter::new(Arc::new(router), RetryConfig::for_testing());
    let err = adapter.route(&FROM, &TO, "Default").await.unwrap_err();

    assert!(matches!(err, ApplicationError::Internal(_)));
}

#[tokio::test]
async fn test_walking_adapter_without_walk_journey() {
    let mut planner = MockPlanner::new();
    planner
        .expect_search_journeys()
        .withf(|query| !query.restrict_modes)
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let adapter = WalkingAdapter::new(Arc::new(planner), RetryConfig::for_testing());
    let err = adapter.route(&FROM, &TO).await.unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::RoutingFailure {
            leg: RouteLeg::Walk,
            ..
        }
    ));
}

#[tokio::test]
async fn test_walking_adapter_rate_limited() {
    let mut planner = MockPlanner::new();
    planner
        .expect_search_journeys()
        .times(3)
        .returning(|_| {
            Err(TransitError::RateLimitExceeded {
                retry_after_secs: None,
            })
        });

    let adapter = WalkingAdapter::new(Arc::new(planner), RetryConfig::for_testing());
    let err = adapter.route(&FROM, &TO).await.unwrap_err();

    assert!(matches!(err, ApplicationError::RateLimited));
}

proptest! {
    #[test]
    fn backoff_never_exceeds_cap(
        initial in 0u64..2_000,
        extra in 0u64..10_000,
        attempt in 0u32..40,
    ) {
        let config = RetryConfig {
            initial_delay_ms: initial,
            max_delay_ms: initial + extra,
            multiplier: 2.0,
            max_retries: 3,
            jitter_factor: 0.0,
        };
        let delay = config.delay_for_attempt(attempt).as_millis();
        prop_assert!(delay <= u128::from(initial + extra));
        prop_assert!(delay >= u128::from(initial));
    }

    #[test]
    fn jitter_stays_within_factor(base in 100u64..5_000, factor in 0.0f64..1.0) {
        let config = RetryConfig {
            initial_delay_ms: base,
            max_delay_ms: base,
            multiplier: 1.0,
            max_retries: 1,
            jitter_factor: factor,
        };
        #[allow(clippy::cast_precision_loss)]
        let spread = (base as f64) * factor;
        #[allow(clippy::cast_precision_loss)]
        let delay = config.delay_for_attempt(0).as_millis() as f64;
        prop_assert!(delay <= base as f64 + spread + 1.0);
        prop_assert!(delay >= base as f64 - spread - 1.0);
    }
}
