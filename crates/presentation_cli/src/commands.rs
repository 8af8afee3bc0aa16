//! Subcommand handlers; each returns the JSON document to print

use std::sync::Arc;

use anyhow::Context;
use application::{GeocodingPort, ItineraryRequest, NearestFacilityLocator};
use chrono::{NaiveDateTime, Utc};
use domain::{
    Coordinate, DatetimeRepresents, ItineraryResult, ParkingFacility, ParkingFilter,
    format_compact_local,
};
use infrastructure::{AppConfig, GeocodingAdapter, ParkingAdapter, build_itinerary_service};
use serde::Serialize;
use tracing::info;

/// Flags of the `plan` subcommand
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub parking: Option<ParkingFilter>,
    pub at: Option<NaiveDateTime>,
    pub arrive_by: bool,
    pub transit: bool,
    pub forecast: bool,
    pub profile: String,
}

impl PlanOptions {
    fn into_request(self, from: String, to: String) -> ItineraryRequest {
        let mut request = ItineraryRequest::new(from, to).with_profile(self.profile);
        if let Some(filter) = self.parking {
            request = request.to_parking(filter);
        }
        if let Some(at) = self.at {
            let represents = if self.arrive_by {
                DatetimeRepresents::Arrival
            } else {
                DatetimeRepresents::Departure
            };
            request = request.at(at, represents);
        }
        if self.transit {
            request = request.with_transit();
        }
        if self.forecast {
            request = request.with_forecast();
        }
        request
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VariantTotals<'a> {
    label: &'a str,
    total_duration_secs: u64,
    total_distance_m: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanOutput<'a> {
    itinerary: &'a ItineraryResult,
    totals: Vec<VariantTotals<'a>>,
}

fn totals(result: &ItineraryResult) -> Vec<VariantTotals<'_>> {
    result
        .bike_variants
        .iter()
        .map(|variant| VariantTotals {
            label: &variant.label,
            total_duration_secs: result.total_duration_secs(variant),
            total_distance_m: result.total_distance_m(variant),
        })
        .collect()
}

/// Plan an itinerary and print it with per-variant totals
pub async fn plan(
    config: &AppConfig,
    from: String,
    to: String,
    options: PlanOptions,
) -> anyhow::Result<String> {
    let service = build_itinerary_service(config).await?;
    let request = options.into_request(from, to);

    let result = service.compose(&request).await?;
    if !result.has_route() {
        info!("No bike route found");
    }

    let output = PlanOutput {
        itinerary: &result,
        totals: totals(&result),
    };
    serde_json::to_string_pretty(&output).context("Failed to serialize itinerary")
}

#[derive(Debug, Serialize)]
struct NearestParkingOutput<'a> {
    address: &'a str,
    coordinate: Coordinate,
    filter: ParkingFilter,
    filter_label: &'static str,
    facility: ParkingFacility,
}

/// Resolve an address and print the closest facility matching `filter`
pub async fn nearest_parking(
    config: &AppConfig,
    address: &str,
    filter: ParkingFilter,
) -> anyhow::Result<String> {
    let geocoding = GeocodingAdapter::from_config(&config.geocoding, config.retry.clone())?;
    let parking = ParkingAdapter::load(&config.parking.dataset_path).await?;
    let locator = NearestFacilityLocator::new(Arc::new(parking));

    let coordinate = geocoding.resolve(address).await?;
    let facility = locator.locate(&coordinate, filter).await?;

    let output = NearestParkingOutput {
        address,
        coordinate,
        filter,
        filter_label: filter.label(),
        facility,
    };
    serde_json::to_string_pretty(&output).context("Failed to serialize facility")
}

#[derive(Debug, Serialize)]
struct BikeAllowedOutput {
    /// Local wall-clock instant, `YYYYMMDDTHHMMSS`
    instant: String,
    timezone: String,
    allowed: bool,
}

/// Print whether a bike may board at `at`, or now
pub fn bike_allowed(config: &AppConfig, at: Option<NaiveDateTime>) -> anyhow::Result<String> {
    let policy = config
        .policy
        .to_policy()
        .map_err(anyhow::Error::msg)?;
    let instant = at.unwrap_or_else(|| {
        Utc::now()
            .with_timezone(&policy.timezone())
            .naive_local()
    });

    let output = BikeAllowedOutput {
        instant: format_compact_local(&instant),
        timezone: policy.timezone().name().to_string(),
        allowed: policy.is_bike_carriage_permitted(Some(instant)),
    };
    serde_json::to_string_pretty(&output).context("Failed to serialize policy answer")
}

#[derive(Debug, Serialize)]
struct FilterEntry {
    name: &'static str,
    label: &'static str,
}

/// Print every parking filter with its label
pub fn filters() -> anyhow::Result<String> {
    let entries: Vec<FilterEntry> = ParkingFilter::ALL
        .iter()
        .map(|f| FilterEntry {
            name: f.name(),
            label: f.label(),
        })
        .collect();
    serde_json::to_string_pretty(&entries).context("Failed to serialize filters")
}
