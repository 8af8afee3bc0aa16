//! Assembly of the itinerary service from configuration

use std::sync::Arc;

use application::{ApplicationError, ItineraryService};
use tracing::{info, instrument};

use crate::{
    adapters::{
        BikeRoutingAdapter, GeocodingAdapter, ParkingAdapter, TransitAdapter, WalkingAdapter,
        WeatherAdapter,
    },
    config::AppConfig,
};

/// Build every adapter and the service over them
///
/// The parking dataset is read once here.
///
/// # Errors
///
/// Returns a configuration error if a client cannot be built, the policy is
/// invalid or the parking dataset cannot be loaded.
#[instrument(skip(config), fields(dataset = %config.parking.dataset_path.display()))]
pub async fn build_itinerary_service(
    config: &AppConfig,
) -> Result<ItineraryService, ApplicationError> {
    let policy = config
        .policy
        .to_policy()
        .map_err(ApplicationError::Configuration)?;

    let transit_config = config.prim.to_transit_config();
    let geocoding = GeocodingAdapter::from_config(&config.geocoding, config.retry.clone())?;
    let bike = BikeRoutingAdapter::from_config(&config.prim.to_geovelo_config(), config.retry.clone())?;
    let walking = WalkingAdapter::from_config(&transit_config, config.retry.clone())?;
    let transit = TransitAdapter::from_config(&transit_config, config.retry.clone())?;
    let parking = ParkingAdapter::load(&config.parking.dataset_path).await?;

    info!(
        facilities = parking.dataset().len(),
        weather = config.weather.is_some(),
        "Itinerary service ready"
    );

    let service = ItineraryService::new(
        Arc::new(geocoding),
        Arc::new(bike),
        Arc::new(walking),
        Arc::new(transit),
        Arc::new(parking),
        policy,
    );

    match &config.weather {
        Some(weather) => {
            let adapter = WeatherAdapter::from_config(weather.clone(), config.retry.clone())?;
            Ok(service.with_weather(Arc::new(adapter)))
        },
        None => Ok(service),
    }
}
