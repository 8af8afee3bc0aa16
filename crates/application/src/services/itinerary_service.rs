//! Itinerary composition
//!
//! Resolves both addresses, optionally picks a bike-friendly transit
//! journey, locates parking, requests the bike and walking legs and merges
//! them into one `ItineraryResult`.

use std::{fmt, sync::Arc};

use chrono::{NaiveDateTime, Utc};
use domain::{
    Coordinate, DatetimeRepresents, ItineraryResult, ItineraryVariant, ParkingFacility,
    ParkingFilter, RouteOption, TimeWindowPolicy, TransitSection, WeatherSnapshot,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{
    facility_locator::NearestFacilityLocator, transit_eligibility::TransitEligibilityFilter,
    variant_aggregator::RouteVariantAggregator,
};
use crate::{
    error::{ApplicationError, RouteLeg},
    ports::{
        BikeRoutingPort, DEFAULT_BIKE_PROFILE, GeocodingPort, ParkingPort, TransitPort,
        WalkingRoutingPort, WeatherPort,
    },
};

/// Parameters of one planning request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub departure_address: String,
    pub arrival_address: String,
    /// End the bike route at a parking facility and walk the rest
    pub to_parking: bool,
    pub parking_filter: ParkingFilter,
    /// Local wall-clock instant; now when absent
    pub travel_instant: Option<NaiveDateTime>,
    pub represents: DatetimeRepresents,
    pub want_forecast: bool,
    pub want_transit: bool,
    pub bike_profile: String,
}

impl ItineraryRequest {
    /// Bike-only request straight to the arrival address
    pub fn new(departure_address: impl Into<String>, arrival_address: impl Into<String>) -> Self {
        Self {
            departure_address: departure_address.into(),
            arrival_address: arrival_address.into(),
            to_parking: false,
            parking_filter: ParkingFilter::Default,
            travel_instant: None,
            represents: DatetimeRepresents::Departure,
            want_forecast: false,
            want_transit: false,
            bike_profile: DEFAULT_BIKE_PROFILE.to_string(),
        }
    }

    /// Stop at the nearest facility matching `filter`
    #[must_use]
    pub fn to_parking(mut self, filter: ParkingFilter) -> Self {
        self.to_parking = true;
        self.parking_filter = filter;
        self
    }

    #[must_use]
    pub const fn at(mut self, instant: NaiveDateTime, represents: DatetimeRepresents) -> Self {
        self.travel_instant = Some(instant);
        self.represents = represents;
        self
    }

    #[must_use]
    pub const fn with_transit(mut self) -> Self {
        self.want_transit = true;
        self
    }

    #[must_use]
    pub const fn with_forecast(mut self) -> Self {
        self.want_forecast = true;
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.bike_profile = profile.into();
        self
    }
}

/// Transit part retained for the result
struct TransitLeg {
    boarding: Coordinate,
    alighting: Coordinate,
    sections: Vec<TransitSection>,
}

/// Orchestrates the providers into one itinerary
pub struct ItineraryService {
    geocoding: Arc<dyn GeocodingPort>,
    bike: Arc<dyn BikeRoutingPort>,
    walking: Arc<dyn WalkingRoutingPort>,
    transit: Arc<dyn TransitPort>,
    weather: Option<Arc<dyn WeatherPort>>,
    locator: NearestFacilityLocator,
    eligibility: TransitEligibilityFilter,
    aggregator: RouteVariantAggregator,
}

impl fmt::Debug for ItineraryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItineraryService")
            .field("has_weather", &self.weather.is_some())
            .field("policy", self.eligibility.policy())
            .finish_non_exhaustive()
    }
}

impl ItineraryService {
    /// Create a service without a weather provider
    pub fn new(
        geocoding: Arc<dyn GeocodingPort>,
        bike: Arc<dyn BikeRoutingPort>,
        walking: Arc<dyn WalkingRoutingPort>,
        transit: Arc<dyn TransitPort>,
        parking: Arc<dyn ParkingPort>,
        policy: TimeWindowPolicy,
    ) -> Self {
        Self {
            geocoding,
            bike,
            walking,
            transit,
            weather: None,
            locator: NearestFacilityLocator::new(parking),
            eligibility: TransitEligibilityFilter::new(policy),
            aggregator: RouteVariantAggregator::new(),
        }
    }

    /// Attach a weather provider
    #[must_use]
    pub fn with_weather(mut self, weather: Arc<dyn WeatherPort>) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Policy deciding when bikes may board
    #[must_use]
    pub const fn policy(&self) -> &TimeWindowPolicy {
        self.eligibility.policy()
    }

    /// Nearest facility lookup, exposed for callers that only need parking
    #[must_use]
    pub const fn locator(&self) -> &NearestFacilityLocator {
        &self.locator
    }

    /// Plan a door-to-door itinerary
    ///
    /// # Errors
    ///
    /// `NoAddressFound` when an address does not resolve, `NoFacilityFound`
    /// when parking is requested and the filter matches nothing, and
    /// `RoutingFailure` when a transit or routing call fails. Weather
    /// failures never abort the composition.
    #[instrument(skip(self), fields(from = %request.departure_address, to = %request.arrival_address))]
    pub async fn compose(
        &self,
        request: &ItineraryRequest,
    ) -> Result<ItineraryResult, ApplicationError> {
        let instant = request.travel_instant.unwrap_or_else(|| self.local_now());

        let (departure, arrival) = tokio::try_join!(
            self.geocoding.resolve(&request.departure_address),
            self.geocoding.resolve(&request.arrival_address),
        )?;
        debug!(%departure, %arrival, "Addresses resolved");

        let (parking, transit, weather) = tokio::join!(
            self.locator.locate(&arrival, request.parking_filter),
            self.select_transit(request, &departure, &arrival, instant),
            self.forecast(request.want_forecast, instant, &departure),
        );
        let transit = transit?;
        let parking = Self::required_parking(request, parking)?;

        let (bike_legs, walk_leg) = self
            .route_legs(request, &departure, &arrival, transit.as_ref(), parking.as_ref())
            .await?;
        let bike_variants = self.aggregator.merge(&bike_legs);
        if bike_variants.is_empty() {
            warn!("Bike router returned no variants");
        }

        info!(
            variants = bike_variants.len(),
            with_transit = transit.is_some(),
            with_walk = walk_leg.is_some(),
            "Itinerary composed"
        );

        Ok(ItineraryResult {
            departure,
            arrival,
            bike_variants,
            walk_leg,
            transit_sections: transit.map(|t| t.sections),
            parking: if request.to_parking { parking } else { None },
            weather,
        })
    }

    fn local_now(&self) -> NaiveDateTime {
        Utc::now()
            .with_timezone(&self.policy().timezone())
            .naive_local()
    }

    /// Parking is looked up for every request but only its failure matters
    /// when the route ends at a facility
    fn required_parking(
        request: &ItineraryRequest,
        parking: Result<ParkingFacility, ApplicationError>,
    ) -> Result<Option<ParkingFacility>, ApplicationError> {
        match parking {
            Ok(facility) => Ok(Some(facility)),
            Err(e) if request.to_parking => Err(e),
            Err(e) => {
                debug!(error = %e, "Parking lookup failed, unused for this request");
                Ok(None)
            },
        }
    }

    async fn select_transit(
        &self,
        request: &ItineraryRequest,
        departure: &Coordinate,
        arrival: &Coordinate,
        instant: NaiveDateTime,
    ) -> Result<Option<TransitLeg>, ApplicationError> {
        if !request.want_transit {
            return Ok(None);
        }

        let journeys = self
            .transit
            .journeys(departure, arrival, instant, request.represents)
            .await
            .map_err(|e| e.on_leg(RouteLeg::Transit))?;
        let candidates = journeys.len();

        let Some((journey, (boarding, alighting))) = self.eligibility.first_boardable(journeys)
        else {
            warn!(candidates, "No transit journey accepts bikes, riding all the way");
            return Ok(None);
        };

        let sections: Vec<TransitSection> =
            journey.public_transport_sections().cloned().collect();
        debug!(
            sections = sections.len(),
            %boarding,
            %alighting,
            "Transit journey selected"
        );

        Ok(Some(TransitLeg {
            boarding,
            alighting,
            sections,
        }))
    }

    async fn forecast(
        &self,
        wanted: bool,
        instant: NaiveDateTime,
        location: &Coordinate,
    ) -> Option<WeatherSnapshot> {
        if !wanted {
            return None;
        }
        let Some(weather) = &self.weather else {
            warn!("Forecast requested but no weather provider configured");
            return Some(WeatherSnapshot::fallback(instant));
        };
        match weather.forecast(instant, location).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "Weather unavailable, using fallback snapshot");
                Some(WeatherSnapshot::fallback(instant))
            },
        }
    }

    async fn route_legs(
        &self,
        request: &ItineraryRequest,
        departure: &Coordinate,
        arrival: &Coordinate,
        transit: Option<&TransitLeg>,
        parking: Option<&ParkingFacility>,
    ) -> Result<(Vec<Vec<RouteOption>>, Option<ItineraryVariant>), ApplicationError> {
        let profile = request.bike_profile.as_str();
        let current = transit.map_or(*departure, |t| t.alighting);

        let parking_location = if request.to_parking {
            let facility = parking.ok_or_else(|| ApplicationError::NoFacilityFound {
                filter: request.parking_filter.name().to_string(),
            })?;
            Some(facility.location)
        } else {
            None
        };

        let leg_a = async {
            match transit {
                Some(t) => self
                    .bike
                    .route(departure, &t.boarding, profile)
                    .await
                    .map(Some)
                    .map_err(|e| e.on_leg(RouteLeg::BikeToTransit)),
                None => Ok(None),
            }
        };
        let leg_b = async {
            match &parking_location {
                Some(target) => self
                    .bike
                    .route(&current, target, profile)
                    .await
                    .map_err(|e| e.on_leg(RouteLeg::BikeToParking)),
                None => self
                    .bike
                    .route(&current, arrival, profile)
                    .await
                    .map_err(|e| e.on_leg(RouteLeg::BikeToArrival)),
            }
        };
        let walk = async {
            match &parking_location {
                Some(from) => self
                    .walking
                    .route(from, arrival)
                    .await
                    .map(Some)
                    .map_err(|e| e.on_leg(RouteLeg::Walk)),
                None => Ok(None),
            }
        };

        let (leg_a, leg_b, walk) = tokio::try_join!(leg_a, leg_b, walk)?;

        let bike_legs: Vec<Vec<RouteOption>> = leg_a.into_iter().chain([leg_b]).collect();
        let walk_leg = walk.and_then(|option| self.aggregator.merge(&[vec![option]]).pop());

        Ok((bike_legs, walk_leg))
    }
}
