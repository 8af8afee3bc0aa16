//! Navitia journey planner client via the PRIM marketplace
//!
//! Talks to the `/journeys` endpoint of a Navitia coverage. Transit
//! searches are restricted to the commercial modes that carry bikes;
//! walking searches are unrestricted and the walking-only journey is
//! picked out of the answer.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use domain::{Coordinate, format_compact_local, parse_compact_local};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument, warn};

use crate::config::TransitConfig;
use crate::error::TransitError;
use crate::models::{DisplayInfo, Journey, JourneyQuery, Place, Section};

/// Navitia error id returned when no itinerary exists
const NO_SOLUTION: &str = "no_solution";

/// Trait for journey planner clients
#[async_trait]
pub trait TransitClient: Send + Sync {
    /// Search journeys between two points
    async fn search_journeys(&self, query: &JourneyQuery) -> Result<Vec<Journey>, TransitError>;

    /// Walking journey between two points
    async fn walking_journey(
        &self,
        from: &Coordinate,
        to: &Coordinate,
    ) -> Result<Journey, TransitError> {
        let journeys = self
            .search_journeys(&JourneyQuery::walking(*from, *to))
            .await?;
        select_walking_journey(journeys, from, to)
    }
}

/// Pick the walking journey out of an unrestricted search
///
/// A single answer is taken as is. Otherwise the first journey flagged
/// walking-only wins.
///
/// # Errors
///
/// Returns [`TransitError::NoRoutesFound`] when nothing qualifies.
pub fn select_walking_journey(
    journeys: Vec<Journey>,
    from: &Coordinate,
    to: &Coordinate,
) -> Result<Journey, TransitError> {
    if journeys.len() == 1 {
        return journeys.into_iter().next().ok_or_else(|| no_routes(from, to));
    }

    let mut walks = journeys.into_iter().filter(Journey::is_walk_only);
    let first = walks.next().ok_or_else(|| no_routes(from, to))?;
    let others = walks.count();
    if others > 0 {
        warn!(extra = others, "Several walking journeys returned, keeping the first");
    }
    Ok(first)
}

fn no_routes(from: &Coordinate, to: &Coordinate) -> TransitError {
    TransitError::NoRoutesFound {
        from: from.to_string(),
        to: to.to_string(),
    }
}

/// Navitia place parameter, `lon;lat`
fn place_param(c: &Coordinate) -> String {
    format!("{};{}", c.longitude(), c.latitude())
}

/// Navitia client for the PRIM marketplace
#[derive(Debug)]
pub struct NavitiaTransitClient {
    client: Client,
    config: TransitConfig,
}

impl NavitiaTransitClient {
    /// Create a new Navitia client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &TransitConfig) -> Result<Self, TransitError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("CycloFlow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransitError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Query string for a journey search
    fn query_params(&self, query: &JourneyQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("from", place_param(&query.from)),
            ("to", place_param(&query.to)),
        ];

        if let Some(datetime) = query.datetime {
            params.push(("datetime", format_compact_local(&datetime)));
            params.push(("datetime_represents", query.represents.as_str().to_string()));
        }

        if query.restrict_modes {
            for mode in &self.config.allowed_modes {
                params.push(("allowed_id[]", mode.clone()));
            }
        }

        params
    }

    /// Parse the raw Navitia response into typed journeys
    fn parse_journeys_response(body: &str) -> Result<Vec<Journey>, TransitError> {
        let raw: RawJourneysResponse =
            serde_json::from_str(body).map_err(|e| TransitError::ParseError(e.to_string()))?;

        if let Some(error) = raw.error {
            if error.id.as_deref() == Some(NO_SOLUTION) {
                debug!(message = ?error.message, "Planner found no solution");
                return Ok(Vec::new());
            }
            return Err(TransitError::RequestFailed(
                error
                    .message
                    .or(error.id)
                    .unwrap_or_else(|| "unknown planner error".to_string()),
            ));
        }

        raw.journeys.into_iter().map(Self::convert_journey).collect()
    }

    fn convert_journey(raw: RawJourney) -> Result<Journey, TransitError> {
        let departure = parse_instant(&raw.departure_date_time)?;
        let arrival = parse_instant(&raw.arrival_date_time)?;
        let sections = raw
            .sections
            .into_iter()
            .map(|s| Self::convert_section(s, departure, arrival))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Journey {
            journey_type: raw.journey_type,
            duration_secs: raw.duration,
            departure,
            arrival,
            distances: raw.distances,
            sections,
            co2_emission: raw.co2_emission.and_then(|c| c.value),
        })
    }

    /// Waiting sections may omit their bounds; the journey's are used instead
    fn convert_section(
        raw: RawSection,
        journey_departure: NaiveDateTime,
        journey_arrival: NaiveDateTime,
    ) -> Result<Section, TransitError> {
        let departure = raw
            .departure_date_time
            .as_deref()
            .map_or(Ok(journey_departure), parse_instant)?;
        let arrival = raw
            .arrival_date_time
            .as_deref()
            .map_or(Ok(journey_arrival), parse_instant)?;

        Ok(Section {
            section_type: raw.section_type,
            mode: raw.mode,
            departure,
            arrival,
            duration_secs: raw.duration,
            from: raw.from.map(RawPlace::into_place),
            to: raw.to.map(RawPlace::into_place),
            geometry: raw
                .geojson
                .map(|g| {
                    g.coordinates
                        .into_iter()
                        .filter_map(|[lon, lat]| Coordinate::new(lon, lat).ok())
                        .collect()
                })
                .unwrap_or_default(),
            display: raw.display_informations.map(|d| DisplayInfo {
                commercial_mode: d.commercial_mode,
                physical_mode: d.physical_mode,
                code: d.code,
                network: d.network,
                direction: d.direction,
                label: d.label,
            }),
            co2_emission: raw.co2_emission.and_then(|c| c.value),
        })
    }
}

fn parse_instant(value: &str) -> Result<NaiveDateTime, TransitError> {
    parse_compact_local(value).map_err(|e| TransitError::ParseError(e.to_string()))
}

#[async_trait]
impl TransitClient for NavitiaTransitClient {
    #[instrument(skip(self, query), fields(from = %query.from, to = %query.to))]
    async fn search_journeys(&self, query: &JourneyQuery) -> Result<Vec<Journey>, TransitError> {
        let url = self.config.journeys_url();
        let params = self.query_params(query);

        debug!(?url, restricted = query.restrict_modes, "Searching journeys");

        let mut request = self.client.get(&url).query(&params);
        if let Some(key) = &self.config.api_key {
            request = request.header("apiKey", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransitError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                TransitError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TransitError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransitError::Unauthorized(format!("HTTP {status}")));
        }

        if status.is_server_error() {
            return Err(TransitError::ServiceUnavailable(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransitError::ParseError(e.to_string()))?;

        // Navitia answers "no solution" with a 404 carrying an error body
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(TransitError::RequestFailed(format!("HTTP {status}")));
        }

        let journeys = Self::parse_journeys_response(&body).map_err(|e| {
            if status == StatusCode::NOT_FOUND {
                TransitError::RequestFailed(format!("HTTP {status}"))
            } else {
                e
            }
        })?;

        if journeys.is_empty() {
            warn!("No journeys found");
        }

        debug!(count = journeys.len(), "Journeys found");
        Ok(journeys)
    }
}

// Raw Navitia response types

#[derive(Debug, Deserialize)]
struct RawJourneysResponse {
    #[serde(default)]
    journeys: Vec<RawJourney>,
    error: Option<RawError>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    id: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawJourney {
    #[serde(rename = "type")]
    journey_type: Option<String>,
    #[serde(default)]
    duration: u64,
    departure_date_time: String,
    arrival_date_time: String,
    #[serde(default)]
    distances: BTreeMap<String, f64>,
    #[serde(default)]
    sections: Vec<RawSection>,
    co2_emission: Option<RawEmission>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(rename = "type")]
    section_type: String,
    mode: Option<String>,
    #[serde(default)]
    duration: u64,
    departure_date_time: Option<String>,
    arrival_date_time: Option<String>,
    from: Option<RawPlace>,
    to: Option<RawPlace>,
    geojson: Option<RawGeoJson>,
    display_informations: Option<RawDisplayInformations>,
    co2_emission: Option<RawEmission>,
}

#[derive(Debug, Deserialize)]
struct RawEmission {
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawGeoJson {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct RawDisplayInformations {
    commercial_mode: Option<String>,
    physical_mode: Option<String>,
    code: Option<String>,
    network: Option<String>,
    direction: Option<String>,
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    stop_point: Option<RawEmbedded>,
    stop_area: Option<RawEmbedded>,
    address: Option<RawEmbedded>,
    poi: Option<RawEmbedded>,
}

impl RawPlace {
    fn into_place(self) -> Place {
        let coordinate = [self.stop_point, self.stop_area, self.address, self.poi]
            .into_iter()
            .flatten()
            .find_map(|e| e.coord)
            .and_then(|c| Coordinate::new(c.lon, c.lat).ok());

        Place {
            id: self.id,
            name: self.name,
            coordinate,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEmbedded {
    coord: Option<RawCoord>,
}

#[derive(Debug, Deserialize)]
struct RawCoord {
    #[serde(deserialize_with = "number_or_string")]
    lon: f64,
    #[serde(deserialize_with = "number_or_string")]
    lat: f64,
}

/// Navitia serializes coordinates as strings
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::DatetimeRepresents;

    const SAMPLE: &str = r#"{
        "journeys": [{
            "type": "best",
            "duration": 1860,
            "departure_date_time": "20251112T095500",
            "arrival_date_time": "20251112T102600",
            "distances": {"walking": 420, "bike": 0},
            "co2_emission": {"value": 52.1, "unit": "gEC"},
            "sections": [
                {
                    "type": "street_network",
                    "mode": "walking",
                    "duration": 300,
                    "departure_date_time": "20251112T095500",
                    "arrival_date_time": "20251112T100000",
                    "from": {"id": "2.3;48.8", "name": "Rue A", "address": {"coord": {"lon": "2.3", "lat": "48.8"}}},
                    "to": {"id": "stop_point:IDFM:1", "name": "Gare A", "stop_point": {"coord": {"lon": "2.32", "lat": "48.82"}}},
                    "geojson": {"type": "LineString", "coordinates": [[2.3, 48.8], [2.32, 48.82]]}
                },
                {"type": "waiting", "duration": 60},
                {
                    "type": "public_transport",
                    "duration": 1500,
                    "departure_date_time": "20251112T100100",
                    "arrival_date_time": "20251112T102600",
                    "from": {"id": "stop_point:IDFM:1", "name": "Gare A", "stop_point": {"coord": {"lon": 2.32, "lat": 48.82}}},
                    "to": {"id": "stop_point:IDFM:2", "name": "Gare B", "stop_point": {"coord": {"lon": "2.45", "lat": "48.9"}}},
                    "display_informations": {"commercial_mode": "RER", "physical_mode": "RER", "code": "B", "network": "RER", "direction": "Mitry"},
                    "co2_emission": {"value": 48.0}
                }
            ]
        }]
    }"#;

    fn instant(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 12)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_journeys_response() {
        let journeys = NavitiaTransitClient::parse_journeys_response(SAMPLE).unwrap();
        assert_eq!(journeys.len(), 1);

        let journey = &journeys[0];
        assert_eq!(journey.journey_type.as_deref(), Some("best"));
        assert_eq!(journey.duration_secs, 1860);
        assert_eq!(journey.departure, instant(9, 55));
        assert_eq!(journey.sections.len(), 3);
        assert!((journey.walking_distance() - 420.0).abs() < f64::EPSILON);
        assert_eq!(journey.co2_emission, Some(52.1));

        let walk = &journey.sections[0];
        assert_eq!(walk.mode.as_deref(), Some("walking"));
        assert_eq!(walk.geometry.len(), 2);
        let origin = walk.from.as_ref().unwrap();
        assert_eq!(origin.coordinate, Some(Coordinate::new_unchecked(2.3, 48.8)));

        let waiting = &journey.sections[1];
        assert_eq!(waiting.departure, instant(9, 55));
        assert!(waiting.from.is_none());

        let train = &journey.sections[2];
        assert!(train.is_public_transport());
        assert_eq!(train.display.as_ref().unwrap().code.as_deref(), Some("B"));
        assert_eq!(
            train.to.as_ref().unwrap().coordinate,
            Some(Coordinate::new_unchecked(2.45, 48.9))
        );
    }

    #[test]
    fn test_parse_no_solution_is_empty() {
        let body = r#"{"error": {"id": "no_solution", "message": "no solution found for this journey"}}"#;
        let journeys = NavitiaTransitClient::parse_journeys_response(body).unwrap();
        assert!(journeys.is_empty());
    }

    #[test]
    fn test_parse_other_error() {
        let body = r#"{"error": {"id": "unknown_object", "message": "Invalid id : foo"}}"#;
        let err = NavitiaTransitClient::parse_journeys_response(body).unwrap_err();
        assert!(matches!(err, TransitError::RequestFailed(m) if m.contains("Invalid id")));
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        let body = r#"{"journeys": [{"departure_date_time": "yesterday", "arrival_date_time": "20251112T102600"}]}"#;
        let err = NavitiaTransitClient::parse_journeys_response(body).unwrap_err();
        assert!(matches!(err, TransitError::ParseError(_)));
    }

    #[test]
    fn test_query_params_transit() {
        let client = NavitiaTransitClient::new(&TransitConfig::for_testing()).unwrap();
        let from = Coordinate::new_unchecked(2.35, 48.85);
        let to = Coordinate::new_unchecked(2.29, 48.89);
        let query = JourneyQuery::transit(from, to).at(instant(8, 30), DatetimeRepresents::Arrival);
        let params = client.query_params(&query);

        assert!(params.contains(&("from", "2.35;48.85".to_string())));
        assert!(params.contains(&("to", "2.29;48.89".to_string())));
        assert!(params.contains(&("datetime", "20251112T083000".to_string())));
        assert!(params.contains(&("datetime_represents", "arrival".to_string())));
        assert_eq!(params.iter().filter(|(k, _)| *k == "allowed_id[]").count(), 2);
    }

    #[test]
    fn test_query_params_walking() {
        let client = NavitiaTransitClient::new(&TransitConfig::for_testing()).unwrap();
        let from = Coordinate::new_unchecked(2.35, 48.85);
        let params = client.query_params(&JourneyQuery::walking(from, from));
        assert!(params.iter().all(|(k, _)| *k != "allowed_id[]"));
        assert!(params.iter().all(|(k, _)| *k != "datetime"));
    }

    fn journey(kind: &str, duration: u64) -> Journey {
        Journey {
            journey_type: Some(kind.to_string()),
            duration_secs: duration,
            departure: instant(10, 0),
            arrival: instant(10, 30),
            distances: BTreeMap::new(),
            sections: vec![],
            co2_emission: None,
        }
    }

    #[test]
    fn test_select_walking_single_answer() {
        let a = Coordinate::paris();
        let picked = select_walking_journey(vec![journey("best", 900)], &a, &a).unwrap();
        assert_eq!(picked.duration_secs, 900);
    }

    #[test]
    fn test_select_walking_first_walk_only() {
        let a = Coordinate::paris();
        let picked = select_walking_journey(
            vec![
                journey("best", 600),
                journey("non_pt_walk", 1200),
                journey("non_pt_walk", 1300),
            ],
            &a,
            &a,
        )
        .unwrap();
        assert_eq!(picked.duration_secs, 1200);
    }

    #[test]
    fn test_select_walking_none() {
        let a = Coordinate::paris();
        let err = select_walking_journey(
            vec![journey("best", 600), journey("fastest", 500)],
            &a,
            &a,
        )
        .unwrap_err();
        assert!(matches!(err, TransitError::NoRoutesFound { .. }));

        let err = select_walking_journey(vec![], &a, &a).unwrap_err();
        assert!(matches!(err, TransitError::NoRoutesFound { .. }));
    }
}
