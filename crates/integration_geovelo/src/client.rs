//! HTTP client for the Geovelo `computedroutes` endpoint

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use domain::Coordinate;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::GeoveloConfig;
use crate::error::GeoveloError;
use crate::models::{ComputedRoute, RouteSectionData, RouteWaypoint};

/// Fixed query flags: geometry only, every variant, ids instead of objects
const ROUTE_FLAGS: [(&str, &str); 8] = [
    ("instructions", "false"),
    ("elevations", "false"),
    ("geometry", "true"),
    ("single_result", "false"),
    ("bike_stations", "true"),
    ("objects_as_ids", "true"),
    ("merge_instructions", "false"),
    ("show_pushing_bike_instructions", "false"),
];

/// Trait for bike routing clients
#[async_trait]
pub trait GeoveloClient: Send + Sync {
    /// Compute every route variant between two points for a cyclist profile
    async fn compute_routes(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        profile: &str,
    ) -> Result<Vec<ComputedRoute>, GeoveloError>;
}

/// Geovelo client over HTTP
#[derive(Debug)]
pub struct HttpGeoveloClient {
    client: Client,
    config: GeoveloConfig,
}

impl HttpGeoveloClient {
    /// Create a new Geovelo client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GeoveloConfig) -> Result<Self, GeoveloError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("CycloFlow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeoveloError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn request_body<'a>(&'a self, from: &Coordinate, to: &Coordinate, profile: &'a str) -> RawRequest<'a> {
        RawRequest {
            waypoints: [RawPoint::from(from), RawPoint::from(to)],
            bike_details: RawBikeDetails {
                profile,
                bike_type: &self.config.bike_type,
            },
        }
    }

    fn parse_routes_response(body: &str) -> Result<Vec<ComputedRoute>, GeoveloError> {
        let raw: Vec<RawRoute> =
            serde_json::from_str(body).map_err(|e| GeoveloError::ParseError(e.to_string()))?;
        Ok(raw.into_iter().map(Self::convert_route).collect())
    }

    fn convert_route(raw: RawRoute) -> ComputedRoute {
        ComputedRoute {
            id: raw.id.map(|id| match id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            title: raw.title,
            duration_secs: raw.duration.map_or(0, seconds),
            distances: raw
                .distances
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v)))
                .collect(),
            sections: raw
                .sections
                .into_iter()
                .map(|s| RouteSectionData {
                    geometry: s.geometry,
                    details: s.details,
                })
                .collect(),
            waypoints: raw
                .waypoints
                .into_iter()
                .map(|w| RouteWaypoint {
                    longitude: w.longitude,
                    latitude: w.latitude,
                    title: w.title,
                })
                .collect(),
            estimated_departure: raw
                .estimated_datetime_of_departure
                .as_deref()
                .and_then(parse_timestamp),
            estimated_arrival: raw
                .estimated_datetime_of_arrival
                .as_deref()
                .and_then(parse_timestamp),
            details: raw.details,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seconds(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Some(ts),
        Err(e) => {
            debug!(%value, error = %e, "Ignoring unparseable route timestamp");
            None
        },
    }
}

#[async_trait]
impl GeoveloClient for HttpGeoveloClient {
    #[instrument(skip(self), fields(from = %from, to = %to))]
    async fn compute_routes(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        profile: &str,
    ) -> Result<Vec<ComputedRoute>, GeoveloError> {
        let url = self.config.computed_routes_url();
        let body = self.request_body(from, to, profile);

        debug!(?url, "Computing bike routes");

        let mut request = self.client.post(&url).query(&ROUTE_FLAGS).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.header("apiKey", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GeoveloError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                GeoveloError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeoveloError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GeoveloError::Unauthorized(format!("HTTP {status}")));
        }
        if status.is_server_error() {
            return Err(GeoveloError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(GeoveloError::RequestFailed(format!("HTTP {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| GeoveloError::ParseError(e.to_string()))?;

        let routes = Self::parse_routes_response(&text)?;
        if routes.is_empty() {
            warn!("Bike router returned no route");
        }

        debug!(count = routes.len(), "Bike routes computed");
        Ok(routes)
    }
}

// Wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest<'a> {
    waypoints: [RawPoint; 2],
    bike_details: RawBikeDetails<'a>,
}

#[derive(Debug, Serialize)]
struct RawPoint {
    latitude: f64,
    longitude: f64,
}

impl From<&Coordinate> for RawPoint {
    fn from(c: &Coordinate) -> Self {
        Self {
            latitude: c.latitude(),
            longitude: c.longitude(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawBikeDetails<'a> {
    profile: &'a str,
    bike_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoute {
    id: Option<serde_json::Value>,
    title: Option<String>,
    duration: Option<f64>,
    #[serde(default)]
    distances: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    sections: Vec<RawRouteSection>,
    #[serde(default)]
    waypoints: Vec<RawWaypoint>,
    estimated_datetime_of_departure: Option<String>,
    estimated_datetime_of_arrival: Option<String>,
    details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawRouteSection {
    geometry: Option<String>,
    details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawWaypoint {
    latitude: f64,
    longitude: f64,
    title: Option<String>,
}
