//! GeoJSON loader for the regional bike-parking open dataset
//!
//! The export is a `FeatureCollection` of Point features whose properties
//! follow the dataset's French column names (`osm_id`, `nom`, `capacite`,
//! `acces`, `type`, `surveille`, `couvert`, `payant`, `nom_com`,
//! `insee_com`). Every named filter view is materialised once at load time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use domain::{AccessClass, Coordinate, ParkingFacility, ParkingFilter, ShelterClass};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Where the dataset lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingConfig {
    /// Path of the GeoJSON export
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/parking_velo.geojson")
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
        }
    }
}

/// Errors raised while loading the dataset
#[derive(Debug, Error)]
pub enum ParkingDatasetError {
    /// The file could not be read
    #[error("Cannot read parking dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not a GeoJSON feature collection
    #[error("Invalid parking dataset: {0}")]
    Parse(String),

    /// Every feature was rejected, usually a dataset in a projected frame
    #[error("No usable parking feature among {features}; expected WGS84 lon/lat points")]
    NoUsableFeature { features: usize },
}

/// Facilities grouped by named filter
#[derive(Debug, Clone, Default)]
pub struct ParkingDataset {
    views: HashMap<ParkingFilter, Arc<[ParkingFacility]>>,
    total: usize,
}

impl ParkingDataset {
    /// Build every filter view from a facility list, keeping dataset order
    #[must_use]
    pub fn from_facilities(facilities: Vec<ParkingFacility>) -> Self {
        let views = ParkingFilter::ALL
            .iter()
            .map(|filter| {
                let view: Arc<[ParkingFacility]> = facilities
                    .iter()
                    .filter(|f| filter.matches(f))
                    .cloned()
                    .collect();
                (*filter, view)
            })
            .collect();

        Self {
            views,
            total: facilities.len(),
        }
    }

    /// Read and parse a GeoJSON export
    #[instrument]
    pub async fn load(path: &Path) -> Result<Self, ParkingDatasetError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ParkingDatasetError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let dataset = Self::from_geojson_str(&text)?;
        info!(
            facilities = dataset.total,
            default_view = dataset.view(ParkingFilter::Default).len(),
            "Parking dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse a GeoJSON `FeatureCollection`
    ///
    /// Features without a usable WGS84 Point geometry are skipped. A
    /// collection where every feature is skipped is an error.
    pub fn from_geojson_str(text: &str) -> Result<Self, ParkingDatasetError> {
        let collection: RawFeatureCollection =
            serde_json::from_str(text).map_err(|e| ParkingDatasetError::Parse(e.to_string()))?;

        if collection.kind != "FeatureCollection" {
            return Err(ParkingDatasetError::Parse(format!(
                "expected a FeatureCollection, found {}",
                collection.kind
            )));
        }

        let mut skipped = 0usize;
        let facilities: Vec<ParkingFacility> = collection
            .features
            .into_iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                let facility = feature.into_facility(index);
                if facility.is_none() {
                    skipped += 1;
                }
                facility
            })
            .collect();

        if facilities.is_empty() && skipped > 0 {
            return Err(ParkingDatasetError::NoUsableFeature { features: skipped });
        }
        if skipped > 0 {
            warn!(skipped, "Skipped parking features without a valid point");
        }
        debug!(kept = facilities.len(), "Parking features parsed");

        Ok(Self::from_facilities(facilities))
    }

    /// Facilities matching `filter`, in dataset order
    #[must_use]
    pub fn view(&self, filter: ParkingFilter) -> &[ParkingFacility] {
        match self.views.get(&filter) {
            Some(view) => &view[..],
            None => &[],
        }
    }

    /// Number of facilities in the source, before filtering
    #[must_use]
    pub const fn len(&self) -> usize {
        self.total
    }

    /// Returns true if the source held no usable facility
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[derive(Debug, Deserialize)]
struct RawFeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    id: Option<Value>,
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Vec<f64>,
}

impl RawFeature {
    fn into_facility(self, index: usize) -> Option<ParkingFacility> {
        let geometry = self.geometry?;
        if geometry.kind != "Point" || geometry.coordinates.len() < 2 {
            return None;
        }
        let location = Coordinate::new(geometry.coordinates[0], geometry.coordinates[1]).ok()?;

        let props = &self.properties;
        let id = text(props, "osm_id")
            .or_else(|| self.id.as_ref().and_then(value_text))
            .unwrap_or_else(|| format!("feature-{index}"));

        let access = match text(props, "acces").as_deref().map(str::to_lowercase).as_deref() {
            Some("privee" | "privée") => AccessClass::Private,
            Some("clientele" | "clientèle") => AccessClass::Clientele,
            _ => AccessClass::Unspecified,
        };
        let shelter = match text(props, "type").as_deref().map(str::to_lowercase).as_deref() {
            Some("abri") => ShelterClass::Shelter,
            Some("casier") => ShelterClass::Locker,
            _ => ShelterClass::Unspecified,
        };

        Some(ParkingFacility {
            id,
            name: text(props, "nom"),
            capacity: props.get("capacite").and_then(value_u32),
            location,
            access,
            shelter,
            supervised: flag(props, "surveille"),
            covered: flag(props, "couvert"),
            paying: flag(props, "payant"),
            commune: text(props, "nom_com"),
            insee: text(props, "insee_com"),
        })
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(props: &HashMap<String, Value>, key: &str) -> Option<String> {
    props.get(key).and_then(value_text)
}

fn value_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `OUI`/`NON` columns; booleans are accepted too
fn flag(props: &HashMap<String, Value>, key: &str) -> bool {
    match props.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_uppercase().as_str(), "OUI" | "YES" | "TRUE"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [2.35, 48.85]},
                "properties": {"osm_id": "node/1", "nom": "Abri Mairie", "capacite": 12, "acces": "privee", "type": "abri", "surveille": "NON", "couvert": "OUI", "payant": "NON", "nom_com": "Paris", "insee_com": "75056"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [2.36, 48.86]},
                "properties": {"osm_id": 2, "capacite": "8", "acces": "clientele", "type": "abri"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [2.37, 48.87]},
                "properties": {"osm_id": "node/3", "type": "casier", "surveille": "OUI"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [2.38, 48.88]},
                "properties": {"osm_id": "node/4", "type": "arceaux"}
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {"osm_id": "node/5", "type": "casier"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [400.0, 48.0]},
                "properties": {"osm_id": "node/6"}
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let dataset = ParkingDataset::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 4);

        let private = dataset.view(ParkingFilter::PrivateShelter);
        assert_eq!(private.len(), 1);
        let mairie = &private[0];
        assert_eq!(mairie.id, "node/1");
        assert_eq!(mairie.name.as_deref(), Some("Abri Mairie"));
        assert_eq!(mairie.capacity, Some(12));
        assert!(mairie.covered);
        assert!(!mairie.supervised);
        assert_eq!(mairie.insee.as_deref(), Some("75056"));

        let clientele = dataset.view(ParkingFilter::ClienteleShelter);
        assert_eq!(clientele.len(), 1);
        assert_eq!(clientele[0].id, "2");
        assert_eq!(clientele[0].capacity, Some(8));

        assert_eq!(dataset.view(ParkingFilter::Locker).len(), 1);
        assert_eq!(dataset.view(ParkingFilter::Supervised).len(), 1);
    }

    #[test]
    fn test_default_view_is_union_in_dataset_order() {
        let dataset = ParkingDataset::from_geojson_str(SAMPLE).unwrap();
        let ids: Vec<_> = dataset
            .view(ParkingFilter::Default)
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(ids, vec!["node/1", "2", "node/3"]);
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = ParkingDataset::from_geojson_str(r#"{"type": "Feature", "features": []}"#)
            .unwrap_err();
        assert!(matches!(err, ParkingDatasetError::Parse(_)));

        let err = ParkingDataset::from_geojson_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ParkingDatasetError::Parse(_)));
    }

    #[test]
    fn test_empty_collection() {
        let dataset =
            ParkingDataset::from_geojson_str(r#"{"type": "FeatureCollection", "features": []}"#)
                .unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.view(ParkingFilter::Default).is_empty());
    }

    #[test]
    fn test_projected_dataset_is_rejected() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [652469.0, 6862035.0]}, "properties": {"type": "casier"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [648237.0, 6863015.0]}, "properties": {"type": "abri"}}
        ]}"#;
        let err = ParkingDataset::from_geojson_str(text).unwrap_err();
        assert!(matches!(err, ParkingDatasetError::NoUsableFeature { features: 2 }));
    }

    #[test]
    fn test_feature_id_fallback() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "id": 77, "geometry": {"type": "Point", "coordinates": [2.0, 48.0]}, "properties": {"type": "casier"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [2.1, 48.1]}, "properties": {"type": "casier"}}
        ]}"#;
        let dataset = ParkingDataset::from_geojson_str(text).unwrap();
        let ids: Vec<_> = dataset
            .view(ParkingFilter::Locker)
            .iter()
            .map(|f| f.id.clone())
            .collect();
        assert_eq!(ids, vec!["77".to_string(), "feature-1".to_string()]);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = ParkingDataset::load(file.path()).await.unwrap();
        assert_eq!(dataset.len(), 4);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ParkingDataset::load(&dir.path().join("absent.geojson"))
            .await
            .unwrap_err();
        assert!(matches!(err, ParkingDatasetError::Io { .. }));
    }
}
