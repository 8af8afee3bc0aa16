//! Journey planner configuration

use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration for the Navitia journey planner
#[derive(Clone, Serialize, Deserialize)]
pub struct TransitConfig {
    /// Base URL of the PRIM marketplace
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the Navitia coverage under `base_url`
    #[serde(default = "default_journeys_path")]
    pub journeys_path: String,

    /// Value of the `apiKey` header
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Commercial modes a bike-carrying journey may use
    #[serde(default = "default_allowed_modes")]
    pub allowed_modes: Vec<String>,
}

impl fmt::Debug for TransitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitConfig")
            .field("base_url", &self.base_url)
            .field("journeys_path", &self.journeys_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("allowed_modes", &self.allowed_modes)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://prim.iledefrance-mobilites.fr/marketplace".to_string()
}

fn default_journeys_path() -> String {
    "v2/navitia".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_allowed_modes() -> Vec<String> {
    vec![
        "commercial_mode:LocalTrain".to_string(),
        "commercial_mode:RapidTransit".to_string(),
    ]
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            journeys_path: default_journeys_path(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            allowed_modes: default_allowed_modes(),
        }
    }
}

impl TransitConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Full URL of the journeys endpoint
    #[must_use]
    pub fn journeys_url(&self) -> String {
        format!(
            "{}/{}/journeys",
            self.base_url.trim_end_matches('/'),
            self.journeys_path.trim_matches('/')
        )
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.allowed_modes.iter().any(|m| m.trim().is_empty()) {
            return Err("allowed_modes must not contain empty entries".to_string());
        }

        Ok(())
    }
}
