//! Geovelo client configuration

use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration for the Geovelo bike router
#[derive(Clone, Serialize, Deserialize)]
pub struct GeoveloConfig {
    /// Base URL of the PRIM marketplace
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the Geovelo API under `base_url`
    #[serde(default = "default_geovelo_path")]
    pub geovelo_path: String,

    /// Value of the `apiKey` header
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bike type sent with every request
    #[serde(default = "default_bike_type")]
    pub bike_type: String,
}

impl fmt::Debug for GeoveloConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoveloConfig")
            .field("base_url", &self.base_url)
            .field("geovelo_path", &self.geovelo_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("bike_type", &self.bike_type)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://prim.iledefrance-mobilites.fr/marketplace".to_string()
}

fn default_geovelo_path() -> String {
    "geovelo/api/v5".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

fn default_bike_type() -> String {
    "TRADITIONAL".to_string()
}

impl Default for GeoveloConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            geovelo_path: default_geovelo_path(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            bike_type: default_bike_type(),
        }
    }
}

impl GeoveloConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Full URL of the route computation endpoint
    #[must_use]
    pub fn computed_routes_url(&self) -> String {
        let path = self.geovelo_path.trim_matches('/');
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            format!("{base}/computedroutes")
        } else {
            format!("{base}/{path}/computedroutes")
        }
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
        if self.bike_type.trim().is_empty() {
            return Err("bike_type must not be empty".to_string());
        }
        Ok(())
    }
}
