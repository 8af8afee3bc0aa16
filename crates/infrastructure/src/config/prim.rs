//! PRIM marketplace configuration shared by the journey planner and the bike router

use std::fmt;

use integration_geovelo::GeoveloConfig;
use integration_transit::TransitConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Credentials and endpoints of the PRIM marketplace
#[derive(Clone, Serialize, Deserialize)]
pub struct PrimAppConfig {
    /// Marketplace base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `apiKey` header (sensitive)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Navitia coverage path for `/journeys`
    #[serde(default = "default_journeys_path")]
    pub journeys_path: String,

    /// Geovelo API path for `/computedroutes`
    #[serde(default = "default_geovelo_path")]
    pub geovelo_path: String,

    /// Request timeout in seconds, for both services
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Commercial modes allowed to carry bikes
    #[serde(default = "default_allowed_modes")]
    pub allowed_modes: Vec<String>,

    /// Bike type sent to the router
    #[serde(default = "default_bike_type")]
    pub bike_type: String,
}

impl fmt::Debug for PrimAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimAppConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("journeys_path", &self.journeys_path)
            .field("geovelo_path", &self.geovelo_path)
            .field("timeout_secs", &self.timeout_secs)
            .field("allowed_modes", &self.allowed_modes)
            .field("bike_type", &self.bike_type)
            .finish()
    }
}

fn default_base_url() -> String {
    TransitConfig::default().base_url
}

fn default_journeys_path() -> String {
    TransitConfig::default().journeys_path
}

fn default_geovelo_path() -> String {
    GeoveloConfig::default().geovelo_path
}

const fn default_timeout_secs() -> u64 {
    15
}

fn default_allowed_modes() -> Vec<String> {
    TransitConfig::default().allowed_modes
}

fn default_bike_type() -> String {
    GeoveloConfig::default().bike_type
}

impl Default for PrimAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            journeys_path: default_journeys_path(),
            geovelo_path: default_geovelo_path(),
            timeout_secs: default_timeout_secs(),
            allowed_modes: default_allowed_modes(),
            bike_type: default_bike_type(),
        }
    }
}

impl PrimAppConfig {
    fn exposed_key(&self) -> Option<String> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().to_string())
            .filter(|k| !k.is_empty())
    }

    /// Journey planner client configuration
    #[must_use]
    pub fn to_transit_config(&self) -> TransitConfig {
        TransitConfig {
            base_url: self.base_url.clone(),
            journeys_path: self.journeys_path.clone(),
            api_key: self.exposed_key(),
            timeout_secs: self.timeout_secs,
            allowed_modes: self.allowed_modes.clone(),
        }
    }

    /// Bike router client configuration
    #[must_use]
    pub fn to_geovelo_config(&self) -> GeoveloConfig {
        GeoveloConfig {
            base_url: self.base_url.clone(),
            geovelo_path: self.geovelo_path.clone(),
            api_key: self.exposed_key(),
            timeout_secs: self.timeout_secs,
            bike_type: self.bike_type.clone(),
        }
    }

    /// Validate both derived client configurations
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.to_transit_config()
            .validate()
            .map_err(|e| format!("prim: {e}"))?;
        self.to_geovelo_config()
            .validate()
            .map_err(|e| format!("prim: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> PrimAppConfig {
        PrimAppConfig {
            api_key: Some(SecretString::from(key.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_follow_clients() {
        let config = PrimAppConfig::default();
        assert_eq!(config.base_url, TransitConfig::default().base_url);
        assert_eq!(config.allowed_modes.len(), 2);
        assert_eq!(config.bike_type, "TRADITIONAL");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_key_is_propagated() {
        let config = with_key("s3cret");
        assert_eq!(config.to_transit_config().api_key.as_deref(), Some("s3cret"));
        assert_eq!(config.to_geovelo_config().api_key.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_empty_key_is_dropped() {
        let config = with_key("");
        assert!(config.to_transit_config().api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", with_key("s3cret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_key_not_serialized() {
        let json = serde_json::to_string(&with_key("s3cret")).unwrap();
        assert!(!json.contains("s3cret"));
    }

    #[test]
    fn test_shared_timeout() {
        let config = PrimAppConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
