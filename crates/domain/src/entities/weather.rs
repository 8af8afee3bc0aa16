//! Weather snapshot attached to an itinerary

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    ClearSky,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    LightRain,
    ModerateRain,
    HeavyRain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Get a human-readable description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ClearSky => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Foggy",
            Self::Drizzle => "Light drizzle",
            Self::LightRain => "Light rain",
            Self::ModerateRain => "Moderate rain",
            Self::HeavyRain => "Heavy rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether riding is likely to be wet
    #[must_use]
    pub const fn is_wet(&self) -> bool {
        matches!(
            self,
            Self::Drizzle
                | Self::LightRain
                | Self::ModerateRain
                | Self::HeavyRain
                | Self::Snow
                | Self::Thunderstorm
        )
    }
}

/// Whether the snapshot holds measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherStatus {
    Available,
    Unavailable,
}

/// Forecast for the hour closest to the travel instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Local forecast hour, or the requested instant for a fallback
    pub at: NaiveDateTime,
    pub status: WeatherStatus,
    pub condition: Option<WeatherCondition>,
    /// Celsius
    pub temperature: Option<f64>,
    /// Celsius
    pub apparent_temperature: Option<f64>,
    /// Percent
    pub precipitation_probability: Option<u8>,
    /// Millimetres
    pub precipitation: Option<f64>,
    /// km/h
    pub wind_speed: Option<f64>,
    /// km/h
    pub wind_gusts: Option<f64>,
}

impl WeatherSnapshot {
    /// Snapshot reported when the provider cannot be reached
    #[must_use]
    pub const fn fallback(at: NaiveDateTime) -> Self {
        Self {
            at,
            status: WeatherStatus::Unavailable,
            condition: None,
            temperature: None,
            apparent_temperature: None,
            precipitation_probability: None,
            precipitation: None,
            wind_speed: None,
            wind_gusts: None,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == WeatherStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn fallback_is_unavailable_and_empty() {
        let at = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let snapshot = WeatherSnapshot::fallback(at);
        assert!(!snapshot.is_available());
        assert!(snapshot.temperature.is_none());
        assert_eq!(snapshot.at, at);
    }

    #[test]
    fn wet_conditions() {
        assert!(WeatherCondition::Drizzle.is_wet());
        assert!(!WeatherCondition::Overcast.is_wet());
    }

    #[test]
    fn condition_serializes_snake_case() {
        let json = serde_json::to_string(&WeatherCondition::PartlyCloudy).unwrap();
        assert_eq!(json, "\"partly_cloudy\"");
    }
}
