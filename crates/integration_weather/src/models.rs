//! Weather data models
//!
//! Typed hourly forecast plus the raw Open-Meteo response shapes.

use chrono::NaiveDateTime;
use domain::WeatherCondition;
use serde::{Deserialize, Serialize};

/// Map a WMO weather interpretation code to a condition
#[must_use]
pub const fn condition_from_wmo_code(code: u8) -> WeatherCondition {
    match code {
        0 => WeatherCondition::ClearSky,
        1 => WeatherCondition::MainlyClear,
        2 => WeatherCondition::PartlyCloudy,
        3 => WeatherCondition::Overcast,
        45 | 48 => WeatherCondition::Fog,
        51..=57 => WeatherCondition::Drizzle,
        61 | 80 => WeatherCondition::LightRain,
        63 | 66 | 81 => WeatherCondition::ModerateRain,
        65 | 67 | 82 => WeatherCondition::HeavyRain,
        71..=77 | 85 | 86 => WeatherCondition::Snow,
        95..=99 => WeatherCondition::Thunderstorm,
        _ => WeatherCondition::Unknown,
    }
}

/// One hour of forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastHour {
    /// Local wall-clock hour in the requested timezone
    pub time: NaiveDateTime,
    /// Celsius
    pub temperature: Option<f64>,
    /// Celsius
    pub apparent_temperature: Option<f64>,
    /// Percent
    pub precipitation_probability: Option<u8>,
    /// Millimetres
    pub precipitation: Option<f64>,
    pub weather_code: Option<u8>,
    /// km/h
    pub wind_speed: Option<f64>,
    /// km/h
    pub wind_gusts: Option<f64>,
}

impl ForecastHour {
    /// Condition derived from the WMO code
    #[must_use]
    pub fn condition(&self) -> Option<WeatherCondition> {
        self.weather_code.map(condition_from_wmo_code)
    }
}

/// Hourly forecast series for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub hours: Vec<ForecastHour>,
}

impl HourlyForecast {
    /// Hour closest to `instant`; earlier hour wins a tie
    #[must_use]
    pub fn nearest(&self, instant: NaiveDateTime) -> Option<&ForecastHour> {
        self.hours
            .iter()
            .min_by_key(|h| (h.time - instant).num_seconds().unsigned_abs())
    }
}

/// Raw hourly block; every array is indexed like `time`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HourlyData {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<u8>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<u8>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_gusts_10m: Vec<Option<f64>>,
}

/// Raw Open-Meteo response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: String,
    pub hourly: Option<HourlyData>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hour(h: u32) -> ForecastHour {
        ForecastHour {
            time: NaiveDate::from_ymd_opt(2025, 6, 2)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            temperature: Some(20.0),
            apparent_temperature: None,
            precipitation_probability: None,
            precipitation: None,
            weather_code: Some(61),
            wind_speed: None,
            wind_gusts: None,
        }
    }

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(condition_from_wmo_code(0), WeatherCondition::ClearSky);
        assert_eq!(condition_from_wmo_code(1), WeatherCondition::MainlyClear);
        assert_eq!(condition_from_wmo_code(2), WeatherCondition::PartlyCloudy);
        assert_eq!(condition_from_wmo_code(3), WeatherCondition::Overcast);
    }

    #[test]
    fn test_wmo_code_precipitation() {
        assert_eq!(condition_from_wmo_code(45), WeatherCondition::Fog);
        assert_eq!(condition_from_wmo_code(53), WeatherCondition::Drizzle);
        assert_eq!(condition_from_wmo_code(61), WeatherCondition::LightRain);
        assert_eq!(condition_from_wmo_code(81), WeatherCondition::ModerateRain);
        assert_eq!(condition_from_wmo_code(65), WeatherCondition::HeavyRain);
        assert_eq!(condition_from_wmo_code(75), WeatherCondition::Snow);
        assert_eq!(condition_from_wmo_code(86), WeatherCondition::Snow);
        assert_eq!(condition_from_wmo_code(96), WeatherCondition::Thunderstorm);
    }

    #[test]
    fn test_wmo_code_unknown() {
        assert_eq!(condition_from_wmo_code(4), WeatherCondition::Unknown);
        assert_eq!(condition_from_wmo_code(255), WeatherCondition::Unknown);
    }

    #[test]
    fn test_nearest_hour() {
        let forecast = HourlyForecast {
            latitude: 48.85,
            longitude: 2.35,
            timezone: "Europe/Paris".to_string(),
            hours: vec![hour(7), hour(8), hour(9)],
        };
        let at = |h, m| {
            NaiveDate::from_ymd_opt(2025, 6, 2)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap()
        };
        assert_eq!(forecast.nearest(at(8, 20)).unwrap().time, hour(8).time);
        assert_eq!(forecast.nearest(at(8, 40)).unwrap().time, hour(9).time);
        assert_eq!(forecast.nearest(at(8, 30)).unwrap().time, hour(8).time);
        assert_eq!(forecast.nearest(at(23, 0)).unwrap().time, hour(9).time);
        assert_eq!(hour(7).condition(), Some(WeatherCondition::LightRain));
    }

    #[test]
    fn test_nearest_empty() {
        let forecast = HourlyForecast {
            latitude: 0.0,
            longitude: 0.0,
            timezone: String::new(),
            hours: vec![],
        };
        assert!(forecast.nearest(hour(1).time).is_none());
    }
}
