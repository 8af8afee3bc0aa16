//! Open-Meteo weather integration
//!
//! Client for the Open-Meteo Weather API (<https://open-meteo.com>).
//! Fetches the hourly forecast series and picks the hour nearest to a
//! travel instant. No API key is required.

pub mod client;
mod models;

pub use client::{OpenMeteoClient, WeatherClient, WeatherConfig, WeatherError};
pub use models::{ForecastHour, HourlyForecast, condition_from_wmo_code};
