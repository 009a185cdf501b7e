//! skycast — a single-endpoint weather API.
//!
//! Accepts a city name, fetches current conditions and the 5-day/3-hour
//! forecast from OpenWeatherMap, and returns a compact normalized payload
//! for frontend consumption.

pub mod api;
pub mod config;
pub mod normalize;
pub mod types;
pub mod upstream;
