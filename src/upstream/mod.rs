//! Upstream weather provider access.
//!
//! Defines the `WeatherUpstream` trait — the seam the route handler and
//! tests depend on — and the OpenWeatherMap implementation. The trait is a
//! test seam, not a provider registry: only OpenWeatherMap ships.

pub mod openweather;

use async_trait::async_trait;

use crate::types::ApiError;
use openweather::{CurrentResponse, ForecastResponse};

/// Read access to the upstream weather provider.
///
/// Both calls carry the caller's API key; the implementation owns the
/// transport, the timeout, and the mapping of transport failures onto
/// `ApiError::UpstreamTimeout` / `ApiError::UpstreamUnreachable`.
#[async_trait]
pub trait WeatherUpstream: Send + Sync {
    /// Fetch current conditions for a city.
    async fn fetch_current(&self, city: &str, api_key: &str)
        -> Result<CurrentResponse, ApiError>;

    /// Fetch the 3-hour-step forecast covering five days.
    async fn fetch_forecast(&self, city: &str, api_key: &str)
        -> Result<ForecastResponse, ApiError>;
}
