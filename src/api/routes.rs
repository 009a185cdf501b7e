//! Route handlers.
//!
//! The weather handler is the whole request flow: validate the query,
//! resolve the API key, fetch the two upstream documents sequentially,
//! translate the upstream status, normalize, respond.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::normalize;
use crate::types::{ApiError, WeatherReport};
use crate::upstream::WeatherUpstream;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
///
/// The upstream is a trait object so tests can inject a mock; the API key
/// env var is resolved per request (a key added or removed at runtime takes
/// effect immediately).
pub struct ServiceState {
    pub upstream: Box<dyn WeatherUpstream>,
    pub api_key_env: String,
}

pub type AppState = Arc<ServiceState>;

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub city: String,
}

/// GET /api/weather?city={city}
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherReport>, ApiError> {
    let city = query.city.trim();
    if city.is_empty() {
        return Err(ApiError::MissingCity);
    }

    let api_key = std::env::var(&state.api_key_env).unwrap_or_default();
    if api_key.is_empty() {
        error!(env = %state.api_key_env, "API key is not configured");
        return Err(ApiError::MissingApiKey);
    }

    let current = state.upstream.fetch_current(city, &api_key).await?;
    let forecast = state.upstream.fetch_forecast(city, &api_key).await?;

    // Unknown city and similar upstream rejections arrive as a parsed
    // document with a non-success `cod`, not as a transport error.
    if !current.is_success() {
        let message = current
            .message
            .clone()
            .unwrap_or_else(|| "City not found".to_string());
        info!(city = %city, message = %message, "Upstream rejected city");
        return Err(ApiError::CityNotFound(message));
    }

    let report = normalize::normalize(&current, &forecast);

    info!(
        city = %report.city,
        country = %report.country,
        forecast_days = report.forecast.len(),
        "Weather request served"
    );

    Ok(Json(report))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}
