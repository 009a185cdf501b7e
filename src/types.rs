//! Shared types: the normalized response schema and the request-level
//! error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Normalized response schema
// ---------------------------------------------------------------------------

/// The frontend-facing payload: current conditions plus up to five daily
/// forecast entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub now: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    /// °C, rounded to the nearest integer.
    pub temp: i64,
    pub feels_like: i64,
    pub desc: String,
    pub icon: String,
    /// Relative humidity, percent.
    pub humidity: i64,
    /// Wind speed in m/s, one decimal place.
    pub wind: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    /// Calendar date, "YYYY-MM-DD".
    pub date: String,
    pub min: i64,
    pub max: i64,
    pub desc: String,
    pub icon: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Everything that can terminate a weather request, mapped 1:1 onto an
/// HTTP status. All errors are terminal for the request — no retries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Missing required parameter: city")]
    MissingCity,

    #[error("Server configuration error: missing API key")]
    MissingApiKey,

    #[error("Upstream API timed out. Please try again.")]
    UpstreamTimeout,

    #[error("Failed to reach weather service.")]
    UpstreamUnreachable,

    #[error("OpenWeather error: {0}")]
    CityNotFound(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCity => StatusCode::BAD_REQUEST,
            ApiError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::UpstreamUnreachable => StatusCode::BAD_GATEWAY,
            ApiError::CityNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
