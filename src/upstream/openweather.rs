//! OpenWeatherMap client.
//!
//! API docs: https://openweathermap.org/api
//! Base URL: `https://api.openweathermap.org/data/2.5`
//! Auth: API key via the `appid` query parameter.
//! Units: metric (°C, m/s).
//!
//! Error payloads (unknown city, bad key) come back with a non-2xx status
//! but still carry a JSON body with `cod` and `message`, so non-2xx is not
//! treated as a transport failure here — the body is parsed regardless and
//! the handler maps the `cod` field.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::WeatherUpstream;
use crate::config::UpstreamConfig;
use crate::types::ApiError;

// ---------------------------------------------------------------------------
// API response types (OpenWeatherMap JSON → Rust)
// ---------------------------------------------------------------------------

/// The `/weather` document. We only deserialize the fields we need, all
/// defaulted so that upstream error payloads still deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentResponse {
    /// Upstream status code: a number on success, a string on error payloads.
    #[serde(default)]
    pub cod: Value,
    /// Human-readable error message on failure payloads.
    #[serde(default)]
    pub message: Option<String>,
    /// Resolved city name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: Sys,
    #[serde(default)]
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub wind: Wind,
}

impl CurrentResponse {
    /// Whether the upstream reported success on this document.
    pub fn is_success(&self) -> bool {
        match &self.cod {
            Value::Number(n) => n.as_i64() == Some(200),
            Value::String(s) => s == "200",
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
}

/// The `/forecast` document: 3-hour readings, 40 of them for five days.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastEntry {
    /// Reading timestamp, "YYYY-MM-DD HH:MM:SS".
    #[serde(default)]
    pub dt_txt: String,
    #[serde(default)]
    pub main: RangeReadings,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeReadings {
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// OpenWeatherMap HTTP client.
pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    forecast_entries: u32,
}

impl OpenWeatherClient {
    pub fn new(cfg: &UpstreamConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .user_agent("skycast/0.1.0")
            .build()
            .context("Failed to build OpenWeather HTTP client")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            forecast_entries: cfg.forecast_entries,
        })
    }

    // -- Internal helpers ------------------------------------------------

    fn weather_url(&self, city: &str, api_key: &str) -> String {
        format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(city),
            api_key,
        )
    }

    fn forecast_url(&self, city: &str, api_key: &str) -> String {
        format!(
            "{}/forecast?q={}&appid={}&units=metric&cnt={}",
            self.base_url,
            urlencoding::encode(city),
            api_key,
            self.forecast_entries,
        )
    }

    /// Issue a GET and parse the JSON body whatever the status code.
    /// The URL carries the API key, so only the endpoint is logged.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: String,
    ) -> Result<T, ApiError> {
        debug!(endpoint, "Fetching from OpenWeather");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| classify(endpoint, e))?;

        resp.json::<T>().await.map_err(|e| classify(endpoint, e))
    }
}

/// Map a transport failure onto the request error taxonomy.
fn classify(endpoint: &str, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        warn!(endpoint, error = %err, "OpenWeather request timed out");
        ApiError::UpstreamTimeout
    } else {
        warn!(endpoint, error = %err, "OpenWeather request failed");
        ApiError::UpstreamUnreachable
    }
}

#[async_trait]
impl WeatherUpstream for OpenWeatherClient {
    async fn fetch_current(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<CurrentResponse, ApiError> {
        let url = self.weather_url(city, api_key);
        self.get_json("weather", url).await
    }

    async fn fetch_forecast(
        &self,
        city: &str,
        api_key: &str,
    ) -> Result<ForecastResponse, ApiError> {
        let url = self.forecast_url(city, api_key);
        self.get_json("forecast", url).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client() -> OpenWeatherClient {
        OpenWeatherClient::new(&UpstreamConfig::default()).unwrap()
    }

    // -- URL building --

    #[test]
    fn test_weather_url() {
        let url = test_client().weather_url("Kyiv", "k123");
        assert_eq!(
            url,
            "https://api.openweathermap.org/data/2.5/weather?q=Kyiv&appid=k123&units=metric"
        );
    }

    #[test]
    fn test_forecast_url_has_cnt() {
        let url = test_client().forecast_url("Kyiv", "k123");
        assert!(url.contains("/forecast?"));
        assert!(url.contains("units=metric"));
        assert!(url.ends_with("&cnt=40"));
    }

    #[test]
    fn test_city_is_percent_encoded() {
        let url = test_client().weather_url("New York", "k");
        assert!(url.contains("q=New%20York"));
    }

    // -- Status field semantics --

    #[test]
    fn test_is_success_numeric() {
        let doc: CurrentResponse = serde_json::from_value(json!({"cod": 200})).unwrap();
        assert!(doc.is_success());
    }

    #[test]
    fn test_is_success_string() {
        let doc: CurrentResponse = serde_json::from_value(json!({"cod": "200"})).unwrap();
        assert!(doc.is_success());
    }

    #[test]
    fn test_not_found_cod_is_failure() {
        let doc: CurrentResponse =
            serde_json::from_value(json!({"cod": "404", "message": "city not found"})).unwrap();
        assert!(!doc.is_success());
        assert_eq!(doc.message.as_deref(), Some("city not found"));
    }

    #[test]
    fn test_missing_cod_is_failure() {
        let doc: CurrentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(!doc.is_success());
    }

    // -- Deserialization --

    #[test]
    fn test_current_document_deserializes() {
        let doc: CurrentResponse = serde_json::from_value(json!({
            "cod": 200,
            "name": "Kyiv",
            "sys": {"country": "UA", "sunrise": 1_700_000_000},
            "main": {"temp": 21.4, "feels_like": 20.6, "humidity": 64, "pressure": 1012},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "wind": {"speed": 3.14, "deg": 250}
        }))
        .unwrap();

        assert!(doc.is_success());
        assert_eq!(doc.name, "Kyiv");
        assert_eq!(doc.sys.country, "UA");
        assert!((doc.main.temp - 21.4).abs() < 1e-10);
        assert_eq!(doc.main.humidity, 64);
        assert_eq!(doc.weather[0].description, "light rain");
        assert!((doc.wind.speed - 3.14).abs() < 1e-10);
    }

    #[test]
    fn test_forecast_document_deserializes() {
        let doc: ForecastResponse = serde_json::from_value(json!({
            "cod": "200",
            "cnt": 1,
            "list": [{
                "dt": 1_772_000_000,
                "dt_txt": "2026-03-01 12:00:00",
                "main": {"temp": 18.0, "temp_min": 15.2, "temp_max": 19.8},
                "weather": [{"description": "scattered clouds", "icon": "03d"}]
            }]
        }))
        .unwrap();

        assert_eq!(doc.list.len(), 1);
        assert_eq!(doc.list[0].dt_txt, "2026-03-01 12:00:00");
        assert!((doc.list[0].main.temp_min - 15.2).abs() < 1e-10);
        assert!((doc.list[0].main.temp_max - 19.8).abs() < 1e-10);
    }

    #[test]
    fn test_forecast_missing_list_is_empty() {
        let doc: ForecastResponse = serde_json::from_value(json!({"cod": "200"})).unwrap();
        assert!(doc.list.is_empty());
    }
}
