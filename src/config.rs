//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` when present and falls back to defaults otherwise;
//! the service is env-driven and only the API key is a hard requirement.
//! Secrets are referenced by env-var NAME in the config and resolved at
//! request time via `std::env::var`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    /// OpenWeatherMap REST base URL. Overridable for tests.
    pub base_url: String,
    /// Per-call timeout for upstream requests, in seconds.
    pub timeout_secs: u64,
    /// Number of 3-hour steps to request; 40 covers five days.
    pub forecast_entries: u32,
    /// Name of the env var holding the OpenWeatherMap API key.
    pub api_key_env: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            timeout_secs: 8,
            forecast_entries: 40,
            api_key_env: "OPENWEATHER_API_KEY".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.upstream.timeout_secs, 8);
        assert_eq!(cfg.upstream.forecast_entries, 40);
        assert_eq!(cfg.upstream.api_key_env, "OPENWEATHER_API_KEY");
        assert!(cfg.upstream.base_url.contains("openweathermap.org"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.upstream.forecast_entries, 40);
    }

    #[test]
    fn test_full_toml_overrides() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [upstream]
            base_url = "http://localhost:9999/data/2.5"
            timeout_secs = 2
            forecast_entries = 8
            api_key_env = "TEST_KEY"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.upstream.base_url, "http://localhost:9999/data/2.5");
        assert_eq!(cfg.upstream.timeout_secs, 2);
        assert_eq!(cfg.upstream.api_key_env, "TEST_KEY");
    }

    #[test]
    fn test_load_missing_file_is_defaults() {
        let cfg = AppConfig::load("definitely-not-a-config.toml").unwrap();
        assert_eq!(cfg.server.port, 8080);
    }
}
