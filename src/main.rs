//! skycast — normalized weather over OpenWeatherMap.
//!
//! Entry point. Loads configuration, initialises structured logging, wires
//! the upstream client into the router, and serves until shutdown.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use skycast::api;
use skycast::api::routes::ServiceState;
use skycast::config::AppConfig;
use skycast::upstream::openweather::OpenWeatherClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        base_url = %cfg.upstream.base_url,
        timeout_secs = cfg.upstream.timeout_secs,
        forecast_entries = cfg.upstream.forecast_entries,
        "skycast starting up"
    );

    // The key itself is read per request; an empty env at startup is only
    // worth a warning.
    if std::env::var(&cfg.upstream.api_key_env).unwrap_or_default().is_empty() {
        warn!(env = %cfg.upstream.api_key_env, "API key env var is not set — requests will fail with 500");
    }

    let upstream = OpenWeatherClient::new(&cfg.upstream)?;
    let state = Arc::new(ServiceState {
        upstream: Box::new(upstream),
        api_key_env: cfg.upstream.api_key_env.clone(),
    });

    api::serve(state, &cfg.server.host, cfg.server.port).await
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("skycast=info"));

    let json_logging = std::env::var("SKYCAST_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
