//! Sport Prognosis API
//!
//! Entry point. Loads configuration, initialises structured logging,
//! seeds the in-memory store and serves the REST API until Ctrl+C.

use anyhow::Result;
use tracing::info;

use prognosis::{api, config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = config::AppConfig::default_path();
    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    let state = api::state_from_config(&cfg);
    info!(
        config = %config_path,
        predictions = state.store.len().await,
        sports = state.stats.sports_stats.len(),
        default_limit = cfg.api.default_limit,
        "Prognosis API starting up"
    );

    api::serve(state, &cfg).await
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("prognosis=info,tower_http=info"));

    let json_logging = std::env::var("PROGNOSIS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
