//! Dashcam Server: account, token, video upload and share link backend.
//!
//! Main entry point that loads configuration, initialises logging and
//! starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use dashcam_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let config_path =
        std::env::var("DASHCAM_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    let config = match AppConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(
        config = %config_path,
        "Starting dashcam v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = dashcam_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
