//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the task conversion REST API on its own.
//!
//! ## Intended use
//! Useful during development when only the REST server (with OpenAPI/Swagger UI) is needed. The
//! workspace's main `crm-run` binary serves the same router.

use api_rest::AppState;
use crm_core::constants::{DIRECTORY_FILE_ENV, REST_ADDR_ENV};
use crm_core::CoreConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the CRM REST API server
///
/// # Environment Variables
/// - `CRM_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CRM_DIRECTORY_FILE`: Display-name directory YAML (optional)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the directory file cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var(DIRECTORY_FILE_ENV).ok(),
        std::env::var(REST_ADDR_ENV).ok(),
    )?;
    let state = AppState::from_config(&cfg)?;

    api_rest::serve(cfg.rest_addr(), state).await
}
