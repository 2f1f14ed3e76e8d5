use api_rest::AppState;
use crm_core::constants::{DIRECTORY_FILE_ENV, REST_ADDR_ENV};
use crm_core::CoreConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the CRM task service
///
/// Loads `.env`, resolves configuration once, loads the display-name directory and serves the
/// REST API (with Swagger UI at `/swagger-ui`).
///
/// # Environment Variables
/// - `CRM_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CRM_DIRECTORY_FILE`: Display-name directory YAML; names are left unset when absent
/// - `RUST_LOG`: Additional tracing filter directives
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, directory loading or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crm_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("crm_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var(DIRECTORY_FILE_ENV).ok(),
        std::env::var(REST_ADDR_ENV).ok(),
    )?;

    tracing::info!("++ Starting CRM REST on {}", cfg.rest_addr());

    let state = AppState::from_config(&cfg)?;
    api_rest::serve(cfg.rest_addr(), state).await
}
