use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fdq_core::ClientConfig;

/// Main entry point for the FDQ application
///
/// Resolves configuration from the environment, initialises tracing, and
/// launches the single-screen terminal client. Queries are answered by the
/// in-process simulator by default, or by a remote HTTP backend when
/// configured.
///
/// # Environment Variables
/// - `FDQ_BACKEND`: backend mode, "local" or "remote" (default: "local")
/// - `FDQ_API_URL`: remote backend base URL (default: "http://localhost:8000")
/// - `RUST_LOG`: tracing filter; logs go to stderr and are silent unless set
///
/// # Returns
/// * `Ok(())` - If the screen runs and exits cleanly
/// * `Err(anyhow::Error)` - If configuration or terminal setup fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env_values(
        std::env::var("FDQ_BACKEND").ok(),
        std::env::var("FDQ_API_URL").ok(),
    )?;

    tracing::info!(mode = %config.mode(), api_url = config.api_base_url(), "++ Starting FDQ");

    fdq_tui::run(config).await
}
