//! LearnPulse Serving - Main Entry Point

use api::{init_logging, run_server, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = ServerConfig::from_env()?;
    info!("=== LearnPulse Serving v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Starting risk and difficulty prediction service...");

    run_server(config).await
}
