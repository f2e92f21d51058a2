//! Weather Forecast Web Client - Main Entry Point

use tracing::info;
use web::{init_logging, run_server, WebConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== Weather Forecast Web v{} ===", env!("CARGO_PKG_VERSION"));

    let config = WebConfig::load()?;
    run_server(config).await?;

    Ok(())
}
