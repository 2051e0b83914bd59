//! GSR Ingest - Main Entry Point

use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    init_logging(&settings.logging)?;

    info!("=== GSR Ingest v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Storage backend: {:?}, table: {}",
        settings.storage.backend, settings.storage.table
    );

    run_server(settings).await?;

    Ok(())
}
