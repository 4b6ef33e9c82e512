//! Fleetwatch entry point.

use anyhow::{Context, Result};
use fleet_runtime::{FleetRuntime, RuntimeConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = RuntimeConfig::from_env().context("configuration error")?;

    let runtime = FleetRuntime::new(config);
    runtime.start().await?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("Received shutdown signal");

    runtime.shutdown().await;
    Ok(())
}
