//! # Graph Runtime
//!
//! Serves the recipe operation surface over stdin/stdout.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (stderr; stdout carries replies)
//! 2. Load configuration (`GE_CONFIG` file, then environment overrides)
//! 3. Build the engine container
//! 4. Serve JSON lines until EOF or Ctrl+C

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::{error, info};

use graph_runtime::{Driver, EngineContainer, RuntimeConfig};
use graph_telemetry::{init_tracing, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_tracing(&telemetry).context("failed to initialize logging")?;

    info!(
        service = %telemetry.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting graph runtime"
    );

    let config = RuntimeConfig::load().context("failed to load configuration")?;
    let container = EngineContainer::new(&config).context("failed to build engine")?;

    let driver = Driver::new(Arc::clone(&container.dispatcher));
    let summary = driver
        .run(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            shutdown_signal(),
        )
        .await
        .context("driver failed")?;

    let metrics = container.dispatcher.metrics();
    info!(
        lines_read = summary.lines_read,
        lines_written = summary.lines_written,
        received = metrics.received,
        completed = metrics.completed,
        denied = metrics.denied,
        failed = metrics.failed,
        events_dropped = container.bus.events_dropped(),
        "Graph runtime stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C; running until EOF");
        std::future::pending::<()>().await;
    }
}
