// Single-run entry point: load configuration, run one watch pass, exit.
//
// Exits non-zero when the run aborts (configuration, browser launch, schema
// init or search-page discovery). Per-listing failures only show up in logs.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use listing_watch::WatchConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = WatchConfig::from_env().context("Failed to load configuration")?;
    info!("Watching {}", config.search_url());

    let summary = listing_watch::run_once(&config)
        .await
        .context("Watch run aborted")?;

    info!(
        "Run complete: {} discovered, {} notified",
        summary.discovered, summary.notified
    );
    Ok(())
}
