pub mod browser_setup;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod extractor;
pub mod filter;
pub mod notifier;
pub mod pipeline;
pub mod render;
pub mod seen_store;
pub mod utils;

pub use browser_setup::{LaunchOptions, download_managed_browser, find_browser_executable, launch_browser};
pub use config::WatchConfig;
pub use discovery::{DiscoveryOptions, discover};
pub use errors::{NotifyError, StoreError, VisitError, WatchError, WatchResult};
pub use extractor::{CompleteListing, Listing};
pub use filter::{TermFilter, qualifies};
pub use notifier::{Delivery, MessageTransport, Notifier, RunHeader, TelegramTransport};
pub use pipeline::{Outcome, Pipeline, PipelineOptions, RunSummary};
pub use render::{BrowserPage, BrowserSession, ChromePage, ChromeSession};
pub use seen_store::{SeenStore, SqliteSeenStore};

/// Run one watch pass with the production collaborators
///
/// Opens the SQLite seen store, launches Chrome, and runs the pipeline. The
/// browser is closed before this returns.
pub async fn run_once(config: &WatchConfig) -> WatchResult<RunSummary> {
    let options = PipelineOptions::from_config(config)?;

    let store = SqliteSeenStore::open(config.database_path()).await?;
    let transport = TelegramTransport::from_config(config)
        .map_err(|e| WatchError::Config(e.to_string()))?;

    let session = ChromeSession::launch(&LaunchOptions::from_config(config)).await?;

    let mut pipeline = Pipeline::new(options, session, store, Notifier::new(transport));
    let result = pipeline.run().await;
    pipeline.store().close().await;
    result
}
