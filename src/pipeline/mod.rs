//! Run orchestration: discover → (seen? → visit → extract → filter → notify → commit)
//!
//! URLs are processed strictly one after another. For each URL the seen-store
//! write happens only after the notifier confirmed delivery, and before the
//! next URL is touched. That ordering is what keeps a listing from being
//! announced twice across runs.

pub mod outcome;

use std::time::Duration;

use tracing::{error, info, warn};

pub use outcome::{Outcome, RunState, RunSummary};

use crate::config::{ListingSelectors, WatchConfig};
use crate::discovery::{DiscoveryOptions, discover};
use crate::errors::{VisitError, WatchResult};
use crate::extractor::{self, Listing};
use crate::filter::{TermFilter, qualifies};
use crate::notifier::{MessageTransport, Notifier, RunHeader, format_listing};
use crate::render::{BrowserPage, BrowserSession, goto_with_timeout};
use crate::seen_store::SeenStore;

/// Everything the pipeline needs from configuration
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub search_url: String,
    pub discovery: DiscoveryOptions,
    pub navigation_timeout: Duration,
    pub item_settle_delay: Duration,
    pub selectors: ListingSelectors,
    pub filter: TermFilter,
    pub max_matches: usize,
    pub header: RunHeader,
}

impl PipelineOptions {
    pub fn from_config(config: &WatchConfig) -> WatchResult<Self> {
        Ok(Self {
            search_url: config.search_url().to_string(),
            discovery: DiscoveryOptions::from_config(config)?,
            navigation_timeout: config.navigation_timeout(),
            item_settle_delay: config.item_settle_delay(),
            selectors: config.selectors().clone(),
            filter: TermFilter::new(config.excluded_terms()),
            max_matches: config.max_matches(),
            header: RunHeader {
                warmup: config.warmup_message(),
                text: config.header_text().to_string(),
            },
        })
    }
}

/// One watch run over a browsing session, a seen store and a notifier
pub struct Pipeline<S, St, T> {
    options: PipelineOptions,
    session: S,
    store: St,
    notifier: Notifier<T>,
}

impl<S, St, T> Pipeline<S, St, T>
where
    S: BrowserSession,
    St: SeenStore,
    T: MessageTransport,
{
    pub fn new(options: PipelineOptions, session: S, store: St, notifier: Notifier<T>) -> Self {
        Self {
            options,
            session,
            store,
            notifier,
        }
    }

    #[must_use]
    pub fn store(&self) -> &St {
        &self.store
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier<T> {
        &self.notifier
    }

    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Execute the run.
    ///
    /// Schema initialization and discovery errors abort the run; every
    /// per-URL failure is logged and the loop moves on. The session is closed
    /// exactly once on every path.
    pub async fn run(&mut self) -> WatchResult<RunSummary> {
        let result = self.run_inner().await;

        if let Err(e) = self.session.close().await {
            warn!("Failed to close browser session: {:#}", e);
        }

        let summary = result?;
        info!("Final matches sent: {}", summary.notified);
        Ok(summary)
    }

    async fn run_inner(&self) -> WatchResult<RunSummary> {
        self.store.ensure_schema().await?;

        let urls = discover(
            &self.session,
            &self.options.search_url,
            &self.options.discovery,
        )
        .await?;

        let mut state = RunState::new(self.options.max_matches);

        for url in &urls {
            if state.quota_reached() {
                info!(
                    "Quota of {} matches reached, stopping",
                    self.options.max_matches
                );
                break;
            }

            let outcome = self.process_url(url, &mut state).await;
            state.record(url, outcome);

            if outcome == Outcome::NotifiedCommitted {
                info!(
                    outcome = outcome.tag(),
                    "Sent to Telegram ({}/{})", state.match_count, state.max_matches
                );
            }
        }

        Ok(state.into_summary(urls.len()))
    }

    async fn process_url(&self, url: &str, state: &mut RunState) -> Outcome {
        match self.store.has(url).await {
            Ok(true) => {
                info!(outcome = Outcome::SkippedSeen.tag(), "Already sent, skipping: {}", url);
                return Outcome::SkippedSeen;
            }
            Ok(false) => {}
            Err(e) => {
                let e = VisitError::from(e);
                warn!(outcome = Outcome::VisitFailed.tag(), "Failed on {}: {}", url, e);
                return Outcome::VisitFailed;
            }
        }

        let listing = match self.visit(url).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!(outcome = Outcome::VisitFailed.tag(), "Failed on {}: {}", url, e);
                return Outcome::VisitFailed;
            }
        };

        self.handle_listing(listing, state).await
    }

    /// Open an isolated page, load `url` and extract the listing.
    ///
    /// The page is closed before this returns, whatever the result.
    async fn visit(&self, url: &str) -> Result<Listing, VisitError> {
        let page = self
            .session
            .new_page()
            .await
            .map_err(|e| VisitError::Page(format!("{e:#}")))?;

        info!("Visiting {}", url);
        let result = self.visit_on_page(&page, url).await;

        if let Err(e) = page.close().await {
            warn!("Failed to close page for {}: {:#}", url, e);
        }

        result
    }

    async fn visit_on_page(&self, page: &S::Page, url: &str) -> Result<Listing, VisitError> {
        goto_with_timeout(page, url, self.options.navigation_timeout).await?;
        tokio::time::sleep(self.options.item_settle_delay).await;
        extractor::extract(
            page,
            url,
            &self.options.selectors,
            self.options.navigation_timeout,
        )
        .await
    }

    async fn handle_listing(&self, listing: Listing, state: &mut RunState) -> Outcome {
        let url = listing.url.clone();
        let missing = listing.missing_fields();

        let Some(complete) = listing.into_complete() else {
            info!(
                outcome = Outcome::SkippedIncomplete.tag(),
                "Missing {} on {}, skipping",
                missing.join(", "),
                url
            );
            return Outcome::SkippedIncomplete;
        };

        if !qualifies(&complete, &self.options.filter) {
            info!(
                outcome = Outcome::SkippedFiltered.tag(),
                "Excluded by title \"{}\": {}", complete.title, url
            );
            return Outcome::SkippedFiltered;
        }

        if !state.first_match_sent {
            self.notifier.send_header(&self.options.header).await;
            state.first_match_sent = true;
        }

        if let Err(e) = self.notifier.send(&format_listing(&complete)).await {
            warn!(
                outcome = Outcome::NotifiedFailedNotCommitted.tag(),
                "Failed to send message, NOT marking as seen: {} ({})", url, e
            );
            return Outcome::NotifiedFailedNotCommitted;
        }

        if let Err(e) = self.store.add(&url).await {
            error!(
                outcome = Outcome::NotifiedFailedNotCommitted.tag(),
                "Message sent but recording {} failed: {}", url, e
            );
            return Outcome::NotifiedFailedNotCommitted;
        }

        Outcome::NotifiedCommitted
    }
}
