//! Search-page discovery
//!
//! Drives the search results through incremental loading until the page
//! height stops growing (or the scroll cap is hit), then harvests listing
//! anchors once in DOM order.

use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::WatchConfig;
use crate::errors::{WatchError, WatchResult};
use crate::render::{BrowserPage, BrowserSession, goto_with_timeout, js_scripts, with_page_timeout};
use crate::utils::{dedup_preserving_order, resolve_listing_href};

/// Bounds and selectors for one discovery pass
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub max_scrolls: usize,
    pub settle_delay: Duration,
    pub navigation_timeout: Duration,
    pub anchor_selector: String,
    pub origin: Url,
}

impl DiscoveryOptions {
    pub fn from_config(config: &WatchConfig) -> WatchResult<Self> {
        let origin = Url::parse(config.origin())
            .map_err(|e| WatchError::Config(format!("invalid origin {}: {e}", config.origin())))?;

        Ok(Self {
            max_scrolls: config.max_scrolls(),
            settle_delay: config.search_settle_delay(),
            navigation_timeout: config.navigation_timeout(),
            anchor_selector: config.selectors().anchor.clone(),
            origin,
        })
    }
}

/// How the scroll loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStop {
    /// Height did not change between two consecutive measurements
    Converged { scrolls: usize },
    /// `max_scrolls` iterations ran without convergence
    Capped { scrolls: usize },
    /// A scroll or measurement failed; harvesting proceeds with what loaded
    Interrupted { scrolls: usize },
}

/// Open a page, load the search results and return candidate listing URLs.
///
/// The discovery page is closed on every path. Navigation and harvest
/// failures are fatal for the run.
pub async fn discover<S>(
    session: &S,
    search_url: &str,
    options: &DiscoveryOptions,
) -> WatchResult<Vec<String>>
where
    S: BrowserSession + ?Sized,
{
    let fatal = |message: String| WatchError::Discovery {
        url: search_url.to_string(),
        message,
    };

    let page = session
        .new_page()
        .await
        .map_err(|e| fatal(format!("failed to open page: {e:#}")))?;

    let result = discover_on_page(&page, search_url, options).await;

    if let Err(e) = page.close().await {
        warn!("Failed to close discovery page: {:#}", e);
    }

    result
}

async fn discover_on_page<P>(
    page: &P,
    search_url: &str,
    options: &DiscoveryOptions,
) -> WatchResult<Vec<String>>
where
    P: BrowserPage + ?Sized,
{
    info!("Navigating to search page: {}", search_url);
    goto_with_timeout(page, search_url, options.navigation_timeout)
        .await
        .map_err(|e| WatchError::Discovery {
            url: search_url.to_string(),
            message: e.to_string(),
        })?;

    tokio::time::sleep(options.settle_delay).await;

    match scroll_until_stable(page, options.max_scrolls).await {
        ScrollStop::Converged { scrolls } => debug!("Page height converged after {} scrolls", scrolls),
        ScrollStop::Capped { scrolls } => debug!("Scroll cap reached after {} scrolls", scrolls),
        ScrollStop::Interrupted { scrolls } => {
            warn!("Scrolling interrupted after {} scrolls, harvesting loaded listings", scrolls);
        }
    }

    let urls = harvest_listing_urls(page, options)
        .await
        .map_err(|message| WatchError::Discovery {
            url: search_url.to_string(),
            message,
        })?;

    info!("Found {} listing links", urls.len());
    Ok(urls)
}

/// Scroll one viewport at a time until the page height stops growing.
///
/// The first measurement equal to the previous one ends the loop, so a page
/// that never grows stops on the second scroll rather than at `max_scrolls`.
pub async fn scroll_until_stable<P>(page: &P, max_scrolls: usize) -> ScrollStop
where
    P: BrowserPage + ?Sized,
{
    let mut previous_height = 0u64;

    for i in 0..max_scrolls {
        if let Err(e) = page.scroll_by_viewport().await {
            warn!("Scroll {} failed: {:#}", i + 1, e);
            return ScrollStop::Interrupted { scrolls: i };
        }

        let height = match page.scroll_height().await {
            Ok(h) => h,
            Err(e) => {
                warn!("Height measurement {} failed: {:#}", i + 1, e);
                return ScrollStop::Interrupted { scrolls: i + 1 };
            }
        };

        if height == previous_height {
            return ScrollStop::Converged { scrolls: i + 1 };
        }

        previous_height = height;
        info!("Scrolled {} times...", i + 1);
    }

    ScrollStop::Capped {
        scrolls: max_scrolls,
    }
}

/// Collect listing anchors once, resolve them against the origin and dedupe
pub async fn harvest_listing_urls<P>(
    page: &P,
    options: &DiscoveryOptions,
) -> Result<Vec<String>, String>
where
    P: BrowserPage + ?Sized,
{
    let script = js_scripts::anchor_hrefs_script(&options.anchor_selector);
    let value = with_page_timeout(page.evaluate(&script), options.navigation_timeout, "Link harvest")
        .await
        .map_err(|e| format!("link harvest failed: {e:#}"))?;

    let hrefs: Vec<Option<String>> = serde_json::from_value(value)
        .map_err(|e| format!("link harvest returned an unexpected shape: {e}"))?;

    let resolved = hrefs
        .into_iter()
        .flatten()
        .filter_map(|href| resolve_listing_href(&options.origin, &href));

    Ok(dedup_preserving_order(resolved))
}
