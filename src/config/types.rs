//! Core configuration types for watch runs
//!
//! This module contains the `WatchConfig` struct constructed once at startup
//! and passed into the notifier, discovery and pipeline constructors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::utils::{
    DEFAULT_ANCHOR_SELECTOR, DEFAULT_PRICE_SELECTOR, DEFAULT_SIZE_SELECTOR, DEFAULT_TITLE_SELECTOR,
};

/// Main configuration struct for a watch run
#[derive(Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Search-results page driven through incremental loading.
    pub(crate) search_url: String,

    /// Origin prefixed onto relative listing hrefs.
    ///
    /// **INVARIANT:** parses as an absolute http(s) URL (checked in builder).
    pub(crate) origin: String,

    /// Upper bound on viewport scrolls during discovery
    pub(crate) max_scrolls: usize,

    /// Upper bound on confirmed notifications per run
    pub(crate) max_matches: usize,

    /// Timeout in milliseconds for each `page.goto()`
    ///
    /// Default: 20000
    pub(crate) navigation_timeout_ms: u64,

    /// Delay after the search page navigation before scrolling starts
    pub(crate) search_settle_ms: u64,

    /// Delay after each listing page navigation before extraction
    pub(crate) item_settle_ms: u64,

    /// SQLite file holding the seen-listing ledger
    pub(crate) database_path: PathBuf,

    /// Case-insensitive title terms that disqualify a listing
    pub(crate) excluded_terms: Vec<String>,

    pub(crate) selectors: ListingSelectors,
    pub(crate) headless: bool,

    /// Send the invisible warm-up message ahead of the header
    pub(crate) warmup_message: bool,
    pub(crate) header_text: String,

    #[serde(skip_serializing)]
    pub(crate) telegram_token: String,
    pub(crate) telegram_chat_id: String,
    pub(crate) telegram_api_base: String,

    /// Browser executable; auto-detected or downloaded when unset
    pub(crate) chromium_path: Option<PathBuf>,
}

impl fmt::Debug for WatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchConfig")
            .field("search_url", &self.search_url)
            .field("origin", &self.origin)
            .field("max_scrolls", &self.max_scrolls)
            .field("max_matches", &self.max_matches)
            .field("navigation_timeout_ms", &self.navigation_timeout_ms)
            .field("search_settle_ms", &self.search_settle_ms)
            .field("item_settle_ms", &self.item_settle_ms)
            .field("database_path", &self.database_path)
            .field("excluded_terms", &self.excluded_terms)
            .field("selectors", &self.selectors)
            .field("headless", &self.headless)
            .field("warmup_message", &self.warmup_message)
            .field("header_text", &self.header_text)
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("telegram_api_base", &self.telegram_api_base)
            .field("chromium_path", &self.chromium_path)
            .finish()
    }
}

/// CSS selectors for the search page anchors and listing detail fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSelectors {
    pub anchor: String,
    pub title: String,
    pub price: String,
    pub size: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            anchor: DEFAULT_ANCHOR_SELECTOR.to_string(),
            title: DEFAULT_TITLE_SELECTOR.to_string(),
            price: DEFAULT_PRICE_SELECTOR.to_string(),
            size: DEFAULT_SIZE_SELECTOR.to_string(),
        }
    }
}
