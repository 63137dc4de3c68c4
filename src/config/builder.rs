//! Type-safe builder for `WatchConfig` using the typestate pattern
//!
//! `build()` only exists once the Telegram credentials are set, so a config
//! without a destination cannot be constructed.

use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{ListingSelectors, WatchConfig};
use crate::errors::{WatchError, WatchResult};
use crate::utils::{
    DEFAULT_DATABASE_PATH, DEFAULT_EXCLUDED_TERMS, DEFAULT_HEADER_TEXT, DEFAULT_ITEM_SETTLE_MS,
    DEFAULT_MAX_MATCHES, DEFAULT_MAX_SCROLLS, DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_ORIGIN,
    DEFAULT_SEARCH_SETTLE_MS, DEFAULT_SEARCH_URL, DEFAULT_TELEGRAM_API_BASE, is_valid_url,
};

// Type states for the builder
pub struct WithTelegram;

pub struct WatchConfigBuilder<State = ()> {
    pub(crate) search_url: String,
    pub(crate) origin: String,
    pub(crate) max_scrolls: usize,
    pub(crate) max_matches: usize,
    pub(crate) navigation_timeout_ms: u64,
    pub(crate) search_settle_ms: u64,
    pub(crate) item_settle_ms: u64,
    pub(crate) database_path: PathBuf,
    pub(crate) excluded_terms: Vec<String>,
    pub(crate) selectors: ListingSelectors,
    pub(crate) headless: bool,
    pub(crate) warmup_message: bool,
    pub(crate) header_text: String,
    pub(crate) telegram_token: Option<String>,
    pub(crate) telegram_chat_id: Option<String>,
    pub(crate) telegram_api_base: String,
    pub(crate) chromium_path: Option<PathBuf>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for WatchConfigBuilder<()> {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            max_scrolls: DEFAULT_MAX_SCROLLS,
            max_matches: DEFAULT_MAX_MATCHES,
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            search_settle_ms: DEFAULT_SEARCH_SETTLE_MS,
            item_settle_ms: DEFAULT_ITEM_SETTLE_MS,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            excluded_terms: DEFAULT_EXCLUDED_TERMS
                .iter()
                .map(ToString::to_string)
                .collect(),
            selectors: ListingSelectors::default(),
            headless: true,
            warmup_message: true,
            header_text: DEFAULT_HEADER_TEXT.to_string(),
            telegram_token: None,
            telegram_chat_id: None,
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            chromium_path: None,
            _phantom: PhantomData,
        }
    }
}

impl WatchConfig {
    /// Create a builder for configuring a `WatchConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> WatchConfigBuilder<()> {
        WatchConfigBuilder::default()
    }
}

impl WatchConfigBuilder<()> {
    /// Set the bot credential and destination chat (required)
    pub fn telegram(
        self,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> WatchConfigBuilder<WithTelegram> {
        WatchConfigBuilder {
            search_url: self.search_url,
            origin: self.origin,
            max_scrolls: self.max_scrolls,
            max_matches: self.max_matches,
            navigation_timeout_ms: self.navigation_timeout_ms,
            search_settle_ms: self.search_settle_ms,
            item_settle_ms: self.item_settle_ms,
            database_path: self.database_path,
            excluded_terms: self.excluded_terms,
            selectors: self.selectors,
            headless: self.headless,
            warmup_message: self.warmup_message,
            header_text: self.header_text,
            telegram_token: Some(token.into()),
            telegram_chat_id: Some(chat_id.into()),
            telegram_api_base: self.telegram_api_base,
            chromium_path: self.chromium_path,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when the Telegram destination is set
impl WatchConfigBuilder<WithTelegram> {
    pub fn build(self) -> WatchResult<WatchConfig> {
        let telegram_token = self
            .telegram_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| WatchError::Config("telegram token is required".to_string()))?;
        let telegram_chat_id = self
            .telegram_chat_id
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| WatchError::Config("telegram chat id is required".to_string()))?;

        if !is_valid_url(&self.search_url) {
            return Err(WatchError::Config(format!(
                "search url is not a valid http(s) URL: {}",
                self.search_url
            )));
        }

        if !is_valid_url(&self.origin) {
            return Err(WatchError::Config(format!(
                "origin is not a valid http(s) URL: {}",
                self.origin
            )));
        }

        if !is_valid_url(&self.telegram_api_base) {
            return Err(WatchError::Config(format!(
                "telegram api base is not a valid http(s) URL: {}",
                self.telegram_api_base
            )));
        }

        let excluded_terms = self
            .excluded_terms
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(WatchConfig {
            search_url: self.search_url,
            origin: self.origin,
            max_scrolls: self.max_scrolls,
            max_matches: self.max_matches,
            navigation_timeout_ms: self.navigation_timeout_ms,
            search_settle_ms: self.search_settle_ms,
            item_settle_ms: self.item_settle_ms,
            database_path: self.database_path,
            excluded_terms,
            selectors: self.selectors,
            headless: self.headless,
            warmup_message: self.warmup_message,
            header_text: self.header_text,
            telegram_token,
            telegram_chat_id,
            telegram_api_base: self.telegram_api_base.trim_end_matches('/').to_string(),
            chromium_path: self.chromium_path,
        })
    }
}

// Builder methods available at any state
impl<State> WatchConfigBuilder<State> {
    #[must_use]
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Cap on viewport scrolls; discovery usually stops earlier on convergence
    #[must_use]
    pub fn max_scrolls(mut self, scrolls: usize) -> Self {
        self.max_scrolls = scrolls;
        self
    }

    /// Per-run quota of confirmed notifications
    #[must_use]
    pub fn max_matches(mut self, matches: usize) -> Self {
        self.max_matches = matches;
        self
    }

    #[must_use]
    pub fn navigation_timeout_ms(mut self, ms: u64) -> Self {
        self.navigation_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn search_settle_ms(mut self, ms: u64) -> Self {
        self.search_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn item_settle_ms(mut self, ms: u64) -> Self {
        self.item_settle_ms = ms;
        self
    }

    #[must_use]
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    #[must_use]
    pub fn excluded_terms(mut self, terms: Vec<String>) -> Self {
        self.excluded_terms = terms;
        self
    }

    #[must_use]
    pub fn selectors(mut self, selectors: ListingSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn warmup_message(mut self, enabled: bool) -> Self {
        self.warmup_message = enabled;
        self
    }

    #[must_use]
    pub fn header_text(mut self, text: impl Into<String>) -> Self {
        self.header_text = text.into();
        self
    }

    /// Override the Bot API base URL (used by tests against a mock server)
    #[must_use]
    pub fn telegram_api_base(mut self, base: impl Into<String>) -> Self {
        self.telegram_api_base = base.into();
        self
    }

    /// Use this browser executable instead of searching for one
    #[must_use]
    pub fn chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }
}
