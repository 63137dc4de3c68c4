//! Getter methods for `WatchConfig`
//!
//! This module provides the accessor methods for retrieving configuration
//! values from a `WatchConfig` instance.

use std::path::Path;
use std::time::Duration;

use super::types::{ListingSelectors, WatchConfig};

impl WatchConfig {
    #[must_use]
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn max_scrolls(&self) -> usize {
        self.max_scrolls
    }

    #[must_use]
    pub fn max_matches(&self) -> usize {
        self.max_matches
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    #[must_use]
    pub fn search_settle_delay(&self) -> Duration {
        Duration::from_millis(self.search_settle_ms)
    }

    #[must_use]
    pub fn item_settle_delay(&self) -> Duration {
        Duration::from_millis(self.item_settle_ms)
    }

    #[must_use]
    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// Lower-cased, trimmed disqualifying terms
    #[must_use]
    pub fn excluded_terms(&self) -> &[String] {
        &self.excluded_terms
    }

    #[must_use]
    pub fn selectors(&self) -> &ListingSelectors {
        &self.selectors
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn warmup_message(&self) -> bool {
        self.warmup_message
    }

    #[must_use]
    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    #[must_use]
    pub fn telegram_token(&self) -> &str {
        &self.telegram_token
    }

    #[must_use]
    pub fn telegram_chat_id(&self) -> &str {
        &self.telegram_chat_id
    }

    /// Bot API base without a trailing slash
    #[must_use]
    pub fn telegram_api_base(&self) -> &str {
        &self.telegram_api_base
    }

    #[must_use]
    pub fn chromium_path(&self) -> Option<&Path> {
        self.chromium_path.as_deref()
    }
}
