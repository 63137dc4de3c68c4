//! Environment loading for `WatchConfig`
//!
//! The binary calls [`WatchConfig::from_env`]; tests use
//! [`WatchConfig::from_lookup`] with a map so they never touch the process
//! environment.

use std::str::FromStr;

use super::types::WatchConfig;
use crate::errors::{WatchError, WatchResult};

pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_TELEGRAM_API_BASE: &str = "TELEGRAM_API_BASE";
pub const ENV_SEARCH_URL: &str = "WATCH_SEARCH_URL";
pub const ENV_ORIGIN: &str = "WATCH_ORIGIN";
pub const ENV_MAX_SCROLLS: &str = "WATCH_MAX_SCROLLS";
pub const ENV_MAX_MATCHES: &str = "WATCH_MAX_MATCHES";
pub const ENV_NAVIGATION_TIMEOUT_MS: &str = "WATCH_NAVIGATION_TIMEOUT_MS";
pub const ENV_SEARCH_SETTLE_MS: &str = "WATCH_SEARCH_SETTLE_MS";
pub const ENV_ITEM_SETTLE_MS: &str = "WATCH_ITEM_SETTLE_MS";
pub const ENV_DATABASE_PATH: &str = "WATCH_DATABASE_PATH";
pub const ENV_EXCLUDED_TERMS: &str = "WATCH_EXCLUDED_TERMS";
pub const ENV_HEADLESS: &str = "WATCH_HEADLESS";
pub const ENV_WARMUP_MESSAGE: &str = "WATCH_WARMUP_MESSAGE";
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

impl WatchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> WatchResult<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> WatchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get(ENV_TELEGRAM_TOKEN)
            .ok_or_else(|| WatchError::Config(format!("{ENV_TELEGRAM_TOKEN} must be set")))?;
        let chat_id = get(ENV_TELEGRAM_CHAT_ID)
            .ok_or_else(|| WatchError::Config(format!("{ENV_TELEGRAM_CHAT_ID} must be set")))?;

        let mut builder = WatchConfig::builder().telegram(token, chat_id);

        if let Some(url) = get(ENV_SEARCH_URL) {
            builder = builder.search_url(url);
        }
        if let Some(origin) = get(ENV_ORIGIN) {
            builder = builder.origin(origin);
        }
        if let Some(base) = get(ENV_TELEGRAM_API_BASE) {
            builder = builder.telegram_api_base(base);
        }
        if let Some(v) = get(ENV_MAX_SCROLLS) {
            builder = builder.max_scrolls(parse_var(ENV_MAX_SCROLLS, &v)?);
        }
        if let Some(v) = get(ENV_MAX_MATCHES) {
            builder = builder.max_matches(parse_var(ENV_MAX_MATCHES, &v)?);
        }
        if let Some(v) = get(ENV_NAVIGATION_TIMEOUT_MS) {
            builder = builder.navigation_timeout_ms(parse_var(ENV_NAVIGATION_TIMEOUT_MS, &v)?);
        }
        if let Some(v) = get(ENV_SEARCH_SETTLE_MS) {
            builder = builder.search_settle_ms(parse_var(ENV_SEARCH_SETTLE_MS, &v)?);
        }
        if let Some(v) = get(ENV_ITEM_SETTLE_MS) {
            builder = builder.item_settle_ms(parse_var(ENV_ITEM_SETTLE_MS, &v)?);
        }
        if let Some(path) = get(ENV_DATABASE_PATH) {
            builder = builder.database_path(path);
        }
        if let Some(terms) = get(ENV_EXCLUDED_TERMS) {
            builder = builder.excluded_terms(terms.split(',').map(ToString::to_string).collect());
        }
        if let Some(v) = get(ENV_HEADLESS) {
            builder = builder.headless(parse_bool(ENV_HEADLESS, &v)?);
        }
        if let Some(v) = get(ENV_WARMUP_MESSAGE) {
            builder = builder.warmup_message(parse_bool(ENV_WARMUP_MESSAGE, &v)?);
        }

        if let Some(path) = get(ENV_CHROMIUM_PATH) {
            builder = builder.chromium_path(path);
        }

        builder.build()
    }
}

fn parse_var<T>(key: &str, value: &str) -> WatchResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| WatchError::Config(format!("{key} must be a valid number: {e}")))
}

fn parse_bool(key: &str, value: &str) -> WatchResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(WatchError::Config(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}
