//! URL manipulation utilities.
//!
//! Helpers for turning the relative hrefs harvested from the search page
//! into absolute listing permalinks.

use std::collections::HashSet;
use url::Url;

/// Check if a URL is valid
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Resolve a listing href against the marketplace origin.
///
/// Relative hrefs (`/listing/...`) get the origin prefixed, absolute http(s)
/// hrefs are kept as they are. Empty or non-http hrefs resolve to `None`.
#[must_use]
pub fn resolve_listing_href(origin: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = origin.join(href).ok()?;
    let resolved = resolved.to_string();
    is_valid_url(&resolved).then_some(resolved)
}

/// Drop repeated URLs, keeping the first occurrence and the original order.
#[must_use]
pub fn dedup_preserving_order(urls: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
