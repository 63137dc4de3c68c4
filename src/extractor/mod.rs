//! Listing extraction from a rendered detail page.
//!
//! Every field is read independently and degrades to `None` when its element
//! is missing. Only a failure to run the in-page script at all is an error.

pub mod price;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub use price::parse_price;

use crate::config::ListingSelectors;
use crate::errors::VisitError;
use crate::render::{BrowserPage, js_scripts, with_page_timeout};

/// One marketplace item as read from its detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Canonical identity key (absolute permalink)
    pub url: String,
    pub title: Option<String>,
    /// Always non-negative when present
    pub price: Option<Decimal>,
    pub size: Option<String>,
}

/// A listing with every required field present
///
/// Only this type reaches the filter and the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteListing {
    pub url: String,
    pub title: String,
    pub price: Decimal,
    pub size: String,
}

impl Listing {
    /// Build a listing from raw field texts, parsing the price
    #[must_use]
    pub fn from_raw(
        url: impl Into<String>,
        title: Option<String>,
        raw_price: Option<String>,
        size: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: non_blank(title),
            price: raw_price.as_deref().and_then(parse_price),
            size: non_blank(size),
        }
    }

    /// `Some` only when title, price and size are all present
    #[must_use]
    pub fn into_complete(self) -> Option<CompleteListing> {
        match self {
            Listing {
                url,
                title: Some(title),
                price: Some(price),
                size: Some(size),
            } => Some(CompleteListing {
                url,
                title,
                price,
                size,
            }),
            _ => None,
        }
    }

    /// Names of the required fields that are absent
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push("title");
        }
        if self.price.is_none() {
            missing.push("price");
        }
        if self.size.is_none() {
            missing.push("size");
        }
        missing
    }
}

/// Shape returned by the listing fields script
#[derive(Debug, Default, Deserialize)]
struct RawFields {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    raw_price: Option<String>,
    #[serde(default)]
    size: Option<String>,
}

/// Read the listing fields from an already navigated page
pub async fn extract<P>(
    page: &P,
    url: &str,
    selectors: &ListingSelectors,
    timeout: Duration,
) -> Result<Listing, VisitError>
where
    P: BrowserPage + ?Sized,
{
    let script = js_scripts::listing_fields_script(selectors);
    let value = with_page_timeout(page.evaluate(&script), timeout, "Listing extraction")
        .await
        .map_err(|e| VisitError::Evaluation(format!("{e:#}")))?;

    // A document without the expected shape yields an empty record, not an error
    let raw: RawFields = serde_json::from_value(value).unwrap_or_default();
    let listing = Listing::from_raw(url, raw.title, raw.raw_price, raw.size);

    debug!(
        "Extracted {}: title={:?} price={:?} size={:?}",
        url, listing.title, listing.price, listing.size
    );
    Ok(listing)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
