//! Scripted collaborators for the listing_watch test suite
//!
//! `FakeSite` describes what a browser would see; `FakeSession` serves it.
//! All fakes are cheap to clone and share their state, so a test can hand one
//! copy to a `Pipeline` and keep another to inspect afterwards.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::{Value, json};
use url::Url;

use listing_watch::config::ListingSelectors;
use listing_watch::discovery::DiscoveryOptions;
use listing_watch::errors::{NotifyError, StoreError};
use listing_watch::filter::TermFilter;
use listing_watch::notifier::{Delivery, MessageTransport, Notifier, RunHeader};
use listing_watch::pipeline::{Pipeline, PipelineOptions};
use listing_watch::render::js_scripts::{SCROLL_BY_VIEWPORT_SCRIPT, SCROLL_HEIGHT_SCRIPT};
use listing_watch::render::{BrowserPage, BrowserSession};
use listing_watch::seen_store::SeenStore;

pub const ORIGIN: &str = "https://poshmark.com";
pub const SEARCH_URL: &str = "https://poshmark.com/search?query=dryvent";

/// Absolute listing URL for a short id
#[allow(dead_code)]
pub fn listing_url(id: &str) -> String {
    format!("{ORIGIN}/listing/{id}")
}

/// Relative href as it appears on the search page
#[allow(dead_code)]
pub fn listing_href(id: &str) -> String {
    format!("/listing/{id}")
}

/// Ordered log of side effects shared between store and transport
#[allow(dead_code)]
pub type EventLog = Arc<Mutex<Vec<String>>>;

// ---------------------------------------------------------------------------
// Browser
// ---------------------------------------------------------------------------

/// What the fake browser renders
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    pub search_hrefs: Vec<Option<String>>,
    /// Successive `scrollHeight` readings; the last one repeats
    pub heights: Vec<u64>,
    /// Field record returned on each listing page
    pub listings: HashMap<String, Value>,
    /// URLs whose navigation fails
    pub failing: HashSet<String>,
    /// URLs whose navigation never completes
    pub hanging: HashSet<String>,
    pub fail_new_page: bool,
    /// 1-based scroll whose evaluation fails
    pub fail_scroll_at: Option<usize>,
}

#[allow(dead_code)]
impl FakeSite {
    pub fn new() -> Self {
        Self {
            heights: vec![1000, 1000],
            ..Self::default()
        }
    }

    pub fn with_hrefs<I, S>(mut self, hrefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_hrefs = hrefs.into_iter().map(|h| Some(h.into())).collect();
        self
    }

    pub fn with_heights(mut self, heights: &[u64]) -> Self {
        self.heights = heights.to_vec();
        self
    }

    pub fn with_listing(mut self, id: &str, title: &str, price: &str, size: &str) -> Self {
        self.listings.insert(
            listing_url(id),
            json!({ "title": title, "raw_price": price, "size": size }),
        );
        self
    }

    pub fn with_raw_listing(mut self, id: &str, fields: Value) -> Self {
        self.listings.insert(listing_url(id), fields);
        self
    }

    pub fn with_failing(mut self, id: &str) -> Self {
        self.failing.insert(listing_url(id));
        self
    }

    pub fn with_failing_scroll(mut self, scroll: usize) -> Self {
        self.fail_scroll_at = Some(scroll);
        self
    }

    pub fn with_hanging(mut self, url: impl Into<String>) -> Self {
        self.hanging.insert(url.into());
        self
    }
}

/// Counters for everything the pipeline did with the browser
#[derive(Debug, Default)]
pub struct BrowserLog {
    pub pages_opened: usize,
    pub pages_closed: usize,
    pub navigations: Vec<String>,
    pub scrolls: usize,
    pub session_closes: usize,
}

#[derive(Clone)]
pub struct FakeSession {
    site: Arc<FakeSite>,
    log: Arc<Mutex<BrowserLog>>,
}

#[allow(dead_code)]
impl FakeSession {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            log: Arc::default(),
        }
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, BrowserLog> {
        self.log.lock().unwrap()
    }

    /// Navigations to listing pages, in order
    pub fn listing_visits(&self) -> Vec<String> {
        self.log()
            .navigations
            .iter()
            .filter(|u| u.as_str() != SEARCH_URL)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage> {
        if self.site.fail_new_page {
            return Err(anyhow!("target crashed"));
        }
        self.log().pages_opened += 1;
        Ok(FakePage {
            site: Arc::clone(&self.site),
            log: Arc::clone(&self.log),
            current: Mutex::new(None),
            height_reads: Mutex::new(0),
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.log().session_closes += 1;
        Ok(())
    }
}

pub struct FakePage {
    site: Arc<FakeSite>,
    log: Arc<Mutex<BrowserLog>>,
    current: Mutex<Option<String>>,
    height_reads: Mutex<usize>,
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.log.lock().unwrap().navigations.push(url.to_string());

        if self.site.hanging.contains(url) {
            std::future::pending::<()>().await;
        }
        if self.site.failing.contains(url) {
            return Err(anyhow!("net::ERR_CONNECTION_RESET at {url}"));
        }

        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        if script == SCROLL_BY_VIEWPORT_SCRIPT {
            let attempt = {
                let mut log = self.log.lock().unwrap();
                log.scrolls += 1;
                log.scrolls
            };
            if self.site.fail_scroll_at == Some(attempt) {
                return Err(anyhow!("Execution context was destroyed"));
            }
            return Ok(json!(true));
        }

        if script == SCROLL_HEIGHT_SCRIPT {
            let mut reads = self.height_reads.lock().unwrap();
            let height = self
                .site
                .heights
                .get(*reads)
                .or_else(|| self.site.heights.last())
                .copied()
                .unwrap_or(0);
            *reads += 1;
            return Ok(json!(height));
        }

        let current = self
            .current
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("evaluate before navigation"))?;

        if current == SEARCH_URL {
            return Ok(json!(self.site.search_hrefs));
        }

        Ok(self
            .site
            .listings
            .get(&current)
            .cloned()
            .unwrap_or_else(|| json!({ "title": null, "raw_price": null, "size": null })))
    }

    async fn close(&self) -> Result<()> {
        self.log.lock().unwrap().pages_closed += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Seen store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryInner {
    keys: Mutex<HashSet<String>>,
    adds: Mutex<Vec<String>>,
    fail_has: Mutex<HashSet<String>>,
    fail_add: Mutex<bool>,
    schema_calls: Mutex<usize>,
    events: Mutex<Option<EventLog>>,
}

/// In-memory seen store with failure injection
#[derive(Clone, Default)]
pub struct MemorySeenStore {
    inner: Arc<MemoryInner>,
}

#[allow(dead_code)]
impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::default();
        store
            .inner
            .keys
            .lock()
            .unwrap()
            .extend(keys.into_iter().map(Into::into));
        store
    }

    pub fn with_events(self, events: EventLog) -> Self {
        *self.inner.events.lock().unwrap() = Some(events);
        self
    }

    pub fn fail_has_for(&self, key: impl Into<String>) {
        self.inner.fail_has.lock().unwrap().insert(key.into());
    }

    pub fn fail_adds(&self) {
        *self.inner.fail_add.lock().unwrap() = true;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.keys.lock().unwrap().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.keys.lock().unwrap().len()
    }

    pub fn add_calls(&self) -> Vec<String> {
        self.inner.adds.lock().unwrap().clone()
    }

    pub fn schema_calls(&self) -> usize {
        *self.inner.schema_calls.lock().unwrap()
    }
}

fn locked_error() -> StoreError {
    StoreError::Database(sqlx::Error::Protocol("database is locked".into()))
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        *self.inner.schema_calls.lock().unwrap() += 1;
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool, StoreError> {
        if self.inner.fail_has.lock().unwrap().contains(key) {
            return Err(locked_error());
        }
        Ok(self.inner.keys.lock().unwrap().contains(key))
    }

    async fn add(&self, key: &str) -> Result<(), StoreError> {
        self.inner.adds.lock().unwrap().push(key.to_string());
        if *self.inner.fail_add.lock().unwrap() {
            return Err(locked_error());
        }
        if let Some(events) = self.inner.events.lock().unwrap().as_ref() {
            events.lock().unwrap().push(format!("add:{key}"));
        }
        self.inner.keys.lock().unwrap().insert(key.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TransportInner {
    attempts: Mutex<Vec<String>>,
    delivered: Mutex<Vec<String>>,
    reject_containing: Mutex<Vec<String>>,
    events: Mutex<Option<EventLog>>,
}

/// Transport that records every attempt and rejects scripted messages
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<TransportInner>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(self, events: EventLog) -> Self {
        *self.inner.events.lock().unwrap() = Some(events);
        self
    }

    /// Reject every message containing `needle`
    pub fn reject_containing(&self, needle: impl Into<String>) {
        self.inner.reject_containing.lock().unwrap().push(needle.into());
    }

    pub fn attempts(&self) -> Vec<String> {
        self.inner.attempts.lock().unwrap().clone()
    }

    pub fn delivered(&self) -> Vec<String> {
        self.inner.delivered.lock().unwrap().clone()
    }

    /// Delivered messages that carry a listing link
    pub fn delivered_listings(&self) -> Vec<String> {
        self.delivered()
            .into_iter()
            .filter(|m| m.contains("🔗 "))
            .collect()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError> {
        self.inner.attempts.lock().unwrap().push(text.to_string());

        let rejected = self
            .inner
            .reject_containing
            .lock()
            .unwrap()
            .iter()
            .any(|needle| text.contains(needle.as_str()));
        if rejected {
            return Err(NotifyError::Rejected("Bad Request: chat not found".into()));
        }

        if let Some(events) = self.inner.events.lock().unwrap().as_ref() {
            events.lock().unwrap().push(format!("send:{text}"));
        }

        let mut delivered = self.inner.delivered.lock().unwrap();
        delivered.push(text.to_string());
        Ok(Delivery {
            message_id: delivered.len() as i64,
        })
    }
}

// ---------------------------------------------------------------------------
// Pipeline wiring
// ---------------------------------------------------------------------------

/// Options with every delay zeroed
#[allow(dead_code)]
pub fn test_options(max_matches: usize) -> PipelineOptions {
    let navigation_timeout = Duration::from_millis(500);
    PipelineOptions {
        search_url: SEARCH_URL.to_string(),
        discovery: test_discovery_options(3),
        navigation_timeout,
        item_settle_delay: Duration::ZERO,
        selectors: ListingSelectors::default(),
        filter: TermFilter::default(),
        max_matches,
        header: RunHeader {
            warmup: false,
            text: "Header".to_string(),
        },
    }
}

#[allow(dead_code)]
pub fn test_discovery_options(max_scrolls: usize) -> DiscoveryOptions {
    DiscoveryOptions {
        max_scrolls,
        settle_delay: Duration::ZERO,
        navigation_timeout: Duration::from_millis(500),
        anchor_selector: ListingSelectors::default().anchor,
        origin: Url::parse(ORIGIN).unwrap(),
    }
}

#[allow(dead_code)]
pub type TestPipeline = Pipeline<FakeSession, MemorySeenStore, RecordingTransport>;

#[allow(dead_code)]
pub fn pipeline(
    options: PipelineOptions,
    session: &FakeSession,
    store: &MemorySeenStore,
    transport: &RecordingTransport,
) -> TestPipeline {
    Pipeline::new(
        options,
        session.clone(),
        store.clone(),
        Notifier::new(transport.clone()),
    )
}
