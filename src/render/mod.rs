//! Rendering collaborator seam
//!
//! The pipeline only talks to a headless browser through these two traits.
//! `chrome` provides the chromiumoxide implementation; tests provide
//! scripted fakes.

pub mod chrome;
pub mod js_scripts;
pub mod page_timeout;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

pub use chrome::{ChromePage, ChromeSession};
pub use page_timeout::{goto_with_timeout, with_page_timeout};

/// A browsing session owning the browser process for one run
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: BrowserPage;

    /// Open a fresh, isolated page
    async fn new_page(&self) -> Result<Self::Page>;

    /// Close the browser. Called once per run after the URL loop.
    async fn close(&mut self) -> Result<()>;
}

/// One open tab
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigate and wait for the document to load
    async fn goto(&self, url: &str) -> Result<()>;

    /// Evaluate a script expression and return its JSON value
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Close the tab
    async fn close(&self) -> Result<()>;

    /// Scroll the window down by one viewport height
    async fn scroll_by_viewport(&self) -> Result<()> {
        self.evaluate(js_scripts::SCROLL_BY_VIEWPORT_SCRIPT).await?;
        Ok(())
    }

    /// Current `document.body.scrollHeight`
    async fn scroll_height(&self) -> Result<u64> {
        let value = self.evaluate(js_scripts::SCROLL_HEIGHT_SCRIPT).await?;
        value
            .as_u64()
            .or_else(|| value.as_f64().filter(|h| *h >= 0.0).map(|h| h as u64))
            .ok_or_else(|| anyhow!("scrollHeight was not a number: {value}"))
    }
}
