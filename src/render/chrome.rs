//! chromiumoxide implementation of the rendering seam
//!
//! `ChromeSession` owns the browser process, its CDP handler task and the
//! temporary profile directory for the duration of one run.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BrowserPage, BrowserSession};
use crate::browser_setup::{LaunchOptions, launch_browser};

/// Browser plus its event handler task
///
/// The handler MUST be aborted once the browser is closed, otherwise it keeps
/// running after the process is gone.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    closed: bool,
}

impl ChromeSession {
    /// Launch a browser for one run
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let (browser, handler, user_data_dir) = launch_browser(options).await?;
        Ok(Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
            closed: false,
        })
    }

    /// Remove the temporary profile directory
    ///
    /// Must run after `browser.wait()` so Chrome has released its file handles.
    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Page = ChromePage;

    async fn new_page(&self) -> Result<ChromePage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;
        Ok(ChromePage { page })
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        info!("Closing browser session");
        let close_result = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        self.cleanup_temp_dir();

        close_result
            .map(|_| ())
            .map_err(|e| anyhow!("Failed to close browser cleanly: {e}"))
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser::drop() kills the Chrome process if close() was never called
        if self.user_data_dir.is_some() {
            warn!("ChromeSession dropped without close() - removing temp dir in Drop");
            self.cleanup_temp_dir();
        }
    }
}

/// A chromiumoxide tab
pub struct ChromePage {
    page: Page,
}

#[async_trait]
impl BrowserPage for ChromePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;
        self.page
            .wait_for_navigation()
            .await
            .context("Failed to wait for page load")?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("Failed to execute page script")?;

        result
            .into_value::<serde_json::Value>()
            .map_err(|e| anyhow!("Failed to get script value: {e}"))
    }

    async fn close(&self) -> Result<()> {
        self.page
            .clone()
            .close()
            .await
            .context("Failed to close page")
    }
}
