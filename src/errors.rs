//! Error types for watch runs
//!
//! Errors are split by blast radius: `WatchError` aborts a run, `VisitError`
//! and `NotifyError` stay local to one listing URL.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for fatal run operations
pub type WatchResult<T> = Result<T, WatchError>;

/// Fatal errors: run setup or search-page discovery failed
#[derive(Debug, Error)]
pub enum WatchError {
    /// Configuration missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Browser could not be launched
    #[error("Browser error: {0}")]
    Browser(String),

    /// Seen-store schema initialization failed
    #[error("Seen store error: {0}")]
    Store(#[from] StoreError),

    /// Search page navigation or harvest failed
    #[error("Discovery failed for {url}: {message}")]
    Discovery { url: String, message: String },
}

impl From<anyhow::Error> for WatchError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Browser(format!("{err:#}"))
    }
}

/// Per-URL failure while visiting a listing page
#[derive(Debug, Error)]
pub enum VisitError {
    /// A page could not be opened on the session
    #[error("Failed to open page: {0}")]
    Page(String),

    /// Navigation returned an error
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// Navigation did not finish in time
    #[error("Navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// In-page script evaluation failed
    #[error("Page evaluation failed: {0}")]
    Evaluation(String),

    /// Seen-store lookup failed, so the URL's state is unknown
    #[error("Seen store lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// Failure of a single outbound notification
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Request never produced a response (connect, TLS, IO)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Messaging API answered `ok: false`
    #[error("Messaging API rejected the message: {0}")]
    Rejected(String),

    /// Response claimed success without a message identifier
    #[error("Messaging API response carried no message id")]
    MissingAck,

    /// Response body was not the expected JSON envelope
    #[error("Failed to decode messaging API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the bot token
        let err = err.without_url();
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Seen-store failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (creating the database directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
