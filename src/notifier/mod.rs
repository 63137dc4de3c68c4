//! Outbound notifications
//!
//! Two call variants with different contracts:
//! - [`Notifier::send`] is the commit-path send. One transport call, no retry,
//!   every failure is returned to the caller.
//! - [`Notifier::send_best_effort`] is for non-critical messages (the run
//!   header). Failures are logged and dropped.

pub mod telegram;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

pub use telegram::TelegramTransport;

use crate::errors::NotifyError;
use crate::extractor::CompleteListing;
use crate::utils::WARMUP_TEXT;

/// Acknowledgment of a delivered message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub message_id: i64,
}

/// Messaging transport seam
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Deliver one plain-text message
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError>;
}

/// Header sent once per run ahead of the first listing
#[derive(Debug, Clone)]
pub struct RunHeader {
    /// Send the invisible warm-up message first
    pub warmup: bool,
    pub text: String,
}

/// Delivery wrapper around a transport
pub struct Notifier<T> {
    transport: T,
}

impl<T: MessageTransport> Notifier<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Commit-path send; the caller records the listing only on `Ok`
    pub async fn send(&self, text: &str) -> Result<Delivery, NotifyError> {
        debug!("Sending message ({} chars)", text.chars().count());
        let delivery = self.transport.send(text).await?;
        info!("Message delivered (id {})", delivery.message_id);
        Ok(delivery)
    }

    /// Non-critical send: never propagates a failure
    pub async fn send_best_effort(&self, text: &str) {
        if let Err(e) = self.transport.send(text).await {
            warn!("Best-effort message not delivered: {}", e);
        }
    }

    /// Send the run header (optional warm-up, then the header text)
    pub async fn send_header(&self, header: &RunHeader) {
        if header.warmup {
            self.send_best_effort(WARMUP_TEXT).await;
        }
        self.send_best_effort(&header.text).await;
    }
}

/// Plain-text message for one listing
#[must_use]
pub fn format_listing(listing: &CompleteListing) -> String {
    format!(
        "🧥 {}\n💰 {}\n📏 Size: {}\n🔗 {}",
        listing.title,
        format_price(listing.price),
        listing.size,
        listing.url
    )
}

fn format_price(price: Decimal) -> String {
    price.normalize().to_string()
}
