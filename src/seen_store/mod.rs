//! Persistent ledger of listings already notified
//!
//! Existence of a key is the only state. Keys are added only after a
//! confirmed notification and never removed.

pub mod sqlite;

use async_trait::async_trait;

pub use sqlite::SqliteSeenStore;

use crate::errors::StoreError;

/// Seen-set collaborator
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Create the backing schema. Idempotent; called once at startup.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Whether `key` has been recorded
    async fn has(&self, key: &str) -> Result<bool, StoreError>;

    /// Record `key`. Adding a present key is a no-op.
    async fn add(&self, key: &str) -> Result<(), StoreError>;
}
