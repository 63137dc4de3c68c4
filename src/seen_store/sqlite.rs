//! SQLite-backed seen store.
//!
//! One table, `seen_listings`, keyed by listing URL with the Unix time of the
//! commit. WAL mode so an operator can inspect the file while a run is live.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::debug;

use super::SeenStore;
use crate::errors::StoreError;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS seen_listings (
    url TEXT PRIMARY KEY,
    seen_at INTEGER NOT NULL
);
"#;

#[derive(Clone)]
pub struct SqliteSeenStore {
    pool: SqlitePool,
}

impl SqliteSeenStore {
    /// Open (creating if missing) the database at `path`.
    ///
    /// Does not create the schema; call [`SeenStore::ensure_schema`].
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        debug!("Opened seen store at {}", path.display());
        Ok(Self { pool })
    }

    /// Number of recorded listings
    pub async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seen_listings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SeenStore for SqliteSeenStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM seen_listings WHERE url = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn add(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO seen_listings (url, seen_at) VALUES (?, ?) ON CONFLICT(url) DO NOTHING")
            .bind(key)
            .bind(chrono::Utc::now().timestamp())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
