//! SQLite-backed certificate chain cache.
//!
//! One table keyed by chain URL, holding the raw PEM bytes of chains that
//! verified at least once. Entries are never evicted; a chain URL's
//! content is immutable for the URL's practical lifetime, so stale rows
//! are an operator concern (`DELETE FROM certificate_chains WHERE url = ?`).

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use skillgate_auth::{CacheError, ChainCache, ChainUrl};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::sync::OnceCell;

/// Persistent chain cache over a SQLite pool.
pub struct SqliteChainCache {
    pool: SqlitePool,
    schema: OnceCell<()>,
}

impl SqliteChainCache {
    /// Open or create a cache database at the given path.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, sqlx::Error> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                sqlx::Error::Configuration(
                    format!("failed to create cache directory: {e}").into(),
                )
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            // WAL mode for better concurrent read performance
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1) // SQLite performs best with a single writer
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool (tests use `sqlite::memory:`).
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    /// Create the table if needed. Runs at most once per store, lazily on
    /// first use; concurrent callers wait on the same initialization.
    async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS certificate_chains (
                        url TEXT PRIMARY KEY,
                        pem BLOB NOT NULL,
                        fetched_at INTEGER NOT NULL
                    )
                    "#,
                )
                .execute(&self.pool)
                .await?;
                Ok(())
            })
            .await
            .copied()
    }
}

#[async_trait]
impl ChainCache for SqliteChainCache {
    async fn get(&self, url: &ChainUrl) -> Result<Option<Vec<u8>>, CacheError> {
        self.ensure_schema()
            .await
            .map_err(|e| CacheError::ReadFailed(e.to_string()))?;

        let row = sqlx::query("SELECT pem FROM certificate_chains WHERE url = ?")
            .bind(url.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CacheError::ReadFailed(e.to_string()))?;

        Ok(row.map(|r| r.get("pem")))
    }

    async fn put(&self, url: &ChainUrl, pem: &[u8]) -> Result<(), CacheError> {
        self.ensure_schema()
            .await
            .map_err(|e| CacheError::WriteFailed(e.to_string()))?;

        sqlx::query(
            "INSERT OR REPLACE INTO certificate_chains (url, pem, fetched_at) VALUES (?, ?, ?)",
        )
        .bind(url.as_str())
        .bind(pem)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| CacheError::WriteFailed(e.to_string()))?;

        Ok(())
    }
}
