//! Certificate chain cache contract.
//!
//! The cache stores raw PEM bytes keyed by chain URL. It never stores a
//! verification verdict: chain-of-trust verification re-runs on every use,
//! so a cached chain is only ever judged against current trust and time
//! parameters. Entries are write-once-per-URL with no expiry; concurrent
//! puts for the same key carry the same bytes, so last-writer-wins.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::chain_url::ChainUrl;
use crate::error::CacheError;

/// Key/value store for fetched certificate chains.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; many in-flight requests share one
/// cache. Use interior mutability.
#[async_trait]
pub trait ChainCache: Send + Sync {
    /// Look up the cached chain bytes for a URL.
    ///
    /// A miss and an uninitialized store both return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ReadFailed` when the backing store errors; the
    /// pipeline fails closed on it.
    async fn get(&self, url: &ChainUrl) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store chain bytes for a URL.
    ///
    /// Only called after the chain verified, so the cache never holds bytes
    /// that have not passed verification at least once.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::WriteFailed` when the backing store errors.
    async fn put(&self, url: &ChainUrl, pem: &[u8]) -> Result<(), CacheError>;
}

/// Null-object cache: always misses, never stores.
///
/// Stands in when no backing store is configured, so call sites never
/// branch on an optional cache handle. Every request pays a fresh fetch.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChainCache;

#[async_trait]
impl ChainCache for NoopChainCache {
    async fn get(&self, _url: &ChainUrl) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn put(&self, _url: &ChainUrl, _pem: &[u8]) -> Result<(), CacheError> {
        Ok(())
    }
}

/// In-memory cache over a concurrent map.
///
/// Process-local: entries do not survive restarts. Useful for tests and
/// deployments that only want per-process memoization.
#[derive(Debug, Default)]
pub struct MemoryChainCache {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryChainCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ChainCache for MemoryChainCache {
    async fn get(&self, url: &ChainUrl) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.get(url.as_str()).map(|entry| entry.value().clone()))
    }

    async fn put(&self, url: &ChainUrl, pem: &[u8]) -> Result<(), CacheError> {
        self.entries.insert(url.as_str().to_string(), pem.to_vec());
        Ok(())
    }
}
