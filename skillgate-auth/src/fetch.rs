//! Chain fetcher contract.

use async_trait::async_trait;

use crate::chain_url::ChainUrl;
use crate::error::FetchError;

/// Retrieves certificate chain bytes from a validated URL.
///
/// Implementations must bound the request with a timeout so a slow chain
/// host cannot stall the calling request, and must not follow redirects to
/// a host other than the one already validated (the provided HTTP
/// implementation disables redirects outright). Any failure is terminal
/// for the request; the pipeline performs no retries.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    /// Fetch the raw response body for the chain URL.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on timeout, connection failure, or a non-success
    /// status. The pipeline maps this to `ChainFetchFailed` (fail closed).
    async fn fetch(&self, url: &ChainUrl) -> Result<Vec<u8>, FetchError>;
}
