//! HTTP chain fetcher.

use std::time::Duration;

use async_trait::async_trait;
use skillgate_auth::{ChainFetcher, ChainUrl, FetchError};

/// Default bound on one chain fetch, connect time included.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches chain bytes over HTTPS.
///
/// Redirects are disabled outright: the URL was validated against the
/// platform host before it got here, and a redirect would move the fetch
/// off that host. A redirect status therefore comes back as a non-success
/// response and fails the request.
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    /// Build a fetcher with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Propagates client construction failure from reqwest.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch(&self, url: &ChainUrl) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError(format!("unexpected status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
