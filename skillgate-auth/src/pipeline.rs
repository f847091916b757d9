//! The request authentication pipeline.
//!
//! An ordered, fail-fast sequence: chain URL syntax, chain acquisition
//! (cache or fetch), chain-of-trust verification, body signature, event
//! parse, freshness, application identity. The first failing stage
//! rejects the request; only a fully verified [`Event`] comes out.
//!
//! Configuration is an explicit struct passed by reference, and the cache
//! and fetcher are injected trait objects, so concurrent tests can run
//! against isolated configurations.

use chrono::{DateTime, Utc};
use skillgate_core::Event;

use crate::cache::ChainCache;
use crate::chain::{verify_chain, VerifiedCertificate};
use crate::chain_url::ChainUrl;
use crate::error::{AuthError, ConfigError};
use crate::fetch::ChainFetcher;
use crate::request::{verify_application_id, verify_freshness};
use crate::signature::verify_body_signature;

/// Default allowed deviation between request timestamp and wall clock.
pub const DEFAULT_TIMESTAMP_TOLERANCE_SECS: i64 = 60;

/// Platform ceiling on the timestamp tolerance.
pub const MAX_TIMESTAMP_TOLERANCE_SECS: i64 = 150;

/// Validated pipeline configuration.
///
/// Shared read-only across in-flight requests. Construction enforces the
/// invariants instead of each call site: the expected application id must
/// be non-empty and the tolerance must be positive and within the
/// platform ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    application_id: String,
    timestamp_tolerance_secs: i64,
}

impl AuthConfig {
    /// Build a configuration with the default timestamp tolerance.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingApplicationId` when `application_id` is empty.
    pub fn new(application_id: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_tolerance(application_id, DEFAULT_TIMESTAMP_TOLERANCE_SECS)
    }

    /// Build a configuration with an explicit timestamp tolerance.
    ///
    /// # Errors
    ///
    /// `MissingApplicationId` when the id is empty, `ToleranceNotPositive`
    /// or `ToleranceTooLarge` when the tolerance is out of range.
    pub fn with_tolerance(
        application_id: impl Into<String>,
        tolerance_secs: i64,
    ) -> Result<Self, ConfigError> {
        let application_id = application_id.into();
        if application_id.is_empty() {
            return Err(ConfigError::MissingApplicationId);
        }
        if tolerance_secs <= 0 {
            return Err(ConfigError::ToleranceNotPositive(tolerance_secs));
        }
        if tolerance_secs > MAX_TIMESTAMP_TOLERANCE_SECS {
            return Err(ConfigError::ToleranceTooLarge(
                tolerance_secs,
                MAX_TIMESTAMP_TOLERANCE_SECS,
            ));
        }
        Ok(Self {
            application_id,
            timestamp_tolerance_secs: tolerance_secs,
        })
    }

    /// The application id requests must be addressed to.
    #[must_use]
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Allowed absolute timestamp deviation in seconds.
    #[must_use]
    pub fn timestamp_tolerance_secs(&self) -> i64 {
        self.timestamp_tolerance_secs
    }
}

/// The two authentication headers of an inbound request.
///
/// A data-transfer struct: values are copied out of the HTTP layer
/// unchecked, and validation happens inside [`Authenticator::authenticate`].
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    /// `SignatureCertChainUrl` header, if present.
    pub chain_url: Option<String>,
    /// `Signature` header, if present.
    pub signature: Option<String>,
}

/// The authentication pipeline over a config and injected collaborators.
pub struct Authenticator<'a> {
    config: &'a AuthConfig,
    cache: &'a dyn ChainCache,
    fetcher: &'a dyn ChainFetcher,
}

impl<'a> Authenticator<'a> {
    /// Assemble a pipeline. No work happens until [`authenticate`].
    ///
    /// [`authenticate`]: Self::authenticate
    #[must_use]
    pub fn new(
        config: &'a AuthConfig,
        cache: &'a dyn ChainCache,
        fetcher: &'a dyn ChainFetcher,
    ) -> Self {
        Self {
            config,
            cache,
            fetcher,
        }
    }

    /// Authenticate one request and return its parsed event.
    ///
    /// `raw_body` must be the exact body bytes as received, captured before
    /// any JSON handling; the same buffer is parsed after the signature
    /// verifies. `now` is the caller's wall clock, passed in so tests can
    /// freeze it.
    ///
    /// # Errors
    ///
    /// The first failing stage's [`AuthError`]; see the module docs for
    /// stage order.
    pub async fn authenticate(
        &self,
        headers: &RequestHeaders,
        raw_body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Event, AuthError> {
        let chain_url = ChainUrl::validate(headers.chain_url.as_deref())?;

        let certificate = self.obtain_verified_certificate(&chain_url, now).await?;

        verify_body_signature(headers.signature.as_deref(), raw_body, &certificate)?;

        // The signature proved the bytes authentic; parse the same buffer.
        let event: Event = serde_json::from_slice(raw_body)
            .map_err(|e| AuthError::MalformedEvent(e.to_string()))?;

        let timestamp = event
            .timestamp()
            .ok_or_else(|| AuthError::MalformedEvent("request timestamp missing".to_string()))?;
        verify_freshness(timestamp.as_utc(), now, self.config.timestamp_tolerance_secs)?;

        verify_application_id(event.application_id(), &self.config.application_id)?;

        Ok(event)
    }

    /// Get chain bytes from the cache or the network, then verify them.
    ///
    /// Verification runs on both paths. On the fetch path the bytes are
    /// cached only after they verified, so a failed verification leaves no
    /// cache entry behind; a failed write is logged and the request
    /// proceeds, since its own verification already succeeded.
    async fn obtain_verified_certificate(
        &self,
        chain_url: &ChainUrl,
        now: DateTime<Utc>,
    ) -> Result<VerifiedCertificate, AuthError> {
        let cached = self
            .cache
            .get(chain_url)
            .await
            .map_err(|e| AuthError::ChainFetchFailed(e.to_string()))?;

        if let Some(pem) = cached {
            if !pem.is_empty() {
                tracing::debug!(chain_url = %chain_url, "certificate chain served from cache");
                return verify_chain(&pem, now);
            }
        }

        let pem = self
            .fetcher
            .fetch(chain_url)
            .await
            .map_err(|e| AuthError::ChainFetchFailed(e.to_string()))?;

        let certificate = verify_chain(&pem, now)?;

        if let Err(e) = self.cache.put(chain_url, &pem).await {
            tracing::warn!(chain_url = %chain_url, error = %e, "certificate cache write failed");
        }

        Ok(certificate)
    }
}
