//! Classified authentication errors.

/// Errors that can occur while authenticating a webhook request.
///
/// Every variant is a rejection: the pipeline fails closed on any
/// ambiguity. `is_client_error` tells the HTTP boundary which status class
/// to answer with; the boundary must not echo the variant itself back to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The certificate chain header is absent or empty.
    #[error("certificate chain header missing")]
    MissingChainHeader,

    /// The claimed chain URL fails the scheme/host/path constraints.
    #[error("certificate chain url not acceptable")]
    UnacceptableChainUrl,

    /// The chain could not be obtained from the network or the cache.
    #[error("certificate chain fetch failed: {0}")]
    ChainFetchFailed(String),

    /// The chain does not verify: malformed, expired, wrong hostname, or
    /// not rooted in the supplied pool.
    #[error("certificate invalid: {0}")]
    CertificateInvalid(String),

    /// The signature header is absent or not valid base64.
    #[error("signature encoding invalid")]
    InvalidSignatureEncoding,

    /// The decoded signature does not match the request body.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The body is not a parseable event, or a required field is missing.
    #[error("event payload malformed: {0}")]
    MalformedEvent(String),

    /// The request timestamp is outside the allowed window.
    #[error("request timestamp outside allowed window")]
    RequestExpired,

    /// The request is addressed to a different application.
    #[error("application id mismatch")]
    ApplicationMismatch,
}

impl AuthError {
    /// Whether the boundary should answer with a 400-class status.
    ///
    /// Fetch/storage failures are the only 500-class rejections; everything
    /// else is a malformed or unauthentic client request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::ChainFetchFailed(_))
    }
}

/// Errors from a certificate cache collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CacheError {
    /// The backing store could not be read.
    #[error("cache read failed: {0}")]
    ReadFailed(String),

    /// The backing store could not be written.
    #[error("cache write failed: {0}")]
    WriteFailed(String),
}

/// Errors from a chain fetcher collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("chain fetch failed: {0}")]
pub struct FetchError(pub String);

/// Errors constructing an [`AuthConfig`](crate::pipeline::AuthConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The expected application id is empty. An empty id would match
    /// requests that carry no application block, so it is rejected here
    /// instead of acting as a wildcard.
    #[error("expected application id must not be empty")]
    MissingApplicationId,

    /// The timestamp tolerance exceeds the platform ceiling.
    #[error("timestamp tolerance {0}s exceeds platform maximum of {1}s")]
    ToleranceTooLarge(i64, i64),

    /// The timestamp tolerance is not a positive number of seconds.
    #[error("timestamp tolerance must be positive, got {0}s")]
    ToleranceNotPositive(i64),
}
