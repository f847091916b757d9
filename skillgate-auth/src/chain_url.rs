//! Chain URL validation.
//!
//! The chain URL is attacker-supplied. It must be checked against the
//! platform constraints before any fetch happens, so a forged header can
//! never direct the fetcher at an arbitrary host.

use url::Url;

use crate::error::AuthError;

/// Host the platform serves certificate chains from.
pub const EXPECTED_CHAIN_HOST: &str = "s3.amazonaws.com";

/// Required path prefix for chain URLs on that host.
pub const EXPECTED_CHAIN_PATH_PREFIX: &str = "/echo.api/";

/// A chain URL that has passed the scheme/host/path checks.
///
/// Construction is the validation: holding a `ChainUrl` proves the checks
/// ran. The inner string is the original header value, byte for byte, so
/// it stays usable as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainUrl(String);

impl ChainUrl {
    /// Validate a raw `SignatureCertChainUrl` header value.
    ///
    /// # Errors
    ///
    /// `MissingChainHeader` when the header is absent or empty;
    /// `UnacceptableChainUrl` when the URL does not parse, is not https,
    /// names a different host or a non-default port, or lies outside the
    /// expected path prefix.
    pub fn validate(header: Option<&str>) -> Result<Self, AuthError> {
        let raw = match header {
            Some(value) if !value.is_empty() => value,
            _ => return Err(AuthError::MissingChainHeader),
        };

        let url = Url::parse(raw).map_err(|_| AuthError::UnacceptableChainUrl)?;

        // `Url::port` is None for the scheme default, so an explicit :443
        // passes while any other port fails, as does a userinfo-smuggled
        // host since `host_str` is the authority's host component only.
        if url.scheme() != "https"
            || url.host_str() != Some(EXPECTED_CHAIN_HOST)
            || url.port().is_some()
            || !url.path().starts_with(EXPECTED_CHAIN_PATH_PREFIX)
        {
            return Err(AuthError::UnacceptableChainUrl);
        }

        Ok(Self(raw.to_string()))
    }

    /// The validated URL string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChainUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
