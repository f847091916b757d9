//! Request authentication for the skillgate webhook gateway.
//!
//! Verifies that an inbound webhook call actually originated from the
//! voice platform before any skill logic sees it:
//!
//! 1. the claimed certificate-chain URL meets the platform constraints,
//! 2. the chain verifies against its own root pool for the platform
//!    hostname and the current time,
//! 3. the `Signature` header validates the raw body bytes under the leaf
//!    certificate's key,
//! 4. the request is fresh and addressed to the configured application.
//!
//! This crate performs no IO of its own. Network and storage collaborators
//! are injected via traits:
//! - [`ChainFetcher`] - chain retrieval over the network
//! - [`ChainCache`] - persistent chain byte storage
//!
//! The HTTP boundary and the production implementations of both traits
//! live in `skillgate-server`.

pub mod cache;
pub mod chain;
pub mod chain_url;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod request;
pub mod signature;

pub use cache::{ChainCache, MemoryChainCache, NoopChainCache};
pub use chain::{verify_chain, VerifiedCertificate, EXPECTED_CERT_HOSTNAME};
pub use chain_url::{ChainUrl, EXPECTED_CHAIN_HOST, EXPECTED_CHAIN_PATH_PREFIX};
pub use error::{AuthError, CacheError, ConfigError, FetchError};
pub use fetch::ChainFetcher;
pub use pipeline::{
    AuthConfig, Authenticator, RequestHeaders, DEFAULT_TIMESTAMP_TOLERANCE_SECS,
    MAX_TIMESTAMP_TOLERANCE_SECS,
};
pub use request::{verify_application_id, verify_freshness};
pub use signature::verify_body_signature;
