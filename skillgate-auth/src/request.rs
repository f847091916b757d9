//! Post-parse request validation: freshness and application identity.
//!
//! Both checks are pure functions over the parsed event fields, run last
//! in the pipeline because they need the payload the signature check just
//! proved authentic.

use chrono::{DateTime, Utc};
use subtle::ConstantTimeEq;

use crate::error::AuthError;

/// Check that a request timestamp is within `tolerance_secs` of `now`.
///
/// The comparison is symmetric: a request from the future is held to the
/// same window as a stale one. A difference of exactly the tolerance is
/// accepted; one second past it is not.
///
/// # Errors
///
/// `RequestExpired` when the absolute difference exceeds the tolerance.
pub fn verify_freshness(
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
    tolerance_secs: i64,
) -> Result<(), AuthError> {
    let drift = (now - timestamp).num_seconds().abs();
    if drift > tolerance_secs {
        return Err(AuthError::RequestExpired);
    }
    Ok(())
}

/// Check that the claimed application id equals the configured one.
///
/// Constant-time comparison over the id bytes.
///
/// # Errors
///
/// `ApplicationMismatch` on any difference, including an empty claimed id.
pub fn verify_application_id(claimed: &str, expected: &str) -> Result<(), AuthError> {
    let matches = claimed.len() == expected.len()
        && bool::from(claimed.as_bytes().ct_eq(expected.as_bytes()));
    if !matches {
        return Err(AuthError::ApplicationMismatch);
    }
    Ok(())
}
