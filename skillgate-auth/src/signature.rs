//! Body signature verification.
//!
//! The platform signs the exact request body with the leaf certificate's
//! RSA key using PKCS#1 v1.5 over SHA-1. The scheme is the platform's wire
//! contract and is reproduced bit for bit; verification must run over the
//! raw body bytes captured before any JSON handling, never a re-serialized
//! form.

use base64::prelude::*;
use rsa::Pkcs1v15Sign;
use sha1::{Digest, Sha1};

use crate::chain::VerifiedCertificate;
use crate::error::AuthError;

/// Verify the `Signature` header against the raw request body.
///
/// # Errors
///
/// `InvalidSignatureEncoding` when the header is absent, empty, or not
/// base64; `SignatureMismatch` when the decoded signature does not verify
/// against the body under the leaf's public key. Callers at the HTTP
/// boundary must treat both identically so probing cannot distinguish
/// which sub-check failed.
pub fn verify_body_signature(
    signature_b64: Option<&str>,
    raw_body: &[u8],
    certificate: &VerifiedCertificate,
) -> Result<(), AuthError> {
    let signature_b64 = match signature_b64 {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::InvalidSignatureEncoding),
    };

    let signature = BASE64_STANDARD
        .decode(signature_b64)
        .map_err(|_| AuthError::InvalidSignatureEncoding)?;

    let digest = Sha1::digest(raw_body);
    certificate
        .public_key()
        .verify(Pkcs1v15Sign::new::<Sha1>(), &digest, &signature)
        .map_err(|_| AuthError::SignatureMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::{RsaPrivateKey, RsaPublicKey};

    fn signed_body(body: &[u8]) -> (String, VerifiedCertificate) {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("generate RSA key");
        let public_key = RsaPublicKey::from(&private_key);

        let signature = private_key
            .sign(Pkcs1v15Sign::new::<Sha1>(), &Sha1::digest(body))
            .expect("sign body");

        let certificate =
            VerifiedCertificate::new("CN=test-signer".to_string(), public_key);
        (BASE64_STANDARD.encode(signature), certificate)
    }

    #[test]
    fn valid_signature_verifies() {
        let body = br#"{"request":{}}"#;
        let (sig, cert) = signed_body(body);

        assert_eq!(verify_body_signature(Some(&sig), body, &cert), Ok(()));
    }

    #[test]
    fn mutated_body_fails() {
        let body = br#"{"request":{}}"#;
        let (sig, cert) = signed_body(body);

        let mut tampered = body.to_vec();
        tampered[2] ^= 0x01;

        assert_eq!(
            verify_body_signature(Some(&sig), &tampered, &cert),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn wrong_key_fails() {
        let body = br#"{"request":{}}"#;
        let (sig, _) = signed_body(body);
        let (_, other_cert) = signed_body(body);

        assert_eq!(
            verify_body_signature(Some(&sig), body, &other_cert),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn missing_or_empty_header_is_an_encoding_error() {
        let (_, cert) = signed_body(b"{}");

        assert_eq!(
            verify_body_signature(None, b"{}", &cert),
            Err(AuthError::InvalidSignatureEncoding)
        );
        assert_eq!(
            verify_body_signature(Some(""), b"{}", &cert),
            Err(AuthError::InvalidSignatureEncoding)
        );
    }

    #[test]
    fn non_base64_header_is_an_encoding_error() {
        let (_, cert) = signed_body(b"{}");

        assert_eq!(
            verify_body_signature(Some("!!! not base64 !!!"), b"{}", &cert),
            Err(AuthError::InvalidSignatureEncoding)
        );
    }

    #[test]
    fn valid_base64_of_garbage_is_a_mismatch_not_an_encoding_error() {
        let body = b"{}";
        let (_, cert) = signed_body(body);
        let garbage = BASE64_STANDARD.encode([0u8; 256]);

        assert_eq!(
            verify_body_signature(Some(&garbage), body, &cert),
            Err(AuthError::SignatureMismatch)
        );
    }
}
