//! Shared harness for pipeline tests: a generated three-level PKI and
//! stub collaborators, so no test touches the network.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use base64::prelude::*;
use chrono::{DateTime, Utc};
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, Issuer, KeyPair, SanType,
};
use rsa::pkcs8::EncodePrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};

use skillgate_auth::{CacheError, ChainCache, ChainFetcher, ChainUrl, FetchError};

/// Wall clock frozen inside the test chain's validity window.
pub fn frozen_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:05Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Validity window that covers `frozen_now`.
pub const NOT_BEFORE: i64 = 1_672_531_200; // 2023-01-01T00:00:00Z
pub const NOT_AFTER: i64 = 1_988_150_400; // 2033-01-01T00:00:00Z

/// A generated root / intermediate / leaf hierarchy.
///
/// The PEM blocks are kept separate so tests can assemble complete or
/// deliberately truncated chain files.
pub struct TestPki {
    pub leaf_pem: String,
    pub intermediate_pem: String,
    pub root_pem: String,
    pub leaf_key: RsaPrivateKey,
}

impl TestPki {
    /// Chain file as the platform serves it: leaf first, then the pool.
    pub fn full_chain(&self) -> Vec<u8> {
        format!("{}{}{}", self.leaf_pem, self.intermediate_pem, self.root_pem).into_bytes()
    }

    /// Chain file missing its self-signed root.
    pub fn chain_without_root(&self) -> Vec<u8> {
        format!("{}{}", self.leaf_pem, self.intermediate_pem).into_bytes()
    }

    /// The leaf alone, with an empty pool.
    pub fn leaf_only(&self) -> Vec<u8> {
        self.leaf_pem.clone().into_bytes()
    }

    /// Sign a request body the way the platform does.
    pub fn sign_body(&self, body: &[u8]) -> String {
        let signature = self
            .leaf_key
            .sign(Pkcs1v15Sign::new::<Sha1>(), &Sha1::digest(body))
            .expect("sign body");
        BASE64_STANDARD.encode(signature)
    }
}

/// Generate a PKI whose leaf is valid for `hostname` between the given
/// Unix timestamps.
pub fn generate_pki(hostname: &str, not_before: i64, not_after: i64) -> TestPki {
    let mut rng = rand::thread_rng();

    let root_rsa = RsaPrivateKey::new(&mut rng, 2048).expect("generate root key");
    let intermediate_rsa = RsaPrivateKey::new(&mut rng, 2048).expect("generate intermediate key");
    let leaf_rsa = RsaPrivateKey::new(&mut rng, 2048).expect("generate leaf key");

    let root_key = rcgen_key(&root_rsa);
    let intermediate_key = rcgen_key(&intermediate_rsa);
    let leaf_key = rcgen_key(&leaf_rsa);

    let root_params = ca_params("skillgate test root", not_before, not_after);
    let root_cert = root_params
        .clone()
        .self_signed(&root_key)
        .expect("self-sign root");
    let root_issuer = Issuer::from_params(&root_params, &root_key);

    let intermediate_params = ca_params("skillgate test intermediate", not_before, not_after);
    let intermediate_cert = intermediate_params
        .clone()
        .signed_by(&intermediate_key, &root_issuer)
        .expect("sign intermediate");
    let intermediate_issuer = Issuer::from_params(&intermediate_params, &intermediate_key);

    let mut leaf_params = CertificateParams::default();
    leaf_params.distinguished_name = DistinguishedName::new();
    leaf_params
        .distinguished_name
        .push(DnType::CommonName, hostname);
    leaf_params.not_before = time::OffsetDateTime::from_unix_timestamp(not_before).unwrap();
    leaf_params.not_after = time::OffsetDateTime::from_unix_timestamp(not_after).unwrap();
    leaf_params
        .subject_alt_names
        .push(SanType::DnsName(hostname.to_string().try_into().unwrap()));
    let leaf_cert = leaf_params
        .signed_by(&leaf_key, &intermediate_issuer)
        .expect("sign leaf");

    TestPki {
        leaf_pem: leaf_cert.pem(),
        intermediate_pem: intermediate_cert.pem(),
        root_pem: root_cert.pem(),
        leaf_key: leaf_rsa,
    }
}

fn rcgen_key(key: &RsaPrivateKey) -> KeyPair {
    let pkcs8 = key.to_pkcs8_der().expect("encode pkcs8");
    KeyPair::try_from(pkcs8.as_bytes()).expect("rcgen key pair")
}

fn ca_params(common_name: &str, not_before: i64, not_after: i64) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name = DistinguishedName::new();
    params.distinguished_name.push(DnType::CommonName, common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.not_before = time::OffsetDateTime::from_unix_timestamp(not_before).unwrap();
    params.not_after = time::OffsetDateTime::from_unix_timestamp(not_after).unwrap();
    params
}

/// Fetcher stub serving fixed bytes and counting calls.
pub struct StubFetcher {
    chain: Result<Vec<u8>, FetchError>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn serving(chain: Vec<u8>) -> Self {
        Self {
            chain: Ok(chain),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            chain: Err(FetchError(message.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainFetcher for StubFetcher {
    async fn fetch(&self, _url: &ChainUrl) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.chain.clone()
    }
}

/// Cache stub whose reads always fail.
pub struct BrokenReadCache;

#[async_trait]
impl ChainCache for BrokenReadCache {
    async fn get(&self, _url: &ChainUrl) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::ReadFailed("store offline".to_string()))
    }

    async fn put(&self, _url: &ChainUrl, _pem: &[u8]) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Cache stub whose writes always fail.
pub struct BrokenWriteCache;

#[async_trait]
impl ChainCache for BrokenWriteCache {
    async fn get(&self, _url: &ChainUrl) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn put(&self, _url: &ChainUrl, _pem: &[u8]) -> Result<(), CacheError> {
        Err(CacheError::WriteFailed("store offline".to_string()))
    }
}
