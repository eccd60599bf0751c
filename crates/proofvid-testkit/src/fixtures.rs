//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::DateTime;
use proofvid::{Registration, Registry, RegistryConfig};
use proofvid_core::{format_timestamp, CertificateId, Issuer, CERTIFICATE_ID_BYTES};
use proofvid_store::MemoryStore;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// First instant handed out by a [`SeededIssuer`], 2026-01-14T12:00:00Z.
pub const BASE_MICROS: i64 = 1_768_392_000_000_000;

/// Reproducible issuer: identifiers come from a seeded RNG, and each
/// timestamp is one microsecond after the previous one.
pub struct SeededIssuer {
    rng: Mutex<StdRng>,
    next_micros: AtomicI64,
}

impl SeededIssuer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            next_micros: AtomicI64::new(BASE_MICROS),
        }
    }
}

impl Issuer for SeededIssuer {
    fn new_certificate_id(&self) -> CertificateId {
        let mut bytes = [0u8; CERTIFICATE_ID_BYTES];
        self.rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .fill_bytes(&mut bytes);
        CertificateId::from_string(URL_SAFE_NO_PAD.encode(bytes))
    }

    fn now_timestamp(&self) -> String {
        let micros = self.next_micros.fetch_add(1, Ordering::AcqRel);
        let instant = DateTime::from_timestamp(
            micros.div_euclid(1_000_000),
            (micros.rem_euclid(1_000_000) * 1_000) as u32,
        )
        .unwrap_or_default();
        format_timestamp(&instant)
    }
}

/// Hands out a fixed sequence of identifiers, repeating the last one once
/// the script runs out. Used to force identifier collisions.
pub struct ScriptedIssuer {
    ids: Mutex<VecDeque<String>>,
    timestamp: String,
}

impl ScriptedIssuer {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: Mutex::new(ids.into_iter().map(Into::into).collect()),
            timestamp: format_timestamp(
                &DateTime::from_timestamp(BASE_MICROS / 1_000_000, 0).unwrap_or_default(),
            ),
        }
    }
}

impl Issuer for ScriptedIssuer {
    fn new_certificate_id(&self) -> CertificateId {
        let mut ids = self
            .ids
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let next = ids.pop_front().unwrap_or_default();
        if ids.is_empty() {
            ids.push_back(next.clone());
        }
        CertificateId::from_string(next)
    }

    fn now_timestamp(&self) -> String {
        self.timestamp.clone()
    }
}

/// A test fixture with an in-memory registry and a reproducible issuer.
pub struct TestFixture {
    pub registry: Registry<MemoryStore, SeededIssuer>,
}

impl TestFixture {
    /// Create a fixture with a random seed.
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    /// Create a fixture whose identifiers and timestamps depend only on
    /// `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_config(seed, RegistryConfig::default())
    }

    pub fn with_config(seed: u64, config: RegistryConfig) -> Self {
        Self {
            registry: Registry::with_issuer(MemoryStore::new(), SeededIssuer::new(seed), config),
        }
    }

    /// A registration for `digest` with typical capture-client fields.
    pub fn registration(&self, digest: &str) -> Registration {
        Registration::new(digest)
            .device_info("iPhone 15 Pro (iOS 17.2)")
            .location("38.7223,-9.1393")
            .metadata("{\"duration\":42.5,\"fps\":30}")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
