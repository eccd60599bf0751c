//! Identifier and timestamp issuance.
//!
//! An [`Issuer`] produces the two system-assigned fields of a new
//! certificate. It performs no uniqueness check; the store's unique
//! constraint is the authority on collisions.

use std::sync::atomic::{AtomicI64, Ordering};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::certificate::CertificateId;

/// Random bytes behind every certificate identifier (128 bits).
pub const CERTIFICATE_ID_BYTES: usize = 16;

/// Source of fresh certificate identifiers and issuance timestamps.
///
/// Both operations always succeed.
pub trait Issuer: Send + Sync {
    /// A fresh, unguessable, URL-safe identifier.
    fn new_certificate_id(&self) -> CertificateId;

    /// The current UTC instant as ISO-8601 with a trailing `Z`.
    fn now_timestamp(&self) -> String;
}

/// Production issuer backed by the OS CSPRNG and the system clock.
///
/// Timestamps never go backwards within one issuer: if the wall clock
/// steps back, the last issued instant is repeated instead.
#[derive(Debug)]
pub struct SystemIssuer {
    /// Highest instant handed out so far, in Unix microseconds.
    last_micros: AtomicI64,
}

impl SystemIssuer {
    /// Create a new issuer.
    pub fn new() -> Self {
        Self {
            last_micros: AtomicI64::new(i64::MIN),
        }
    }
}

impl Default for SystemIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl Issuer for SystemIssuer {
    fn new_certificate_id(&self) -> CertificateId {
        let mut bytes = [0u8; CERTIFICATE_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        CertificateId::from_string(URL_SAFE_NO_PAD.encode(bytes))
    }

    fn now_timestamp(&self) -> String {
        let now = Utc::now();
        let micros = now.timestamp_micros();
        let prev = self.last_micros.fetch_max(micros, Ordering::AcqRel);

        let instant = if prev > micros {
            DateTime::from_timestamp(
                prev.div_euclid(1_000_000),
                (prev.rem_euclid(1_000_000) * 1_000) as u32,
            )
            .unwrap_or(now)
        } else {
            now
        };

        format_timestamp(&instant)
    }
}

/// Render an instant in the canonical certificate format,
/// `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}
