//! Store trait: the abstract interface for certificate persistence.
//!
//! This trait allows the registry to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use proofvid_core::{Certificate, CertificateId, Digest};

use crate::error::Result;

/// Result of inserting a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertResult {
    /// The certificate was written.
    Inserted,
    /// A certificate for this digest already exists. Nothing was written.
    DigestConflict {
        /// The digest that is already registered.
        digest: Digest,
    },
    /// The candidate's identifier is already taken by another certificate.
    /// Nothing was written.
    IdCollision {
        /// The identifier that is already in use.
        certificate_id: CertificateId,
    },
}

/// The Store trait: async interface for certificate persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, `spawn_blocking` keeps the runtime free while the write and
/// its constraint check execute.
///
/// # Design Notes
///
/// - **Atomic insert**: two concurrent inserts of the same digest yield
///   exactly one `Inserted` and one `DigestConflict`.
/// - **Digest wins**: a candidate that collides on both columns reports
///   `DigestConflict`.
/// - **Read-after-write**: once `insert` returns `Inserted`, every later
///   lookup observes the certificate.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a certificate.
    ///
    /// # Returns
    /// - `Inserted` if the certificate was new.
    /// - `DigestConflict` if the digest is already registered.
    /// - `IdCollision` if the identifier is already in use.
    async fn insert(&self, certificate: &Certificate) -> Result<InsertResult>;

    /// Get the certificate registered for a digest.
    async fn find_by_digest(&self, digest: &Digest) -> Result<Option<Certificate>>;

    /// Get a certificate by its public identifier.
    async fn find_by_id(&self, certificate_id: &CertificateId) -> Result<Option<Certificate>>;

    /// Total number of stored certificates.
    async fn count(&self) -> Result<u64>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn insert(&self, certificate: &Certificate) -> Result<InsertResult> {
        (**self).insert(certificate).await
    }

    async fn find_by_digest(&self, digest: &Digest) -> Result<Option<Certificate>> {
        (**self).find_by_digest(digest).await
    }

    async fn find_by_id(&self, certificate_id: &CertificateId) -> Result<Option<Certificate>> {
        (**self).find_by_id(certificate_id).await
    }

    async fn count(&self) -> Result<u64> {
        (**self).count().await
    }
}
