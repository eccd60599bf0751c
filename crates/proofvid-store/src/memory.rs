//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use proofvid_core::{Certificate, CertificateId, Digest};

use crate::error::{Result, StoreError};
use crate::traits::{InsertResult, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; the
/// uniqueness check and the write happen under one write guard.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Certificates indexed by digest.
    by_digest: HashMap<Digest, Certificate>,

    /// Identifier index: certificate_id -> digest.
    by_id: HashMap<CertificateId, Digest>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, certificate: &Certificate) -> Result<InsertResult> {
        let mut inner = self.write()?;

        if inner.by_digest.contains_key(&certificate.digest) {
            return Ok(InsertResult::DigestConflict {
                digest: certificate.digest.clone(),
            });
        }

        if inner.by_id.contains_key(&certificate.certificate_id) {
            return Ok(InsertResult::IdCollision {
                certificate_id: certificate.certificate_id.clone(),
            });
        }

        inner
            .by_id
            .insert(certificate.certificate_id.clone(), certificate.digest.clone());
        inner
            .by_digest
            .insert(certificate.digest.clone(), certificate.clone());

        Ok(InsertResult::Inserted)
    }

    async fn find_by_digest(&self, digest: &Digest) -> Result<Option<Certificate>> {
        let inner = self.read()?;
        Ok(inner.by_digest.get(digest).cloned())
    }

    async fn find_by_id(&self, certificate_id: &CertificateId) -> Result<Option<Certificate>> {
        let inner = self.read()?;
        Ok(inner
            .by_id
            .get(certificate_id)
            .and_then(|digest| inner.by_digest.get(digest))
            .cloned())
    }

    async fn count(&self) -> Result<u64> {
        let inner = self.read()?;
        Ok(inner.by_digest.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_certificate(digest: &str, id: &str) -> Certificate {
        Certificate::new(
            Digest::new(digest).unwrap(),
            CertificateId::from(id),
            "2026-01-14T12:00:00.000000Z".to_string(),
        )
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        let cert = make_certificate("abc123", "id-1");

        let result = store.insert(&cert).await.unwrap();
        assert_eq!(result, InsertResult::Inserted);

        let by_id = store.find_by_id(&cert.certificate_id).await.unwrap().unwrap();
        assert_eq!(by_id, cert);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_conflicts() {
        let store = MemoryStore::new();
        store.insert(&make_certificate("abc123", "id-1")).await.unwrap();

        let dup_digest = store
            .insert(&make_certificate("abc123", "id-2"))
            .await
            .unwrap();
        assert!(matches!(dup_digest, InsertResult::DigestConflict { .. }));

        let dup_id = store
            .insert(&make_certificate("other", "id-1"))
            .await
            .unwrap();
        assert!(matches!(dup_id, InsertResult::IdCollision { .. }));

        assert_eq!(store.count().await.unwrap(), 1);
    }
}
