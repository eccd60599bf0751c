//! The Registry: issuance and verification of certificates.
//!
//! The Registry brings together the identifier issuer and the store. It
//! holds no lock of its own; all serialization happens in the store.

use proofvid_core::{Certificate, CertificateId, Digest, Issuer, SystemIssuer};
use proofvid_store::{InsertResult, Store};

use crate::error::{RegistryError, Result};

/// Configuration for the Registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How many identifiers to issue for one registration before giving up
    /// on identifier collisions. Values below 1 are treated as 1.
    pub max_issue_attempts: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_issue_attempts: 3,
        }
    }
}

/// A registration request: the digest plus optional free-text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub digest: String,
    pub device_info: String,
    pub location: String,
    pub metadata: String,
}

impl Registration {
    /// Start a registration for `digest`.
    pub fn new(digest: impl Into<String>) -> Self {
        Self {
            digest: digest.into(),
            ..Self::default()
        }
    }

    pub fn device_info(mut self, device_info: impl Into<String>) -> Self {
        self.device_info = device_info.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }
}

/// The certificate registry.
///
/// Provides a unified API for:
/// - Registering digests
/// - Verifying digests
/// - Fetching certificates by identifier
/// - Counting certificates
pub struct Registry<S: Store, I: Issuer = SystemIssuer> {
    /// The storage backend.
    store: S,
    /// Source of identifiers and timestamps.
    issuer: I,
    /// Configuration.
    config: RegistryConfig,
}

impl<S: Store> Registry<S> {
    /// Create a registry issuing from the system CSPRNG and clock.
    pub fn new(store: S, config: RegistryConfig) -> Self {
        Self::with_issuer(store, SystemIssuer::new(), config)
    }
}

impl<S: Store, I: Issuer> Registry<S, I> {
    /// Create a registry with a custom issuer.
    pub fn with_issuer(store: S, issuer: I, config: RegistryConfig) -> Self {
        Self {
            store,
            issuer,
            config,
        }
    }

    /// Register a digest and issue its certificate.
    ///
    /// # Errors
    /// - `Input` if the digest is empty.
    /// - `Conflict` if the digest already has a certificate; the stored
    ///   certificate is left untouched.
    /// - `IdentifierCollision` if every issued identifier was taken.
    /// - `Store` on storage failure.
    pub async fn register(&self, registration: Registration) -> Result<Certificate> {
        let Registration {
            digest,
            device_info,
            location,
            metadata,
        } = registration;

        let digest = Digest::new(digest).map_err(|e| RegistryError::Input(e.to_string()))?;
        let max_attempts = self.config.max_issue_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let candidate = Certificate::new(
                digest.clone(),
                self.issuer.new_certificate_id(),
                self.issuer.now_timestamp(),
            )
            .device_info(device_info.clone())
            .location(location.clone())
            .metadata(metadata.clone());

            match self.store.insert(&candidate).await? {
                InsertResult::Inserted => {
                    tracing::info!(
                        digest = %candidate.digest,
                        certificate_id = %candidate.certificate_id,
                        "certificate issued"
                    );
                    return Ok(candidate);
                }
                InsertResult::DigestConflict { digest } => {
                    tracing::warn!(digest = %digest, "digest already registered");
                    return Err(RegistryError::Conflict { digest });
                }
                InsertResult::IdCollision { certificate_id } if attempt >= max_attempts => {
                    tracing::error!(
                        certificate_id = %certificate_id,
                        attempts = attempt,
                        "giving up after repeated identifier collisions"
                    );
                    return Err(RegistryError::IdentifierCollision {
                        certificate_id,
                        attempts: attempt,
                    });
                }
                InsertResult::IdCollision { certificate_id } => {
                    tracing::warn!(
                        certificate_id = %certificate_id,
                        attempt,
                        "issued identifier already in use, reissuing"
                    );
                }
            }
        }
    }

    /// Look up the certificate for a digest.
    ///
    /// `Ok(None)` for any digest that was never registered, including the
    /// empty string.
    pub async fn verify(&self, digest: &str) -> Result<Option<Certificate>> {
        let Ok(digest) = Digest::new(digest) else {
            return Ok(None);
        };

        let found = self.store.find_by_digest(&digest).await?;
        tracing::debug!(digest = %digest, found = found.is_some(), "verify");
        Ok(found)
    }

    /// Fetch a certificate by its identifier.
    pub async fn certificate(&self, certificate_id: &str) -> Result<Option<Certificate>> {
        let certificate_id = CertificateId::from(certificate_id);

        let found = self.store.find_by_id(&certificate_id).await?;
        tracing::debug!(
            certificate_id = %certificate_id,
            found = found.is_some(),
            "fetch certificate"
        );
        Ok(found)
    }

    /// Total number of certificates issued.
    pub async fn count(&self) -> Result<u64> {
        Ok(self.store.count().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofvid_store::MemoryStore;

    fn registry() -> Registry<MemoryStore> {
        Registry::new(MemoryStore::new(), RegistryConfig::default())
    }

    #[tokio::test]
    async fn test_register_and_verify() {
        let registry = registry();
        let cert = registry
            .register(
                Registration::new("abc123")
                    .device_info("iPhone 15")
                    .location("Lisbon")
                    .metadata("{\"fps\":30}"),
            )
            .await
            .unwrap();

        assert_eq!(cert.digest.as_str(), "abc123");
        assert_eq!(cert.device_info, "iPhone 15");
        assert!(cert.issued_at.ends_with('Z'));

        assert_eq!(registry.verify("abc123").await.unwrap(), Some(cert.clone()));
        assert_eq!(
            registry
                .certificate(cert.certificate_id.as_str())
                .await
                .unwrap(),
            Some(cert)
        );
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let registry = registry();
        let first = registry.register(Registration::new("abc123")).await.unwrap();

        let err = registry
            .register(Registration::new("abc123").metadata("second"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Conflict { ref digest } if digest.as_str() == "abc123"
        ));

        assert_eq!(registry.verify("abc123").await.unwrap(), Some(first));
        assert_eq!(registry.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_digest_is_input_error() {
        let registry = registry();
        let err = registry.register(Registration::new("")).await.unwrap_err();
        assert!(matches!(err, RegistryError::Input(_)));
        assert_eq!(registry.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_absent_lookups_are_none() {
        let registry = registry();
        assert_eq!(registry.verify("nope").await.unwrap(), None);
        assert_eq!(registry.verify("").await.unwrap(), None);
        assert_eq!(registry.certificate("nope").await.unwrap(), None);
    }
}
