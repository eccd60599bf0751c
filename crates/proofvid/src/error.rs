//! Error types for the registry.

use proofvid_core::{CertificateId, Digest};
use proofvid_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// Absence is not an error: lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required field is missing or empty.
    #[error("invalid input: {0}")]
    Input(String),

    /// The digest already has a certificate.
    #[error("digest already registered: {digest}")]
    Conflict { digest: Digest },

    /// Every issued identifier for this registration was already taken.
    #[error("certificate identifier {certificate_id} already in use after {attempts} attempts")]
    IdentifierCollision {
        certificate_id: CertificateId,
        attempts: u32,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
