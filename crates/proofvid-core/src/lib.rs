//! # ProofVid Core
//!
//! Pure primitives for the ProofVid certificate registry: the certificate
//! record, its strongly typed keys, and identifier/timestamp issuance.
//!
//! This crate contains no storage and no networking.
//!
//! ## Key Types
//!
//! - [`Certificate`] - The immutable record binding a digest to an identifier
//! - [`Digest`] - Caller-supplied content address (non-empty, otherwise opaque)
//! - [`CertificateId`] - System-issued, URL-safe, unguessable reference token
//! - [`Issuer`] - Source of fresh identifiers and issuance timestamps
//!
//! ## Issuance
//!
//! ```rust
//! use proofvid_core::{Issuer, SystemIssuer};
//!
//! let issuer = SystemIssuer::new();
//! let id = issuer.new_certificate_id();
//! let at = issuer.now_timestamp();
//! assert_eq!(id.as_str().len(), 22);
//! assert!(at.ends_with('Z'));
//! ```

pub mod certificate;
pub mod digest;
pub mod error;
pub mod issuer;

pub use certificate::{Certificate, CertificateId, Digest};
pub use digest::sha256_hex;
pub use error::{CoreError, Result};
pub use issuer::{format_timestamp, Issuer, SystemIssuer, CERTIFICATE_ID_BYTES};
