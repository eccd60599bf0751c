//! # ProofVid
//!
//! The certificate registry: one tamper-evident registration certificate per
//! content digest.
//!
//! ## Overview
//!
//! A producer registers a digest once and receives a certificate carrying a
//! system-issued identifier and timestamp. Anyone can later verify a digest
//! or fetch a certificate by its identifier.
//!
//! - **Register**: Issuer mints identifier + timestamp, Store inserts
//!   atomically; a repeated digest is a conflict, never an overwrite.
//! - **Verify / Fetch**: pure reads against the Store.
//! - **Count**: total certificates, never decreasing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use proofvid::{Registration, Registry, RegistryConfig};
//! use proofvid::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("proofvid.db").unwrap();
//!     let registry = Registry::new(store, RegistryConfig::default());
//!
//!     let cert = registry
//!         .register(Registration::new("abc123").device_info("iPhone 15"))
//!         .await
//!         .unwrap();
//!
//!     let found = registry.verify("abc123").await.unwrap();
//!     assert_eq!(found, Some(cert));
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `proofvid::core` - Certificate types and the identifier issuer
//! - `proofvid::store` - Storage abstraction and SQLite

pub mod error;
pub mod registry;

pub use proofvid_core as core;
pub use proofvid_store as store;

pub use error::{RegistryError, Result};
pub use registry::{Registration, Registry, RegistryConfig};

pub use proofvid_core::{Certificate, CertificateId, Digest, Issuer, SystemIssuer};
