//! # ProofVid Store
//!
//! Storage abstraction for the certificate registry. Provides a trait-based
//! interface for certificate persistence with SQLite and in-memory
//! implementations.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`InsertResult`] - Outcome of inserting a certificate
//!
//! ## Usage
//!
//! ```rust,no_run
//! use proofvid_core::{Certificate, CertificateId, Digest};
//! use proofvid_store::{InsertResult, SqliteStore, Store};
//!
//! async fn example() {
//!     let store = SqliteStore::open("proofvid.db").unwrap();
//!
//!     let cert = Certificate::new(
//!         Digest::new("abc123").unwrap(),
//!         CertificateId::from("Zm9vYmFyYmF6cXV4cXV1eA"),
//!         "2026-01-14T12:00:00.000000Z".to_string(),
//!     );
//!     assert_eq!(store.insert(&cert).await.unwrap(), InsertResult::Inserted);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Append-only**: there is no update or delete operation.
//! - **Constraint-driven conflicts**: a duplicate digest is detected by the
//!   storage engine's unique constraint at write time, never by a prior read.
//! - **Absence is not an error**: lookups return `Ok(None)`.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreConfig};
pub use traits::{InsertResult, Store};
