//! # ProofVid Testkit
//!
//! Testing utilities for the ProofVid registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Digest vectors**: Known file contents with their expected SHA-256
//!   digests, as computed by capture clients
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Registries and issuers for setting up test scenarios
//!
//! ## Digest Vectors
//!
//! ```rust
//! use proofvid_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use proofvid_testkit::generators::RegistrationParams;
//!
//! proptest! {
//!     #[test]
//!     fn registration_has_digest(params: RegistrationParams) {
//!         prop_assert!(!params.to_registration().digest.is_empty());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use proofvid_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::seeded(7);
//! let registration = fixture.registration("abc123");
//! assert_eq!(registration.digest, "abc123");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{ScriptedIssuer, SeededIssuer, TestFixture};
pub use generators::RegistrationParams;
pub use vectors::{all_vectors, verify_all_vectors, DigestVector};
