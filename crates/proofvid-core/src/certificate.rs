//! The certificate record and its strongly typed keys.
//!
//! Both unique columns are newtypes so a digest can never be passed where a
//! certificate identifier is expected, and vice versa.

use serde::Serialize;
use std::fmt;

use crate::error::CoreError;

/// Caller-supplied content address of the registered content.
///
/// The only constraint is that it is non-empty; the format is never
/// interpreted (hex SHA-256 in practice, but any string is accepted).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Create a digest, rejecting the empty string.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CoreError::EmptyDigest);
        }
        Ok(Self(value))
    }

    /// Wrap a digest read back from storage, without validation.
    ///
    /// Databases written by earlier versions of the service may hold an
    /// empty digest; such rows must still be readable.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Borrow the digest text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the digest text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Digest {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Digest {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

/// Public reference token of a certificate.
///
/// Opaque: any string parses, so lookups with a malformed identifier are
/// simply "not found". Fresh identifiers come from an [`crate::Issuer`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CertificateId(String);

impl CertificateId {
    /// Wrap an existing identifier (e.g. read back from storage or a URL).
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the identifier text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CertificateId({})", self.0)
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CertificateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CertificateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CertificateId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A registration certificate.
///
/// Created exactly once by a successful registration and never mutated
/// afterwards. The free-text fields are stored verbatim and never
/// interpreted.
///
/// Serializes with the public field names: `certificate_id`, `hash`,
/// `timestamp`, `device_info`, `location`, `metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    /// Content address this certificate vouches for. Unique.
    #[serde(rename = "hash")]
    pub digest: Digest,
    /// Public reference token. Unique.
    pub certificate_id: CertificateId,
    /// Issuance instant, ISO-8601 UTC with a trailing `Z`.
    #[serde(rename = "timestamp")]
    pub issued_at: String,
    pub device_info: String,
    pub location: String,
    pub metadata: String,
}

impl Certificate {
    /// Assemble a certificate from issued fields and caller-supplied text.
    pub fn new(digest: Digest, certificate_id: CertificateId, issued_at: String) -> Self {
        Self {
            digest,
            certificate_id,
            issued_at,
            device_info: String::new(),
            location: String::new(),
            metadata: String::new(),
        }
    }

    /// Set the device description.
    pub fn device_info(mut self, device_info: impl Into<String>) -> Self {
        self.device_info = device_info.into();
        self
    }

    /// Set the capture location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the free-form metadata.
    pub fn metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }
}
