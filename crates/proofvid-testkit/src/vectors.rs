//! Digest vectors.
//!
//! Known file contents and the SHA-256 digests capture clients submit for
//! them. A client that disagrees on any of these will never verify against
//! this registry.

use std::io::Cursor;

use proofvid_core::sha256_hex;

/// A file body and its expected digest.
#[derive(Debug, Clone)]
pub struct DigestVector {
    pub name: &'static str,
    pub contents: Vec<u8>,
    /// Lowercase hex SHA-256 of `contents`.
    pub expected: &'static str,
}

/// All digest vectors.
pub fn all_vectors() -> Vec<DigestVector> {
    vec![
        DigestVector {
            name: "empty_file",
            contents: Vec::new(),
            expected: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        },
        DigestVector {
            name: "abc",
            contents: b"abc".to_vec(),
            expected: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        },
        DigestVector {
            name: "quick_brown_fox",
            contents: b"The quick brown fox jumps over the lazy dog".to_vec(),
            expected: "d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592",
        },
        DigestVector {
            // Spans several read buffers.
            name: "million_a",
            contents: vec![b'a'; 1_000_000],
            expected: "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0",
        },
    ]
}

/// Check every vector against [`sha256_hex`], returning the names of the
/// ones that disagree.
pub fn verify_all_vectors() -> Result<(), Vec<&'static str>> {
    let failures: Vec<_> = all_vectors()
        .into_iter()
        .filter(|v| match sha256_hex(Cursor::new(&v.contents)) {
            Ok(digest) => digest.as_str() != v.expected,
            Err(_) => true,
        })
        .map(|v| v.name)
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_verify() {
        assert_eq!(verify_all_vectors(), Ok(()));
    }

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }
}
