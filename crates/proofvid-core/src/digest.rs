//! Local content hashing.
//!
//! Producers register the lowercase hex SHA-256 of the recorded file. The
//! registry itself never recomputes or checks this; it is offered so a
//! producer can derive the digest the same way the capture client does.

use std::io::{ErrorKind, Read};

use sha2::{Digest as _, Sha256};

use crate::certificate::Digest;
use crate::error::Result;

/// Stream `reader` through SHA-256 and return the hex digest.
pub fn sha256_hex<R: Read>(mut reader: R) -> Result<Digest> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Digest::new(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Hands out at most `chunk` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_sha256_known_vectors() {
        let empty = sha256_hex(&b""[..]).unwrap();
        assert_eq!(
            empty.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );

        let abc = sha256_hex(&b"abc"[..]).unwrap();
        assert_eq!(
            abc.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_spans_buffer_boundary() {
        let data = vec![0x5a_u8; 200 * 1024];
        let streamed = sha256_hex(&data[..]).unwrap();
        let direct = hex::encode(Sha256::digest(&data));
        assert_eq!(streamed.as_str(), direct);
    }

    proptest! {
        #[test]
        fn test_sha256_independent_of_read_sizes(
            data in prop::collection::vec(any::<u8>(), 0..4096),
            chunk in 1usize..97,
        ) {
            let streamed = sha256_hex(Trickle { data: &data, chunk }).unwrap();
            prop_assert_eq!(streamed.as_str(), hex::encode(Sha256::digest(&data)));
        }
    }
}
