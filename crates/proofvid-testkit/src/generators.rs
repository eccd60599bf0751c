//! Proptest generators for property-based testing.

use proptest::prelude::*;

use proofvid::Registration;

/// Generate a lowercase hex SHA-256 digest, as capture clients submit.
pub fn sha256_digest() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}".prop_map(String::from)
}

/// Generate any non-empty digest. Digests are opaque, so this includes
/// short, mixed-case and punctuated strings.
pub fn digest() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => sha256_digest(),
        1 => "[A-Za-z0-9._~-]{1,40}".prop_map(String::from),
    ]
}

/// Generate a free-text field, possibly empty.
pub fn free_text(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range(' ', '~'), 0..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Parameters for generating a registration.
#[derive(Debug, Clone)]
pub struct RegistrationParams {
    pub digest: String,
    pub device_info: String,
    pub location: String,
    pub metadata: String,
}

impl RegistrationParams {
    pub fn to_registration(&self) -> Registration {
        Registration::new(self.digest.clone())
            .device_info(self.device_info.clone())
            .location(self.location.clone())
            .metadata(self.metadata.clone())
    }
}

impl Arbitrary for RegistrationParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (digest(), free_text(32), free_text(32), free_text(64))
            .prop_map(|(digest, device_info, location, metadata)| RegistrationParams {
                digest,
                device_info,
                location,
                metadata,
            })
            .boxed()
    }
}

/// Generate a batch of registrations whose digests are pairwise distinct.
pub fn distinct_registrations(max: usize) -> impl Strategy<Value = Vec<RegistrationParams>> {
    prop::collection::vec(any::<RegistrationParams>(), 0..=max).prop_map(|mut batch| {
        let mut seen = std::collections::HashSet::new();
        batch.retain(|p| seen.insert(p.digest.clone()));
        batch
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofvid_core::Digest;

    proptest! {
        #[test]
        fn test_digests_are_never_empty(d in digest()) {
            prop_assert!(Digest::new(d).is_ok());
        }

        #[test]
        fn test_sha256_digest_shape(d in sha256_digest()) {
            prop_assert_eq!(d.len(), 64);
            prop_assert!(d.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        }

        #[test]
        fn test_params_carry_into_registration(params: RegistrationParams) {
            let registration = params.to_registration();
            prop_assert_eq!(&registration.digest, &params.digest);
            prop_assert_eq!(&registration.metadata, &params.metadata);
        }

        #[test]
        fn test_distinct_registrations_are_distinct(batch in distinct_registrations(16)) {
            let mut digests: Vec<_> = batch.iter().map(|p| p.digest.as_str()).collect();
            digests.sort_unstable();
            digests.dedup();
            prop_assert_eq!(digests.len(), batch.len());
        }
    }
}
