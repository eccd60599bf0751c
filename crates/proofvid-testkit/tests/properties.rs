//! Registry properties over generated registrations.

use proofvid::store::{MemoryStore, SqliteStore};
use proofvid::{Registry, RegistryConfig, RegistryError};
use proofvid_testkit::generators::{digest, distinct_registrations};
use proofvid_testkit::{RegistrationParams, ScriptedIssuer, TestFixture};
use proptest::prelude::*;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    Runtime::new().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_registered_certificate_round_trips(params: RegistrationParams, seed: u64) {
        runtime().block_on(async {
            let fixture = TestFixture::seeded(seed);
            let cert = fixture.registry.register(params.to_registration()).await.unwrap();

            assert_eq!(cert.digest.as_str(), params.digest);
            assert_eq!(cert.device_info, params.device_info);
            assert_eq!(cert.location, params.location);
            assert_eq!(cert.metadata, params.metadata);

            let by_digest = fixture.registry.verify(&params.digest).await.unwrap();
            let by_id = fixture.registry.certificate(cert.certificate_id.as_str()).await.unwrap();
            assert_eq!(by_digest.as_ref(), Some(&cert));
            assert_eq!(by_id, Some(cert));
        });
    }

    #[test]
    fn test_second_registration_conflicts_and_keeps_first(
        first: RegistrationParams,
        second: RegistrationParams,
    ) {
        runtime().block_on(async {
            let fixture = TestFixture::new();
            let original = fixture.registry.register(first.to_registration()).await.unwrap();

            let mut again = second.to_registration();
            again.digest = first.digest.clone();
            let err = fixture.registry.register(again).await.unwrap_err();
            assert!(matches!(
                err,
                RegistryError::Conflict { ref digest } if digest.as_str() == first.digest
            ));

            assert_eq!(fixture.registry.verify(&first.digest).await.unwrap(), Some(original));
            assert_eq!(fixture.registry.count().await.unwrap(), 1);
        });
    }

    #[test]
    fn test_count_tracks_successful_registrations(batch in distinct_registrations(24)) {
        runtime().block_on(async {
            let fixture = TestFixture::new();
            let mut previous = 0;

            for (i, params) in batch.iter().enumerate() {
                fixture.registry.register(params.to_registration()).await.unwrap();
                // Repeats never move the count.
                let _ = fixture.registry.register(params.to_registration()).await;

                let count = fixture.registry.count().await.unwrap();
                assert!(count >= previous);
                assert_eq!(count, i as u64 + 1);
                previous = count;
            }
        });
    }

    #[test]
    fn test_identifiers_are_distinct(batch in distinct_registrations(24)) {
        runtime().block_on(async {
            let fixture = TestFixture::new();
            let mut ids = std::collections::HashSet::new();

            for params in &batch {
                let cert = fixture.registry.register(params.to_registration()).await.unwrap();
                assert!(ids.insert(cert.certificate_id));
            }
        });
    }

    #[test]
    fn test_unregistered_digest_is_absent_not_error(d in digest()) {
        runtime().block_on(async {
            let fixture = TestFixture::new();
            assert_eq!(fixture.registry.verify(&d).await.unwrap(), None);
            assert_eq!(fixture.registry.certificate(&d).await.unwrap(), None);
            assert_eq!(fixture.registry.count().await.unwrap(), 0);
        });
    }
}

#[tokio::test]
async fn test_identifier_collision_is_reissued() {
    let registry = Registry::with_issuer(
        MemoryStore::new(),
        ScriptedIssuer::new(["taken", "taken", "fresh"]),
        RegistryConfig::default(),
    );

    let first = registry.register(proofvid::Registration::new("d1")).await.unwrap();
    assert_eq!(first.certificate_id.as_str(), "taken");

    let second = registry.register(proofvid::Registration::new("d2")).await.unwrap();
    assert_eq!(second.certificate_id.as_str(), "fresh");
    assert_eq!(registry.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_identifier_collision_gives_up_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("collide.db")).unwrap();
    let registry = Registry::with_issuer(
        store,
        ScriptedIssuer::new(["same"]),
        RegistryConfig {
            max_issue_attempts: 2,
        },
    );

    registry.register(proofvid::Registration::new("d1")).await.unwrap();
    let err = registry
        .register(proofvid::Registration::new("d2"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RegistryError::IdentifierCollision { attempts: 2, .. }
    ));
    assert_eq!(registry.verify("d2").await.unwrap(), None);
    assert_eq!(registry.count().await.unwrap(), 1);
}
