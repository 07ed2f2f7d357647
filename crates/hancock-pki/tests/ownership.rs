use std::sync::Arc;

use hancock_key::{KeyAlgorithm, KeyConfig, KeyService, MemoryKeyRepository};
use hancock_pki::{CertificateService, CreateCaRequest, MemoryCertRepository, PkiConfig};
use time::{Duration, OffsetDateTime};

fn service() -> CertificateService {
    let keys = KeyService::new(
        Arc::new(MemoryKeyRepository::new()),
        KeyConfig {
            pbkdf2_iterations: 1_000,
            ..KeyConfig::default()
        },
    );
    CertificateService::new(
        Arc::new(MemoryCertRepository::new()),
        keys,
        PkiConfig::default(),
    )
}

#[test]
fn test_other_user_is_always_unauthorized() {
    let service = service();
    let keys = service.keys();

    let key = keys.create_key("A", "a", KeyAlgorithm::Ed25519, "pw").unwrap();
    let ca = service
        .create_ca(
            &CreateCaRequest {
                name: "A Root".to_string(),
                organization: String::new(),
                country: String::new(),
                state: String::new(),
                locality: String::new(),
                postal_code: String::new(),
                street_address: String::new(),
                expiration: OffsetDateTime::now_utc() + Duration::days(30),
                parent_ca: None,
                parent_key_password: String::new(),
                key_id: key.id,
                key_password: "pw".to_string(),
            },
            "A",
        )
        .unwrap();

    // correct passphrase does not help another user
    let err = keys.get_decrypted_key_for_user(key.id, "B", "pw").unwrap_err();
    assert!(err.is_unauthorized());
    assert!(keys.get_key_as_pem_for_user(key.id, "B").unwrap_err().is_unauthorized());
    assert!(keys.get_keys_for_user("B").unwrap().is_empty());

    assert!(service.get_cert_for_user(ca.id, "B").unwrap_err().is_unauthorized());
    assert!(service.get_cert_as_pem_for_user(ca.id, "B").unwrap_err().is_unauthorized());
    assert!(service.delete_cert_for_user(ca.id, "B").unwrap_err().is_unauthorized());
    assert!(service.get_user_certs("B", &[]).unwrap().is_empty());
    assert!(service.get_certs_by_parent_ca_for_user(ca.id, "B").unwrap().is_empty());

    // an empty caller owns nothing
    assert!(service.get_cert_for_user(ca.id, "").unwrap_err().is_unauthorized());

    // the owner still has full access
    assert!(service.get_cert_for_user(ca.id, "A").is_ok());
    service.delete_cert_for_user(ca.id, "A").unwrap();
}
