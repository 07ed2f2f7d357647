use std::sync::Arc;

use hancock_key::{is_owner, KeyService, StoreError};
use tracing::{debug, info, warn};
use uuid::Uuid;
use x509_cert::{ext::pkix::BasicConstraints, Certificate};

use crate::{
    cert::{
        parse::{parse_certificate, project},
        signer::sign_certificate,
        template::CertificateTemplate,
        types::{
            CertificateLight, CertificateRecord, CertificateResponse, CertificateType,
            CreateCaRequest, CreateCertificateRequest, Subject,
        },
    },
    config::PkiConfig,
    error::{PkiError, Result},
    store::CertRepository,
};

/// Certificate lifecycle: CA creation, leaf issuance, owner-scoped
/// retrieval and deletion.
#[derive(Clone)]
pub struct CertificateService {
    certs: Arc<dyn CertRepository>,
    keys: KeyService,
    config: PkiConfig,
}

impl CertificateService {
    pub fn new(certs: Arc<dyn CertRepository>, keys: KeyService, config: PkiConfig) -> Self {
        Self {
            certs,
            keys,
            config,
        }
    }

    pub fn keys(&self) -> &KeyService {
        &self.keys
    }

    /// Build and sign a CA certificate without persisting it.
    ///
    /// A root is self-signed with the request key; an intermediate is signed
    /// by the parent CA's key, unlocked with `parent_key_password`.
    pub fn create_ca_cert(
        &self,
        request: &CreateCaRequest,
        owner_id: &str,
        cert_type: CertificateType,
    ) -> Result<Vec<u8>> {
        match (cert_type, request.parent_ca) {
            (CertificateType::RootCa, None) | (CertificateType::IntermediateCa, Some(_)) => {}
            (CertificateType::RootCa, Some(_)) => {
                return Err(PkiError::InvalidCertificateType(
                    "a root CA cannot have a parent".to_string(),
                ))
            }
            (CertificateType::IntermediateCa, None) => {
                return Err(PkiError::InvalidCertificateType(
                    "an intermediate CA requires a parent".to_string(),
                ))
            }
            (CertificateType::Certificate, _) => {
                return Err(PkiError::InvalidCertificateType(
                    "expected a CA certificate type".to_string(),
                ))
            }
        }

        let key = self
            .keys
            .get_decrypted_key_for_user(request.key_id, owner_id, &request.key_password)?;
        let template = CertificateTemplate::build::<&str>(
            &request.subject(),
            cert_type,
            request.expiration,
            &[],
            &[],
            &self.config,
        )?;
        let subject_spki = key.public_key_der()?;

        let Some(parent_id) = request.parent_ca else {
            return sign_certificate(&template, &subject_spki, &key, None);
        };

        let parent_record = self.get_owned_record(parent_id, owner_id)?;
        let parent = parse_certificate(&parent_record.data)?;
        ensure_can_issue(&parent_record, &parent, true)?;

        let parent_key_id = self.certs.get_key_id_by_cert_id(parent_id)?;
        let parent_key = self.keys.get_decrypted_key_for_user(
            parent_key_id,
            owner_id,
            &request.parent_key_password,
        )?;

        sign_certificate(&template, &subject_spki, &parent_key, Some(&parent))
    }

    /// Create and persist a CA: root when `parent_ca` is empty, otherwise
    /// intermediate.
    pub fn create_ca(&self, request: &CreateCaRequest, owner_id: &str) -> Result<CertificateLight> {
        let cert_type = if request.parent_ca.is_some() {
            CertificateType::IntermediateCa
        } else {
            CertificateType::RootCa
        };

        let der = self.create_ca_cert(request, owner_id, cert_type)?;
        let record = self.certs.create_cert(
            owner_id,
            &request.name,
            der,
            cert_type,
            request.parent_ca,
            request.key_id,
        )?;

        info!(
            cert_id = %record.id,
            owner = owner_id,
            cert_type = %cert_type,
            parent = ?record.parent_id,
            "created certificate authority"
        );
        Ok(CertificateLight::from(&record))
    }

    /// Issue a leaf certificate under the CA `ca_id`.
    pub fn create_cert(
        &self,
        ca_id: Uuid,
        request: &CreateCertificateRequest,
        owner_id: &str,
    ) -> Result<CertificateLight> {
        let ca_record = self.get_owned_record(ca_id, owner_id)?;
        let ca = parse_certificate(&ca_record.data)?;
        ensure_can_issue(&ca_record, &ca, false)?;

        let template = CertificateTemplate::build(
            &Subject::common_name(request.common_name.as_str()),
            CertificateType::Certificate,
            request.expiration,
            &request.key_usages,
            &request.subject_alternative_names,
            &self.config,
        )?;

        let ca_key_id = self.certs.get_key_id_by_cert_id(ca_id)?;
        let ca_key =
            self.keys
                .get_decrypted_key_for_user(ca_key_id, owner_id, &request.ca_key_password)?;
        let leaf_key =
            self.keys
                .get_decrypted_key_for_user(request.key_id, owner_id, &request.key_password)?;

        let der = sign_certificate(&template, &leaf_key.public_key_der()?, &ca_key, Some(&ca))?;
        let record = self.certs.create_cert(
            owner_id,
            &request.name,
            der,
            CertificateType::Certificate,
            Some(ca_id),
            request.key_id,
        )?;

        info!(
            cert_id = %record.id,
            owner = owner_id,
            ca = %ca_id,
            "issued certificate"
        );
        Ok(CertificateLight::from(&record))
    }

    /// Decode a stored certificate. Not ownership-gated.
    pub fn get_cert(&self, id: Uuid) -> Result<CertificateResponse> {
        let record = self.certs.get_cert_by_id(id).map_err(|e| not_found(e, id))?;
        debug!(cert_id = %id, "loaded certificate");
        project(&record)
    }

    pub fn get_cert_for_user(&self, id: Uuid, owner_id: &str) -> Result<CertificateResponse> {
        let record = self.get_owned_record(id, owner_id)?;
        project(&record)
    }

    /// PEM armour of the stored DER, LF line endings.
    pub fn get_cert_as_pem_for_user(&self, id: Uuid, owner_id: &str) -> Result<String> {
        let record = self.get_owned_record(id, owner_id)?;
        let config = pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF);
        Ok(pem::encode_config(
            &pem::Pem::new("CERTIFICATE", record.data),
            config,
        ))
    }

    pub fn delete_cert_for_user(&self, id: Uuid, owner_id: &str) -> Result<()> {
        self.get_owned_record(id, owner_id)?;
        self.certs.delete_cert_by_id(id)?;

        info!(cert_id = %id, owner = owner_id, "deleted certificate");
        Ok(())
    }

    /// Certificates of `owner_id`, optionally restricted to some types.
    /// An empty `cert_types` lists all of them.
    pub fn get_user_certs(
        &self,
        owner_id: &str,
        cert_types: &[CertificateType],
    ) -> Result<Vec<CertificateLight>> {
        let records = self.certs.get_certs_by_user_id(owner_id, cert_types)?;
        debug!(owner = owner_id, count = records.len(), "listed certificates");
        Ok(records.iter().map(CertificateLight::from).collect())
    }

    /// Certificates issued directly under `parent_id` that `owner_id` owns
    pub fn get_certs_by_parent_ca_for_user(
        &self,
        parent_id: Uuid,
        owner_id: &str,
    ) -> Result<Vec<CertificateLight>> {
        let records = self.certs.get_certs_by_parent_ca(parent_id)?;
        Ok(records
            .iter()
            .filter(|record| is_owner(&record.user_id, owner_id))
            .map(CertificateLight::from)
            .collect())
    }

    fn get_owned_record(&self, id: Uuid, owner_id: &str) -> Result<CertificateRecord> {
        let record = self.certs.get_cert_by_id(id).map_err(|e| not_found(e, id))?;

        if !is_owner(&record.user_id, owner_id) {
            warn!(cert_id = %id, caller = owner_id, "certificate access denied");
            return Err(PkiError::Unauthorized);
        }
        Ok(record)
    }
}

fn not_found(err: StoreError, id: Uuid) -> PkiError {
    match err {
        StoreError::NotFound(_) => PkiError::NotFound(format!("certificate {id}")),
        other => PkiError::Store(other),
    }
}

/// The issuer must be a CA; a CA with path length 0 may only issue leaves.
fn ensure_can_issue(
    record: &CertificateRecord,
    cert: &Certificate,
    issuing_ca: bool,
) -> Result<()> {
    let constraints = cert
        .tbs_certificate
        .get::<BasicConstraints>()
        .map_err(|e| PkiError::ParseError(format!("basic constraints: {e}")))?
        .map(|(_, bc)| bc);

    let Some(constraints) = constraints.filter(|bc| bc.ca && record.cert_type.is_ca()) else {
        return Err(PkiError::NotCertificateAuthority(record.id.to_string()));
    };

    if issuing_ca && constraints.path_len_constraint == Some(0) {
        return Err(PkiError::PathLengthExceeded(record.id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hancock_key::{KeyAlgorithm, KeyConfig, MemoryKeyRepository};
    use time::OffsetDateTime;

    use super::*;
    use crate::{cert::verify::verify_issued_by, store::MemoryCertRepository};

    struct Fixture {
        service: CertificateService,
        certs: Arc<MemoryCertRepository>,
    }

    fn fixture() -> Fixture {
        let keys = KeyService::new(
            Arc::new(MemoryKeyRepository::new()),
            KeyConfig {
                rsa_bits: 2048,
                pbkdf2_iterations: 1_000,
                salt_len: 16,
            },
        );
        let certs = Arc::new(MemoryCertRepository::new());
        let service = CertificateService::new(certs.clone(), keys, PkiConfig::default());
        Fixture { service, certs }
    }

    fn expiration() -> OffsetDateTime {
        OffsetDateTime::now_utc() + time::Duration::days(365)
    }

    fn ca_request(name: &str, key_id: Uuid, parent: Option<Uuid>) -> CreateCaRequest {
        CreateCaRequest {
            name: name.to_string(),
            organization: "Hancock".to_string(),
            country: "US".to_string(),
            state: String::new(),
            locality: String::new(),
            postal_code: String::new(),
            street_address: String::new(),
            expiration: expiration(),
            parent_ca: parent,
            parent_key_password: "pw".to_string(),
            key_id,
            key_password: "pw".to_string(),
        }
    }

    fn leaf_request(key_id: Uuid, usages: &[&str]) -> CreateCertificateRequest {
        CreateCertificateRequest {
            name: "web".to_string(),
            key_id,
            key_password: "pw".to_string(),
            key_usages: usages.iter().map(|u| u.to_string()).collect(),
            common_name: "www.example.com".to_string(),
            subject_alternative_names: vec!["example.com".to_string()],
            expiration: expiration(),
            ca_key_password: "pw".to_string(),
        }
    }

    fn key(service: &CertificateService, owner: &str, password: &str) -> Uuid {
        service
            .keys()
            .create_key(owner, "k", KeyAlgorithm::Ed25519, password)
            .unwrap()
            .id
    }

    #[test]
    fn test_root_intermediate_leaf() {
        let Fixture { service, .. } = fixture();

        let root_key = key(&service, "alice", "pw");
        let root = service
            .create_ca(&ca_request("Root", root_key, None), "alice")
            .unwrap();
        assert_eq!(root.cert_type, CertificateType::RootCa);

        let sub_key = key(&service, "alice", "pw");
        let sub = service
            .create_ca(&ca_request("Sub", sub_key, Some(root.id)), "alice")
            .unwrap();
        assert_eq!(sub.cert_type, CertificateType::IntermediateCa);

        let leaf_key = key(&service, "alice", "pw");
        let leaf = service
            .create_cert(
                sub.id,
                &leaf_request(leaf_key, &["digitalSignature", "serverAuth"]),
                "alice",
            )
            .unwrap();

        let root_view = service.get_cert(root.id).unwrap();
        assert!(root_view.is_ca);
        assert_eq!(root_view.max_path_len, 1);
        assert_eq!(root_view.issuer, root_view.subject);

        let sub_view = service.get_cert(sub.id).unwrap();
        assert_eq!(sub_view.max_path_len, 0);
        assert!(sub_view.max_path_len_zero);
        assert_eq!(sub_view.issuer.common_name, "Root");
        assert_eq!(sub_view.parent_id, Some(root.id));

        let leaf_view = service.get_cert_for_user(leaf.id, "alice").unwrap();
        assert!(!leaf_view.is_ca);
        assert_eq!(leaf_view.issuer.common_name, "Sub");
        assert_eq!(leaf_view.key_id, leaf_key);
        assert_eq!(leaf_view.ext_key_usage, vec!["serverAuth"]);

        let der = |id| service.certs.get_cert_by_id(id).unwrap().data;
        verify_issued_by(&der(sub.id), &der(root.id)).unwrap();
        verify_issued_by(&der(leaf.id), &der(sub.id)).unwrap();

        let children = service
            .get_certs_by_parent_ca_for_user(root.id, "alice")
            .unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, sub.id);

        let roots = service
            .get_user_certs("alice", &[CertificateType::RootCa])
            .unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(service.get_user_certs("alice", &[]).unwrap().len(), 3);
    }

    #[test]
    fn test_path_length_and_issuer_checks() {
        let Fixture { service, .. } = fixture();

        let root_key = key(&service, "alice", "pw");
        let root = service
            .create_ca(&ca_request("Root", root_key, None), "alice")
            .unwrap();

        let sub_key = key(&service, "alice", "pw");
        let sub = service
            .create_ca(&ca_request("Sub", sub_key, Some(root.id)), "alice")
            .unwrap();

        // an intermediate has path length 0
        let err = service
            .create_ca(&ca_request("Nested", sub_key, Some(sub.id)), "alice")
            .unwrap_err();
        assert!(matches!(err, PkiError::PathLengthExceeded(_)));

        // a leaf cannot issue
        let leaf_key = key(&service, "alice", "pw");
        let leaf = service
            .create_cert(root.id, &leaf_request(leaf_key, &[]), "alice")
            .unwrap();
        let err = service
            .create_cert(leaf.id, &leaf_request(leaf_key, &[]), "alice")
            .unwrap_err();
        assert!(matches!(err, PkiError::NotCertificateAuthority(_)));
    }

    #[test]
    fn test_ca_type_must_match_parent() {
        let Fixture { service, .. } = fixture();
        let key_id = key(&service, "alice", "pw");

        let err = service
            .create_ca_cert(
                &ca_request("Sub", key_id, None),
                "alice",
                CertificateType::IntermediateCa,
            )
            .unwrap_err();
        assert!(matches!(err, PkiError::InvalidCertificateType(_)));

        let err = service
            .create_ca_cert(
                &ca_request("Root", key_id, Some(Uuid::new_v4())),
                "alice",
                CertificateType::RootCa,
            )
            .unwrap_err();
        assert!(matches!(err, PkiError::InvalidCertificateType(_)));

        let err = service
            .create_ca_cert(
                &ca_request("Leaf", key_id, None),
                "alice",
                CertificateType::Certificate,
            )
            .unwrap_err();
        assert!(matches!(err, PkiError::InvalidCertificateType(_)));
    }

    #[test]
    fn test_invalid_usage_persists_nothing() {
        let Fixture { service, certs } = fixture();

        let root_key = key(&service, "alice", "pw");
        let root = service
            .create_ca(&ca_request("Root", root_key, None), "alice")
            .unwrap();

        let leaf_key = key(&service, "alice", "pw");
        let err = service
            .create_cert(root.id, &leaf_request(leaf_key, &["bogus"]), "alice")
            .unwrap_err();
        assert!(matches!(err, PkiError::InvalidKeyUsage(_)));
        assert_eq!(certs.get_certs_by_user_id("alice", &[]).unwrap().len(), 1);
    }

    #[test]
    fn test_wrong_ca_passphrase() {
        let Fixture { service, .. } = fixture();

        let root_key = key(&service, "alice", "pw");
        let root = service
            .create_ca(&ca_request("Root", root_key, None), "alice")
            .unwrap();

        let leaf_key = key(&service, "alice", "pw");
        let mut leaf_req = leaf_request(leaf_key, &[]);
        leaf_req.ca_key_password = "nope".to_string();
        let err = service.create_cert(root.id, &leaf_req, "alice").unwrap_err();
        assert!(matches!(
            err,
            PkiError::Key(hancock_key::Error::BadPassphrase)
        ));
    }

    #[test]
    fn test_ownership() {
        let Fixture { service, .. } = fixture();

        let root_key = key(&service, "alice", "pw");
        let root = service
            .create_ca(&ca_request("Root", root_key, None), "alice")
            .unwrap();

        assert!(service.get_cert_for_user(root.id, "bob").unwrap_err().is_unauthorized());
        assert!(service
            .get_cert_as_pem_for_user(root.id, "bob")
            .unwrap_err()
            .is_unauthorized());
        assert!(service.delete_cert_for_user(root.id, "bob").unwrap_err().is_unauthorized());
        assert!(service
            .get_certs_by_parent_ca_for_user(root.id, "bob")
            .unwrap()
            .is_empty());

        // bob cannot issue under alice's CA, even with his own key
        let bob_key = key(&service, "bob", "pw");
        let err = service
            .create_cert(root.id, &leaf_request(bob_key, &[]), "bob")
            .unwrap_err();
        assert!(err.is_unauthorized());

        // alice cannot use bob's key
        let err = service
            .create_cert(root.id, &leaf_request(bob_key, &[]), "alice")
            .unwrap_err();
        assert!(err.is_unauthorized());

        let missing = service.get_cert_for_user(Uuid::new_v4(), "bob").unwrap_err();
        assert!(missing.is_not_found());
        assert!(missing.is_access_denied());
    }

    #[test]
    fn test_pem_and_delete() {
        let Fixture { service, .. } = fixture();

        let root_key = key(&service, "alice", "pw");
        let root = service
            .create_ca(&ca_request("Root", root_key, None), "alice")
            .unwrap();

        let pem = service.get_cert_as_pem_for_user(root.id, "alice").unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert!(pem.ends_with("-----END CERTIFICATE-----\n"));
        assert!(!pem.contains('\r'));
        assert!(pem.lines().all(|line| line.len() <= 64));

        service.delete_cert_for_user(root.id, "alice").unwrap();
        assert!(service.get_cert(root.id).unwrap_err().is_not_found());
        assert!(service
            .delete_cert_for_user(root.id, "alice")
            .unwrap_err()
            .is_not_found());
    }
}
