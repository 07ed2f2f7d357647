use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    access::is_owner,
    algorithm::KeyAlgorithm,
    config::KeyConfig,
    error::{Error, Result},
    key::PrivateKey,
    protection::KeyProtection,
    store::KeyRepository,
    types::{KeyLight, KeyRecord},
};

/// Key lifecycle: generation, protection, persistence and owner-scoped
/// retrieval.
#[derive(Clone)]
pub struct KeyService {
    repo: Arc<dyn KeyRepository>,
    config: KeyConfig,
    protection: KeyProtection,
}

impl KeyService {
    pub fn new(repo: Arc<dyn KeyRepository>, config: KeyConfig) -> Self {
        let protection = KeyProtection::new(&config);
        Self {
            repo,
            config,
            protection,
        }
    }

    /// Key families this service can generate
    pub fn supported_algorithms(&self) -> &'static [KeyAlgorithm] {
        &KeyAlgorithm::ALL
    }

    /// Generate, protect and persist a key for `owner_id`.
    ///
    /// An empty passphrase stores the key unencrypted.
    pub fn create_key(
        &self,
        owner_id: &str,
        name: &str,
        algorithm: KeyAlgorithm,
        passphrase: &str,
    ) -> Result<KeyLight> {
        let key = PrivateKey::generate(algorithm, &self.config)?;
        let der = key.to_pkcs8_der()?;
        let pem = self.protection.seal(&der, passphrase)?;

        let record = self
            .repo
            .create_key(owner_id, pem.into_bytes(), algorithm, name)?;

        info!(
            key_id = %record.id,
            owner = owner_id,
            algorithm = %algorithm,
            encrypted = !passphrase.is_empty(),
            "created key"
        );
        Ok(KeyLight::from(&record))
    }

    pub fn get_keys_for_user(&self, owner_id: &str) -> Result<Vec<KeyLight>> {
        let records = self.repo.get_keys_for_user(owner_id)?;
        debug!(owner = owner_id, count = records.len(), "listed keys");
        Ok(records.iter().map(KeyLight::from).collect())
    }

    /// Decrypt a stored key for signing. The caller must own it.
    pub fn get_decrypted_key_for_user(
        &self,
        key_id: Uuid,
        owner_id: &str,
        passphrase: &str,
    ) -> Result<PrivateKey> {
        let record = self.get_owned_record(key_id, owner_id)?;

        let der = self.protection.open(&record.data, passphrase)?;
        let key = PrivateKey::from_pkcs8_der(&der)?;

        if key.algorithm() != record.algorithm {
            return Err(Error::ParseError(format!(
                "key {} is tagged {} but holds {}",
                record.id,
                record.algorithm,
                key.algorithm()
            )));
        }

        debug!(key_id = %key_id, owner = owner_id, "decrypted key");
        Ok(key)
    }

    /// The stored PEM blob, byte-for-byte, still encrypted if it was sealed
    /// with a passphrase.
    pub fn get_key_as_pem_for_user(&self, key_id: Uuid, owner_id: &str) -> Result<String> {
        let record = self.get_owned_record(key_id, owner_id)?;
        String::from_utf8(record.data)
            .map_err(|_| Error::ParseError(format!("key {key_id} is not PEM text")))
    }

    fn get_owned_record(&self, key_id: Uuid, owner_id: &str) -> Result<KeyRecord> {
        let record = self.repo.get_key(key_id).map_err(|e| {
            if matches!(e, crate::error::StoreError::NotFound(_)) {
                Error::NotFound(format!("key {key_id}"))
            } else {
                Error::Store(e)
            }
        })?;

        if !is_owner(&record.user_id, owner_id) {
            warn!(key_id = %key_id, caller = owner_id, "key access denied");
            return Err(Error::Unauthorized);
        }
        Ok(record)
    }
}
