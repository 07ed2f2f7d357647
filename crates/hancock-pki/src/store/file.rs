use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use hancock_key::{store::StoreResult, StoreError};
use uuid::Uuid;

use super::{duplicate, new_record, type_matches, CertRepository};
use crate::cert::types::{CertificateRecord, CertificateType};

/// File-backed certificate repository: one JSON document per certificate
/// under `path`, the DER base64-encoded.
#[derive(Clone)]
pub struct FileCertRepository {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl FileCertRepository {
    pub fn new(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Ok(Self {
            path,
            lock: Arc::new(RwLock::new(())),
        })
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.path.join(format!("{id}.json"))
    }

    fn read_record(path: &Path) -> StoreResult<CertificateRecord> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn select<F>(&self, predicate: F) -> StoreResult<Vec<CertificateRecord>>
    where
        F: Fn(&CertificateRecord) -> bool,
    {
        let _guard = self.lock.read().map_err(|_| StoreError::lock_poisoned())?;

        let mut selected = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let record = Self::read_record(&path)?;
            if predicate(&record) {
                selected.push(record);
            }
        }
        selected.sort_by_key(|record| record.created_at);
        Ok(selected)
    }
}

impl CertRepository for FileCertRepository {
    fn create_cert(
        &self,
        user_id: &str,
        name: &str,
        data: Vec<u8>,
        cert_type: CertificateType,
        parent_id: Option<Uuid>,
        key_id: Uuid,
    ) -> StoreResult<CertificateRecord> {
        let _guard = self.lock.write().map_err(|_| StoreError::lock_poisoned())?;

        let record = new_record(user_id, name, data, cert_type, parent_id, key_id);
        let record_path = self.record_path(record.id);
        if record_path.exists() {
            return Err(duplicate(record.id));
        }

        fs::write(&record_path, serde_json::to_string_pretty(&record)?)?;
        Ok(record)
    }

    fn get_cert_by_id(&self, id: Uuid) -> StoreResult<CertificateRecord> {
        let _guard = self.lock.read().map_err(|_| StoreError::lock_poisoned())?;

        let record_path = self.record_path(id);
        if !record_path.exists() {
            return Err(StoreError::not_found(id));
        }
        Self::read_record(&record_path)
    }

    fn get_certs_by_user_id(
        &self,
        user_id: &str,
        types: &[CertificateType],
    ) -> StoreResult<Vec<CertificateRecord>> {
        self.select(|r| r.user_id == user_id && type_matches(types, r.cert_type))
    }

    fn get_certs_by_parent_ca(&self, parent_id: Uuid) -> StoreResult<Vec<CertificateRecord>> {
        self.select(|r| r.parent_id == Some(parent_id))
    }

    fn delete_cert_by_id(&self, id: Uuid) -> StoreResult<()> {
        let _guard = self.lock.write().map_err(|_| StoreError::lock_poisoned())?;

        let record_path = self.record_path(id);
        if !record_path.exists() {
            return Err(StoreError::not_found(id));
        }
        fs::remove_file(record_path)?;
        Ok(())
    }
}
