use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use hancock_key::{store::StoreResult, StoreError};
use uuid::Uuid;

use super::{duplicate, new_record, type_matches, CertRepository};
use crate::cert::types::{CertificateRecord, CertificateType};

/// In-memory certificate repository
#[derive(Clone, Default)]
pub struct MemoryCertRepository {
    certs: Arc<RwLock<HashMap<Uuid, CertificateRecord>>>,
}

impl MemoryCertRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select<F>(&self, predicate: F) -> StoreResult<Vec<CertificateRecord>>
    where
        F: Fn(&CertificateRecord) -> bool,
    {
        let certs = self.certs.read().map_err(|_| StoreError::lock_poisoned())?;

        let mut selected: Vec<CertificateRecord> =
            certs.values().filter(|r| predicate(r)).cloned().collect();
        selected.sort_by_key(|record| record.created_at);
        Ok(selected)
    }
}

impl CertRepository for MemoryCertRepository {
    fn create_cert(
        &self,
        user_id: &str,
        name: &str,
        data: Vec<u8>,
        cert_type: CertificateType,
        parent_id: Option<Uuid>,
        key_id: Uuid,
    ) -> StoreResult<CertificateRecord> {
        let mut certs = self.certs.write().map_err(|_| StoreError::lock_poisoned())?;

        let record = new_record(user_id, name, data, cert_type, parent_id, key_id);
        if certs.contains_key(&record.id) {
            return Err(duplicate(record.id));
        }

        certs.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_cert_by_id(&self, id: Uuid) -> StoreResult<CertificateRecord> {
        let certs = self.certs.read().map_err(|_| StoreError::lock_poisoned())?;

        certs.get(&id).cloned().ok_or_else(|| StoreError::not_found(id))
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
        let mut certs = self.certs.write().map_err(|_| StoreError::lock_poisoned())?;

        certs
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(id))
    }
}
