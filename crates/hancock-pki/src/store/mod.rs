//! Persistence collaborator for certificate records.
//!
//! Lookups by parent are not scoped to an owner; callers filter.

mod file;
mod memory;

pub use file::FileCertRepository;
use hancock_key::{store::StoreResult, StoreError};
pub use memory::MemoryCertRepository;
use uuid::Uuid;

use crate::cert::types::{CertificateRecord, CertificateType};

pub trait CertRepository: Send + Sync {
    fn create_cert(
        &self,
        user_id: &str,
        name: &str,
        data: Vec<u8>,
        cert_type: CertificateType,
        parent_id: Option<Uuid>,
        key_id: Uuid,
    ) -> StoreResult<CertificateRecord>;

    /// `StoreError::NotFound` when absent
    fn get_cert_by_id(&self, id: Uuid) -> StoreResult<CertificateRecord>;

    /// Certificates of `user_id` whose type is in `types`; an empty slice
    /// matches every type. Oldest first.
    fn get_certs_by_user_id(
        &self,
        user_id: &str,
        types: &[CertificateType],
    ) -> StoreResult<Vec<CertificateRecord>>;

    /// Certificates issued under `parent_id`, regardless of owner
    fn get_certs_by_parent_ca(&self, parent_id: Uuid) -> StoreResult<Vec<CertificateRecord>>;

    fn get_key_id_by_cert_id(&self, id: Uuid) -> StoreResult<Uuid> {
        self.get_cert_by_id(id).map(|record| record.key_id)
    }

    fn delete_cert_by_id(&self, id: Uuid) -> StoreResult<()>;
}

pub(crate) fn new_record(
    user_id: &str,
    name: &str,
    data: Vec<u8>,
    cert_type: CertificateType,
    parent_id: Option<Uuid>,
    key_id: Uuid,
) -> CertificateRecord {
    CertificateRecord {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        cert_type,
        created_at: time::OffsetDateTime::now_utc(),
        key_id,
        parent_id,
        data,
    }
}

pub(crate) fn type_matches(types: &[CertificateType], cert_type: CertificateType) -> bool {
    types.is_empty() || types.contains(&cert_type)
}

pub(crate) fn duplicate(id: Uuid) -> StoreError {
    StoreError::AlreadyExists(id.to_string())
}
