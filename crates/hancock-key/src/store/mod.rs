//! Persistence collaborator for key records.
//!
//! Repositories assign the record id and creation time. They are
//! synchronous and must be safe to share between threads.

mod file;
mod memory;

pub use file::FileKeyRepository;
pub use memory::MemoryKeyRepository;
use uuid::Uuid;

use crate::{algorithm::KeyAlgorithm, error::StoreError, types::KeyRecord};

/// Result type for repository operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait KeyRepository: Send + Sync {
    /// Persist a new key blob for `user_id`
    fn create_key(
        &self,
        user_id: &str,
        data: Vec<u8>,
        algorithm: KeyAlgorithm,
        name: &str,
    ) -> StoreResult<KeyRecord>;

    /// Fetch a key by id; `StoreError::NotFound` when absent
    fn get_key(&self, id: Uuid) -> StoreResult<KeyRecord>;

    /// All keys owned by `user_id`, oldest first
    fn get_keys_for_user(&self, user_id: &str) -> StoreResult<Vec<KeyRecord>>;
}

pub(crate) fn new_record(
    user_id: &str,
    data: Vec<u8>,
    algorithm: KeyAlgorithm,
    name: &str,
) -> KeyRecord {
    KeyRecord {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        algorithm,
        created_at: time::OffsetDateTime::now_utc(),
        data,
    }
}
