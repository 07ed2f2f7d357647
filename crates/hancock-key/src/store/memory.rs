use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use uuid::Uuid;

use super::{new_record, KeyRepository, StoreResult};
use crate::{algorithm::KeyAlgorithm, error::StoreError, types::KeyRecord};

type KeyStorage = Arc<RwLock<HashMap<Uuid, KeyRecord>>>;

/// In-memory key repository
#[derive(Clone, Default)]
pub struct MemoryKeyRepository {
    keys: KeyStorage,
}

impl MemoryKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyRepository for MemoryKeyRepository {
    fn create_key(
        &self,
        user_id: &str,
        data: Vec<u8>,
        algorithm: KeyAlgorithm,
        name: &str,
    ) -> StoreResult<KeyRecord> {
        let mut keys = self.keys.write().map_err(|_| StoreError::lock_poisoned())?;

        let record = new_record(user_id, data, algorithm, name);
        if keys.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id.to_string()));
        }

        keys.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_key(&self, id: Uuid) -> StoreResult<KeyRecord> {
        let keys = self.keys.read().map_err(|_| StoreError::lock_poisoned())?;

        keys.get(&id).cloned().ok_or_else(|| StoreError::not_found(id))
    }

    fn get_keys_for_user(&self, user_id: &str) -> StoreResult<Vec<KeyRecord>> {
        let keys = self.keys.read().map_err(|_| StoreError::lock_poisoned())?;

        let mut owned: Vec<KeyRecord> = keys
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|record| record.created_at);
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_repository_basic_operations() {
        let repo = MemoryKeyRepository::new();

        let created = repo
            .create_key("alice", b"blob".to_vec(), KeyAlgorithm::Rsa, "first")
            .unwrap();
        assert_eq!(created.user_id, "alice");
        assert_eq!(created.name, "first");

        let fetched = repo.get_key(created.id).unwrap();
        assert_eq!(fetched, created);

        repo.create_key("bob", b"other".to_vec(), KeyAlgorithm::Ecdsa, "bobs")
            .unwrap();

        let alice_keys = repo.get_keys_for_user("alice").unwrap();
        assert_eq!(alice_keys.len(), 1);
        assert_eq!(alice_keys[0].id, created.id);
        assert!(repo.get_keys_for_user("carol").unwrap().is_empty());
    }

    #[test]
    fn test_memory_repository_missing_key() {
        let repo = MemoryKeyRepository::new();
        let err = repo.get_key(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
