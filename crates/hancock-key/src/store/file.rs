use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use uuid::Uuid;

use super::{new_record, KeyRepository, StoreResult};
use crate::{algorithm::KeyAlgorithm, error::StoreError, types::KeyRecord};

/// File-backed key repository: one JSON document per key under `path`.
#[derive(Clone)]
pub struct FileKeyRepository {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl FileKeyRepository {
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

    fn read_record(path: &Path) -> StoreResult<KeyRecord> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl KeyRepository for FileKeyRepository {
    fn create_key(
        &self,
        user_id: &str,
        data: Vec<u8>,
        algorithm: KeyAlgorithm,
        name: &str,
    ) -> StoreResult<KeyRecord> {
        let _guard = self.lock.write().map_err(|_| StoreError::lock_poisoned())?;

        let record = new_record(user_id, data, algorithm, name);
        let record_path = self.record_path(record.id);
        if record_path.exists() {
            return Err(StoreError::AlreadyExists(record.id.to_string()));
        }

        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&record_path, json)?;

        Ok(record)
    }

    fn get_key(&self, id: Uuid) -> StoreResult<KeyRecord> {
        let _guard = self.lock.read().map_err(|_| StoreError::lock_poisoned())?;

        let record_path = self.record_path(id);
        if !record_path.exists() {
            return Err(StoreError::not_found(id));
        }
        Self::read_record(&record_path)
    }

    fn get_keys_for_user(&self, user_id: &str) -> StoreResult<Vec<KeyRecord>> {
        let _guard = self.lock.read().map_err(|_| StoreError::lock_poisoned())?;

        let mut owned = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let record = Self::read_record(&path)?;
            if record.user_id == user_id {
                owned.push(record);
            }
        }
        owned.sort_by_key(|record| record.created_at);
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_repository_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        let created = {
            let repo = FileKeyRepository::new(temp_dir.path()).unwrap();
            repo.create_key("alice", b"pem bytes".to_vec(), KeyAlgorithm::Ed25519, "k1")
                .unwrap()
        };

        let repo = FileKeyRepository::new(temp_dir.path()).unwrap();
        let fetched = repo.get_key(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.data, b"pem bytes");

        assert_eq!(repo.get_keys_for_user("alice").unwrap().len(), 1);
        assert!(repo.get_keys_for_user("bob").unwrap().is_empty());
    }

    #[test]
    fn test_file_repository_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileKeyRepository::new(temp_dir.path().join("keys")).unwrap();

        let err = repo.get_key(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_file_repository_ignores_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.txt"), "not a record").unwrap();

        let repo = FileKeyRepository::new(temp_dir.path()).unwrap();
        assert!(repo.get_keys_for_user("alice").unwrap().is_empty());
    }
}
