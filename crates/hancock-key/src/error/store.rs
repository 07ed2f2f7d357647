use thiserror::Error;

/// Failures reported by repository backends. Propagated to callers unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl StoreError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        StoreError::NotFound(id.to_string())
    }

    pub fn lock_poisoned() -> Self {
        StoreError::Lock("lock poisoned".to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
