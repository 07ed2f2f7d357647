mod store;

pub use store::StoreError;
use thiserror::Error;

/// Errors raised by key generation, protection and lifecycle operations.
///
/// Messages never carry passphrases or key material.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Key generation error: {0}")]
    GenerationError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Wrong passphrase for an encrypted key, or an encrypted key
    /// presented without one.
    #[error("Bad passphrase")]
    BadPassphrase,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Store(StoreError::NotFound(_)))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }

    /// True for both "missing" and "not yours", which callers must not
    /// distinguish in user-facing responses.
    pub fn is_access_denied(&self) -> bool {
        self.is_not_found() || self.is_unauthorized()
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
