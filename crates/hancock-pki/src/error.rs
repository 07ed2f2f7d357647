use hancock_key::StoreError;
use thiserror::Error;

/// Errors raised while building, signing, parsing or managing certificates.
#[derive(Error, Debug)]
pub enum PkiError {
    /// Failure in the key lifecycle, kind preserved
    #[error(transparent)]
    Key(#[from] hancock_key::Error),

    #[error("Invalid key usage: {0}")]
    InvalidKeyUsage(String),

    #[error("Invalid certificate type: {0}")]
    InvalidCertificateType(String),

    #[error("Invalid subject: {0}")]
    InvalidSubject(String),

    #[error("Invalid validity: {0}")]
    InvalidValidity(String),

    #[error("Not a certificate authority: {0}")]
    NotCertificateAuthority(String),

    #[error("Path length constraint exceeded: {0}")]
    PathLengthExceeded(String),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl PkiError {
    pub fn is_not_found(&self) -> bool {
        match self {
            PkiError::NotFound(_) | PkiError::Store(StoreError::NotFound(_)) => true,
            PkiError::Key(e) => e.is_not_found(),
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        match self {
            PkiError::Unauthorized => true,
            PkiError::Key(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// "Missing" and "not yours" collapse into one outcome for callers that
    /// must not reveal which it was.
    pub fn is_access_denied(&self) -> bool {
        self.is_not_found() || self.is_unauthorized()
    }
}

impl From<der::Error> for PkiError {
    fn from(err: der::Error) -> Self {
        PkiError::EncodingError(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PkiError>;
