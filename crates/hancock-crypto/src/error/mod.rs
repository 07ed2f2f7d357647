use thiserror::Error;

/// Errors raised by the algorithm primitives.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Key generation error: {0}")]
    GenerationError(String),

    #[error("PKCS8 error: {0}")]
    Pkcs8Error(#[from] pkcs8::Error),

    #[error("SPKI error: {0}")]
    SpkiError(#[from] pkcs8::spki::Error),

    #[error("DER error: {0}")]
    DerError(#[from] pkcs8::der::Error),

    #[error("Signing error: {0}")]
    SigningError(String),

    #[error("Unsupported public key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
