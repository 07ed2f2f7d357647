use hancock_key::StoreError;
use hancock_pki::PkiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key error: {0}")]
    Key(#[from] hancock_key::Error),

    #[error("Certificate error: {0}")]
    Pki(#[from] PkiError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Message shown to the user. Missing and foreign resources read the
    /// same so one user cannot probe for another's ids.
    pub fn user_message(&self) -> String {
        let denied = match self {
            CliError::Key(e) => e.is_access_denied(),
            CliError::Pki(e) => e.is_access_denied(),
            _ => false,
        };
        if denied {
            "resource not found".to_string()
        } else {
            self.to_string()
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
