//! Key lifecycle for Hancock: typed private keys, passphrase protection,
//! owner-scoped persistence.

pub mod access;
pub mod algorithm;
pub mod config;
pub mod error;
pub mod key;
pub mod protection;
pub mod service;
pub mod store;
pub mod types;

pub use access::is_owner;
pub use algorithm::KeyAlgorithm;
pub use config::KeyConfig;
pub use error::{Error, Result, StoreError};
pub use key::{KeySign, PrivateKey};
pub use protection::KeyProtection;
pub use service::KeyService;
pub use store::{FileKeyRepository, KeyRepository, MemoryKeyRepository};
pub use types::{KeyLight, KeyRecord};
