//! Hancock Cryptography Library
//!
//! Thin wrappers over the RustCrypto primitives used by the Hancock
//! certificate engine: key generation, PKCS#8/SPKI encoding, signing and
//! signature verification for RSA, ECDSA P-521 and Ed25519.

pub mod error;

pub mod asymmetric;
pub mod hash;

pub use asymmetric::{ed25519::Ed25519, p521::P521, rsa::Rsa, verify_signature};
pub use error::{Error, Result};
pub use hash::{key_identifier, sha256};
