//! # Hancock
//!
//! Certificate and key lifecycle engine: owner-scoped private keys with
//! passphrase protection, root and intermediate certificate authorities,
//! leaf issuance.
//!
//! ## Crates
//!
//! - `hancock_crypto` - signature primitives (RSA, ECDSA P-521, Ed25519)
//! - `hancock_key` - key generation, protection and storage
//! - `hancock_pki` - certificate templates, signing and storage

pub use hancock_crypto as crypto;
pub use hancock_key as key;
pub use hancock_pki as pki;
