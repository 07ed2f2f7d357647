//! Asymmetric signature algorithms
//!
//! RSA (PKCS#1 v1.5 / SHA-256), ECDSA over P-521 (SHA-512) and Ed25519.

pub mod ed25519;
pub mod p521;
pub mod rsa;

pub use ed25519::Ed25519;
pub use p521::P521;
pub use rsa::Rsa;

use pkcs8::{der::Decode, spki::SubjectPublicKeyInfoRef};

use crate::error::{Error, Result};

/// Verify a signature by dispatching on the algorithm carried in the SPKI.
///
/// Returns `Ok(false)` when the signature does not match and an error when
/// the public key itself cannot be decoded or uses an unknown algorithm.
pub fn verify_signature(spki_der: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
    let spki = SubjectPublicKeyInfoRef::from_der(spki_der)?;
    let oid = spki.algorithm.oid;

    if oid == const_oid::db::rfc5912::RSA_ENCRYPTION {
        rsa::verify_with_spki_der(spki_der, message, signature)
    } else if oid == const_oid::db::rfc5912::ID_EC_PUBLIC_KEY {
        p521::verify_with_spki_der(spki_der, message, signature)
    } else if oid == const_oid::db::rfc8410::ID_ED_25519 {
        ed25519::verify_with_spki_der(spki_der, message, signature)
    } else {
        Err(Error::UnsupportedAlgorithm(oid.to_string()))
    }
}
