//! Digest helpers used for key identifiers and fingerprints

use sha2::{Digest, Sha256};

/// Compute SHA-256 of data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Key identifier per RFC 7093 section 2 method 1: the leftmost 160 bits
/// of the SHA-256 hash of the subjectPublicKey bit string.
pub fn key_identifier(subject_public_key: &[u8]) -> [u8; 20] {
    let digest = sha256(subject_public_key);
    let mut id = [0u8; 20];
    id.copy_from_slice(&digest[..20]);
    id
}
