use serde::{Deserialize, Serialize};

/// Immutable parameters for key generation and at-rest protection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// RSA modulus length in bits
    pub rsa_bits: usize,
    /// PBKDF2-HMAC-SHA256 iteration count for encrypted keys
    pub pbkdf2_iterations: u32,
    /// PBKDF2 salt length in bytes
    pub salt_len: usize,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            rsa_bits: 4096,
            pbkdf2_iterations: 100_000,
            salt_len: 16,
        }
    }
}
