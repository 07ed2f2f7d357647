//! At-rest protection of private keys.
//!
//! Keys are stored as PEM-armoured PKCS#8. With a passphrase the PKCS#8
//! document is wrapped in PBES2 (PBKDF2-HMAC-SHA256, AES-256-CBC) and the
//! armour label becomes `ENCRYPTED PRIVATE KEY`, as `openssl pkcs8` emits.

use pkcs8::{pkcs5::pbes2, EncryptedPrivateKeyInfo, PrivateKeyInfo};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::{
    config::KeyConfig,
    error::{Error, Result},
};

pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
pub const ENCRYPTED_PRIVATE_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

const AES_BLOCK_SIZE: usize = 16;

/// Passphrase codec for PKCS#8 private keys
#[derive(Clone, Debug)]
pub struct KeyProtection {
    iterations: u32,
    salt_len: usize,
}

impl KeyProtection {
    pub fn new(config: &KeyConfig) -> Self {
        Self {
            iterations: config.pbkdf2_iterations,
            salt_len: config.salt_len,
        }
    }

    /// Armour a PKCS#8 DER key, encrypting it when `passphrase` is non-empty.
    pub fn seal(&self, pkcs8_der: &[u8], passphrase: &str) -> Result<String> {
        if passphrase.is_empty() {
            return Ok(armour(PRIVATE_KEY_LABEL, pkcs8_der));
        }

        if self.salt_len == 0 || self.iterations == 0 {
            return Err(Error::EncodingError(
                "PBKDF2 salt length and iteration count must be non-zero".to_string(),
            ));
        }

        let mut salt = vec![0u8; self.salt_len];
        let mut iv = [0u8; AES_BLOCK_SIZE];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut iv);

        let params = pbes2::Parameters::pbkdf2_sha256_aes256cbc(self.iterations, &salt, &iv)
            .map_err(|e| Error::EncodingError(e.to_string()))?;

        let info = PrivateKeyInfo::try_from(pkcs8_der)
            .map_err(|e| Error::EncodingError(e.to_string()))?;
        let encrypted = info
            .encrypt_with_params(params, passphrase.as_bytes())
            .map_err(|e| Error::EncodingError(e.to_string()))?;

        Ok(armour(ENCRYPTED_PRIVATE_KEY_LABEL, encrypted.as_bytes()))
    }

    /// Recover the PKCS#8 DER from a stored blob.
    ///
    /// The passphrase is ignored for unencrypted blobs.
    pub fn open(&self, blob: &[u8], passphrase: &str) -> Result<Zeroizing<Vec<u8>>> {
        let pem = pem::parse(blob).map_err(|e| Error::ParseError(format!("Invalid key PEM: {e}")))?;
        let label = pem.tag().to_owned();
        let der = Zeroizing::new(pem.into_contents());

        match label.as_str() {
            PRIVATE_KEY_LABEL => Ok(der),
            ENCRYPTED_PRIVATE_KEY_LABEL => {
                if passphrase.is_empty() {
                    return Err(Error::BadPassphrase);
                }

                let info = EncryptedPrivateKeyInfo::try_from(der.as_slice())
                    .map_err(|e| Error::ParseError(e.to_string()))?;
                let document = info
                    .decrypt(passphrase.as_bytes())
                    .map_err(|_| Error::BadPassphrase)?;

                // CBC padding can survive a wrong key by chance
                PrivateKeyInfo::try_from(document.as_bytes()).map_err(|_| Error::BadPassphrase)?;

                Ok(Zeroizing::new(document.as_bytes().to_vec()))
            }
            other => Err(Error::ParseError(format!("Unexpected PEM label: {other}"))),
        }
    }
}

fn armour(label: &str, der: &[u8]) -> String {
    let config = pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF);
    pem::encode_config(&pem::Pem::new(label, der), config)
}

#[cfg(test)]
pub(crate) fn is_encrypted(blob: &[u8]) -> bool {
    let header = format!("-----BEGIN {ENCRYPTED_PRIVATE_KEY_LABEL}-----");
    blob.starts_with(header.as_bytes())
}
