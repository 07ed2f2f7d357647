use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{traits::PublicKeyParts, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

pub struct Rsa {
    pub inner: RsaPrivateKey,
}

impl From<RsaPrivateKey> for Rsa {
    fn from(value: RsaPrivateKey) -> Self {
        Self { inner: value }
    }
}

impl Rsa {
    /// Generate a new RSA key pair with the given modulus length in bits
    pub fn generate(bits: usize) -> Result<Self> {
        let mut rng = rand::rngs::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| Error::GenerationError(format!("Failed to generate RSA key: {}", e)))?;
        Ok(private_key.into())
    }

    /// Import from PKCS8 DER format
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_der(der)?;
        Ok(private_key.into())
    }
}

impl Rsa {
    /// Export private key to unencrypted PKCS8 DER
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let der = self.inner.to_pkcs8_der()?;
        Ok(Zeroizing::new(der.as_bytes().to_vec()))
    }

    /// Export public key to SPKI DER format
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let der = self.inner.to_public_key().to_public_key_der()?;
        Ok(der.as_bytes().to_vec())
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.inner.to_public_key()
    }

    /// Key size in bits
    pub fn size(&self) -> usize {
        self.inner.size() * 8
    }

    /// Sign data using PKCS#1 v1.5 with SHA-256
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let mut rng = rand::rngs::OsRng;
        let hashed = Sha256::digest(message);
        let signature = self
            .inner
            .sign_with_rng(&mut rng, rsa::Pkcs1v15Sign::new::<Sha256>(), &hashed)
            .map_err(|e| Error::SigningError(format!("RSA signing failed: {}", e)))?;
        Ok(signature)
    }
}

/// Verify a PKCS#1 v1.5 SHA-256 signature against an SPKI DER public key
pub fn verify_with_spki_der(spki_der: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
    let public_key = RsaPublicKey::from_public_key_der(spki_der)?;

    let hashed = Sha256::digest(message);
    Ok(public_key
        .verify(rsa::Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
        .is_ok())
}
