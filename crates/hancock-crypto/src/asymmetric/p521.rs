use p521::{
    ecdsa::{
        signature::{Signer, Verifier},
        Signature, SigningKey, VerifyingKey,
    },
    elliptic_curve::rand_core::OsRng,
    PublicKey, SecretKey,
};
use pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// NIST P-521 key pair signing with ECDSA over SHA-512
pub struct P521 {
    pub inner: SecretKey,
}

impl From<SecretKey> for P521 {
    fn from(value: SecretKey) -> Self {
        Self { inner: value }
    }
}

impl P521 {
    /// Generate a new P-521 key pair
    pub fn generate() -> Result<Self> {
        let secret_key = SecretKey::random(&mut OsRng);
        Ok(secret_key.into())
    }

    /// Import from PKCS8 DER format
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let secret_key = SecretKey::from_pkcs8_der(der)?;
        Ok(secret_key.into())
    }
}

impl P521 {
    /// Export private key to unencrypted PKCS8 DER
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let der = self.inner.to_pkcs8_der()?;
        Ok(Zeroizing::new(der.as_bytes().to_vec()))
    }

    /// Export public key to SPKI DER format
    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let der = self.inner.public_key().to_public_key_der()?;
        Ok(der.as_bytes().to_vec())
    }

    pub fn public_key(&self) -> PublicKey {
        self.inner.public_key()
    }

    /// Sign with ECDSA/SHA-512, returning the DER-encoded `Ecdsa-Sig-Value`
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signing_key = SigningKey::from_bytes(&self.inner.to_bytes())
            .map_err(|e| Error::SigningError(format!("Invalid P521 scalar: {}", e)))?;
        let signature: Signature = signing_key
            .try_sign(message)
            .map_err(|e| Error::SigningError(format!("P521 signing failed: {}", e)))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

/// Verify a DER-encoded ECDSA/SHA-512 signature against an SPKI DER public key
pub fn verify_with_spki_der(spki_der: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
    let public_key = PublicKey::from_public_key_der(spki_der)?;
    let verifying_key = VerifyingKey::from_affine(*public_key.as_affine())
        .map_err(|e| Error::Other(format!("Invalid P521 public key: {}", e)))?;

    let Ok(signature) = Signature::from_der(signature) else {
        return Ok(false);
    };

    Ok(verifying_key.verify(message, &signature).is_ok())
}
