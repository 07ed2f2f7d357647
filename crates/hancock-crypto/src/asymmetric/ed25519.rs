use ed25519_dalek::{
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, KeypairBytes},
    Signature, Signer, SigningKey, VerifyingKey,
};
use zeroize::Zeroizing;

use crate::error::Result;

pub struct Ed25519 {
    pub inner: SigningKey,
}

impl From<SigningKey> for Ed25519 {
    fn from(value: SigningKey) -> Self {
        Self { inner: value }
    }
}

impl Ed25519 {
    pub fn generate() -> Result<Self> {
        let mut rng = rand::rngs::OsRng;
        Ok(SigningKey::generate(&mut rng).into())
    }

    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let signing_key = SigningKey::from_pkcs8_der(der)?;
        Ok(signing_key.into())
    }
}

impl Ed25519 {
    pub fn public_key(&self) -> VerifyingKey {
        self.inner.verifying_key()
    }

    /// PKCS#8 v1 (RFC 8410 `OneAsymmetricKey` without the public key), as
    /// `openssl pkcs8` and Go's `MarshalPKCS8PrivateKey` write it.
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let keypair = KeypairBytes {
            secret_key: self.inner.to_bytes(),
            public_key: None,
        };
        let der = keypair.to_pkcs8_der()?;
        Ok(Zeroizing::new(der.as_bytes().to_vec()))
    }

    pub fn to_spki_der(&self) -> Result<Vec<u8>> {
        let der = self.public_key().to_public_key_der()?;
        Ok(der.as_bytes().to_vec())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.inner.sign(message).to_bytes()
    }
}

/// Verify an Ed25519 signature against an SPKI DER public key
pub fn verify_with_spki_der(spki_der: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
    let verifying_key = VerifyingKey::from_public_key_der(spki_der)?;

    // Signature must be exactly 64 bytes for Ed25519
    let Ok(signature) = Signature::from_slice(signature) else {
        return Ok(false);
    };

    Ok(verifying_key.verify_strict(message, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let key = Ed25519::generate().unwrap();
        let message = b"Hello, Ed25519!";

        let signature = key.sign(message);
        let spki_der = key.to_spki_der().unwrap();

        assert!(verify_with_spki_der(&spki_der, message, &signature).unwrap());
        assert!(!verify_with_spki_der(&spki_der, b"other", &signature).unwrap());
        assert!(!verify_with_spki_der(&spki_der, message, &signature[..32]).unwrap());
    }

    #[test]
    fn test_pkcs8_round_trip() {
        let key = Ed25519::generate().unwrap();
        let der = key.to_pkcs8_der().unwrap();
        let imported = Ed25519::from_pkcs8_der(&der).unwrap();
        assert_eq!(key.inner.to_bytes(), imported.inner.to_bytes());
    }

    #[test]
    fn test_pkcs8_is_v1_without_public_key() {
        let key = Ed25519::generate().unwrap();
        let der = key.to_pkcs8_der().unwrap();

        // SEQUENCE(46) { INTEGER 0, AlgorithmIdentifier, OCTET STRING }
        assert_eq!(der.len(), 48);
        assert_eq!(&der[..5], &[0x30, 0x2e, 0x02, 0x01, 0x00]);
        assert_eq!(&der[16..], key.inner.to_bytes().as_slice());
    }
}
