use std::fmt;

use const_oid::ObjectIdentifier;
use der::asn1::AnyRef;
use hancock_crypto::{Ed25519, Rsa, P521};
use pkcs8::{spki::AlgorithmIdentifierOwned, PrivateKeyInfo};
use zeroize::Zeroizing;

use crate::{
    algorithm::KeyAlgorithm,
    config::KeyConfig,
    error::{Error, Result},
};

/// Signing capability shared by every key family.
pub trait KeySign {
    /// Sign a message with the family's fixed digest.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;

    /// AlgorithmIdentifier describing signatures produced by `sign`.
    fn signature_algorithm_id(&self) -> AlgorithmIdentifierOwned;
}

/// A decrypted private key, tagged by family.
pub enum PrivateKey {
    Ecdsa(P521),
    Ed25519(Ed25519),
    Rsa(Rsa),
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

impl PrivateKey {
    /// Generate a fresh key pair of the given family
    pub fn generate(algorithm: KeyAlgorithm, config: &KeyConfig) -> Result<Self> {
        let key = match algorithm {
            KeyAlgorithm::Ecdsa => P521::generate().map(PrivateKey::Ecdsa),
            KeyAlgorithm::Ed25519 => Ed25519::generate().map(PrivateKey::Ed25519),
            KeyAlgorithm::Rsa => Rsa::generate(config.rsa_bits).map(PrivateKey::Rsa),
        };
        key.map_err(|e| Error::GenerationError(e.to_string()))
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            PrivateKey::Ecdsa(_) => KeyAlgorithm::Ecdsa,
            PrivateKey::Ed25519(_) => KeyAlgorithm::Ed25519,
            PrivateKey::Rsa(_) => KeyAlgorithm::Rsa,
        }
    }

    /// Unencrypted PKCS#8 DER of the private key
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let der = match self {
            PrivateKey::Ecdsa(key) => key.to_pkcs8_der(),
            PrivateKey::Ed25519(key) => key.to_pkcs8_der(),
            PrivateKey::Rsa(key) => key.to_pkcs8_der(),
        };
        der.map_err(|e| Error::EncodingError(e.to_string()))
    }

    /// SubjectPublicKeyInfo DER of the matching public key
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let der = match self {
            PrivateKey::Ecdsa(key) => key.to_spki_der(),
            PrivateKey::Ed25519(key) => key.to_spki_der(),
            PrivateKey::Rsa(key) => key.to_spki_der(),
        };
        der.map_err(|e| Error::EncodingError(e.to_string()))
    }

    /// Parse PKCS#8 DER, recognising the family from the algorithm OID.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let info = PrivateKeyInfo::try_from(der)
            .map_err(|e| Error::ParseError(format!("Failed to parse PKCS#8: {e}")))?;

        let key = match detect_algorithm(&info)? {
            KeyAlgorithm::Ecdsa => P521::from_pkcs8_der(der).map(PrivateKey::Ecdsa),
            KeyAlgorithm::Ed25519 => Ed25519::from_pkcs8_der(der).map(PrivateKey::Ed25519),
            KeyAlgorithm::Rsa => Rsa::from_pkcs8_der(der).map(PrivateKey::Rsa),
        };
        key.map_err(|e| Error::ParseError(e.to_string()))
    }
}

impl KeySign for PrivateKey {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        match self {
            PrivateKey::Ecdsa(key) => key
                .sign(message)
                .map_err(|e| Error::SigningError(e.to_string())),
            PrivateKey::Ed25519(key) => Ok(key.sign(message).to_vec()),
            PrivateKey::Rsa(key) => key
                .sign(message)
                .map_err(|e| Error::SigningError(e.to_string())),
        }
    }

    fn signature_algorithm_id(&self) -> AlgorithmIdentifierOwned {
        match self {
            PrivateKey::Ecdsa(_) => AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_512,
                parameters: None,
            },
            PrivateKey::Ed25519(_) => AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc8410::ID_ED_25519,
                parameters: None,
            },
            // RFC 4055: parameters MUST be NULL
            PrivateKey::Rsa(_) => AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(AnyRef::NULL.into()),
            },
        }
    }
}

fn detect_algorithm(info: &PrivateKeyInfo<'_>) -> Result<KeyAlgorithm> {
    let oid = info.algorithm.oid;

    if oid == const_oid::db::rfc8410::ID_ED_25519 {
        return Ok(KeyAlgorithm::Ed25519);
    }

    if oid == const_oid::db::rfc5912::RSA_ENCRYPTION {
        return Ok(KeyAlgorithm::Rsa);
    }

    if oid == const_oid::db::rfc5912::ID_EC_PUBLIC_KEY {
        let params = info
            .algorithm
            .parameters
            .ok_or_else(|| Error::ParseError("EC key is missing curve parameters".to_string()))?;
        let curve_oid = parse_curve_oid(params)?;
        if curve_oid == const_oid::db::rfc5912::SECP_521_R_1 {
            return Ok(KeyAlgorithm::Ecdsa);
        }
        return Err(Error::UnsupportedAlgorithm(format!("EC curve {curve_oid}")));
    }

    Err(Error::UnsupportedAlgorithm(oid.to_string()))
}

fn parse_curve_oid(any: AnyRef<'_>) -> Result<ObjectIdentifier> {
    ObjectIdentifier::try_from(any)
        .map_err(|e| Error::ParseError(format!("Failed to parse curve OID: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> KeyConfig {
        KeyConfig {
            rsa_bits: 2048,
            ..KeyConfig::default()
        }
    }

    #[test]
    fn test_generate_and_reload_each_family() {
        for algorithm in KeyAlgorithm::ALL {
            let key = PrivateKey::generate(algorithm, &test_config()).unwrap();
            assert_eq!(key.algorithm(), algorithm);

            let der = key.to_pkcs8_der().unwrap();
            let reloaded = PrivateKey::from_pkcs8_der(&der).unwrap();
            assert_eq!(reloaded.algorithm(), algorithm);
            assert_eq!(reloaded.public_key_der().unwrap(), key.public_key_der().unwrap());
        }
    }

    #[test]
    fn test_pkcs8_is_version_one_for_every_family() {
        for algorithm in KeyAlgorithm::ALL {
            let key = PrivateKey::generate(algorithm, &test_config()).unwrap();
            let der = key.to_pkcs8_der().unwrap();
            let info = PrivateKeyInfo::try_from(der.as_slice()).unwrap();
            assert_eq!(info.version(), pkcs8::Version::V1, "{algorithm}");
            assert!(info.public_key.is_none(), "{algorithm}");
        }
    }

    #[test]
    fn test_signatures_verify_under_public_key() {
        for algorithm in KeyAlgorithm::ALL {
            let key = PrivateKey::generate(algorithm, &test_config()).unwrap();
            let message = b"to be signed";
            let signature = key.sign(message).unwrap();
            let spki = key.public_key_der().unwrap();
            assert!(hancock_crypto::verify_signature(&spki, message, &signature).unwrap());
        }
    }

    #[test]
    fn test_signature_algorithm_ids() {
        let key = PrivateKey::generate(KeyAlgorithm::Ed25519, &test_config()).unwrap();
        let id = key.signature_algorithm_id();
        assert_eq!(id.oid, const_oid::db::rfc8410::ID_ED_25519);
        assert!(id.parameters.is_none());
    }

    #[test]
    fn test_garbage_der_is_parse_error() {
        let err = PrivateKey::from_pkcs8_der(b"definitely not pkcs8").unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
