//! Mapping between usage names and the KeyUsage / ExtendedKeyUsage
//! extensions.
//!
//! A single list of names carries both kinds; each name resolves to either
//! a key usage bit or an extended key usage purpose.

use const_oid::{db::rfc5280, ObjectIdentifier};
use x509_cert::ext::pkix::{KeyUsage, KeyUsages};

use crate::error::{PkiError, Result};

pub const ID_KP_IPSEC_END_SYSTEM: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.5");
pub const ID_KP_IPSEC_TUNNEL: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.6");
pub const ID_KP_IPSEC_USER: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.7");

const KEY_USAGE_NAMES: [(&str, KeyUsages); 9] = [
    ("digitalSignature", KeyUsages::DigitalSignature),
    ("contentCommitment", KeyUsages::NonRepudiation),
    ("keyEncipherment", KeyUsages::KeyEncipherment),
    ("dataEncipherment", KeyUsages::DataEncipherment),
    ("keyAgreement", KeyUsages::KeyAgreement),
    ("certSign", KeyUsages::KeyCertSign),
    ("crlSign", KeyUsages::CRLSign),
    ("encipherOnly", KeyUsages::EncipherOnly),
    ("decipherOnly", KeyUsages::DecipherOnly),
];

/// Canonical names, used for both input and output.
const EXT_KEY_USAGE_NAMES: [(&str, ObjectIdentifier); 10] = [
    ("any", rfc5280::ANY_EXTENDED_KEY_USAGE),
    ("serverAuth", rfc5280::ID_KP_SERVER_AUTH),
    ("clientAuth", rfc5280::ID_KP_CLIENT_AUTH),
    ("codeSigning", rfc5280::ID_KP_CODE_SIGNING),
    ("emailProtection", rfc5280::ID_KP_EMAIL_PROTECTION),
    ("ipsecEndSystem", ID_KP_IPSEC_END_SYSTEM),
    ("ipsecTunnel", ID_KP_IPSEC_TUNNEL),
    ("ipsecUser", ID_KP_IPSEC_USER),
    ("timeStamping", rfc5280::ID_KP_TIME_STAMPING),
    ("ocspSigning", rfc5280::ID_KP_OCSP_SIGNING),
];

/// Legacy snake_case input spellings
const EXT_KEY_USAGE_ALIASES: [(&str, ObjectIdentifier); 3] = [
    ("ipsec_end_system", ID_KP_IPSEC_END_SYSTEM),
    ("ipsec_tunnel", ID_KP_IPSEC_TUNNEL),
    ("ipsec_user", ID_KP_IPSEC_USER),
];

/// Usage names resolved into extension values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Usages {
    pub key_usage: KeyUsage,
    pub ext_key_usage: Vec<ObjectIdentifier>,
}

impl Default for Usages {
    fn default() -> Self {
        Self {
            key_usage: KeyUsage(Default::default()),
            ext_key_usage: Vec::new(),
        }
    }
}

impl Usages {
    /// Fixed usages of every CA: certificate and CRL signing, any purpose.
    pub fn certificate_authority() -> Self {
        Self {
            key_usage: KeyUsage(KeyUsages::KeyCertSign | KeyUsages::CRLSign),
            ext_key_usage: vec![rfc5280::ANY_EXTENDED_KEY_USAGE],
        }
    }

    /// Resolve caller-supplied names. Duplicates are folded; the first
    /// unrecognised name fails the whole list. `any` is not accepted here.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut usages = Usages::default();

        for name in names {
            let name = name.as_ref();

            if let Some((_, bit)) = KEY_USAGE_NAMES.iter().find(|(n, _)| *n == name) {
                usages.key_usage.0 |= *bit;
                continue;
            }

            let purpose = EXT_KEY_USAGE_NAMES
                .iter()
                .skip(1)
                .chain(EXT_KEY_USAGE_ALIASES.iter())
                .find(|(n, _)| *n == name)
                .map(|(_, oid)| *oid)
                .ok_or_else(|| PkiError::InvalidKeyUsage(name.to_string()))?;

            if !usages.ext_key_usage.contains(&purpose) {
                usages.ext_key_usage.push(purpose);
            }
        }

        Ok(usages)
    }

    pub fn has_key_usage(&self) -> bool {
        !self.key_usage.0.is_empty()
    }
}

/// Names of the bits set in a KeyUsage, in bit order
pub fn key_usage_names(key_usage: &KeyUsage) -> Vec<String> {
    KEY_USAGE_NAMES
        .iter()
        .filter(|(_, bit)| key_usage.0.contains(*bit))
        .map(|(name, _)| name.to_string())
        .collect()
}

pub fn ext_key_usage_name(oid: &ObjectIdentifier) -> &'static str {
    EXT_KEY_USAGE_NAMES
        .iter()
        .find(|(_, known)| known == oid)
        .map(|(name, _)| *name)
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_list() {
        let usages = Usages::parse(&["digitalSignature", "keyEncipherment", "serverAuth"]).unwrap();
        assert!(usages.key_usage.digital_signature());
        assert!(usages.key_usage.key_encipherment());
        assert!(!usages.key_usage.key_cert_sign());
        assert_eq!(usages.ext_key_usage, vec![rfc5280::ID_KP_SERVER_AUTH]);
    }

    #[test]
    fn test_names_round_trip() {
        let names: Vec<&str> = KEY_USAGE_NAMES.iter().map(|(n, _)| *n).collect();
        let usages = Usages::parse(&names).unwrap();
        assert_eq!(key_usage_names(&usages.key_usage), names);

        let ext: Vec<&str> = EXT_KEY_USAGE_NAMES.iter().skip(1).map(|(n, _)| *n).collect();
        let usages = Usages::parse(&ext).unwrap();
        let back: Vec<&str> = usages.ext_key_usage.iter().map(ext_key_usage_name).collect();
        assert_eq!(back, ext);
    }

    #[test]
    fn test_ipsec_aliases() {
        let usages = Usages::parse(&["ipsec_end_system", "ipsecTunnel", "ipsec_user"]).unwrap();
        let names: Vec<&str> = usages.ext_key_usage.iter().map(ext_key_usage_name).collect();
        assert_eq!(names, vec!["ipsecEndSystem", "ipsecTunnel", "ipsecUser"]);
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = Usages::parse(&["digitalSignature", "bogus"]).unwrap_err();
        assert!(matches!(err, PkiError::InvalidKeyUsage(name) if name == "bogus"));

        assert!(Usages::parse(&["any"]).is_err());
    }

    #[test]
    fn test_empty_and_duplicates() {
        let usages = Usages::parse::<&str>(&[]).unwrap();
        assert!(!usages.has_key_usage());
        assert!(usages.ext_key_usage.is_empty());

        let usages = Usages::parse(&["clientAuth", "clientAuth"]).unwrap();
        assert_eq!(usages.ext_key_usage.len(), 1);
    }

    #[test]
    fn test_ca_usages() {
        let usages = Usages::certificate_authority();
        assert_eq!(key_usage_names(&usages.key_usage), vec!["certSign", "crlSign"]);
        assert_eq!(ext_key_usage_name(&usages.ext_key_usage[0]), "any");
        assert_eq!(
            ext_key_usage_name(&ObjectIdentifier::new_unwrap("1.2.3.4")),
            "unknown"
        );
    }
}
