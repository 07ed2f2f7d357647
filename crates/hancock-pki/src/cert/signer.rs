use der::{
    asn1::{BitString, Ia5String, OctetString},
    Decode, Encode,
};
use hancock_crypto::key_identifier;
use hancock_key::{KeySign, PrivateKey};
use x509_cert::{
    certificate::{Certificate, TbsCertificate, Version},
    ext::{
        pkix::{
            name::GeneralName, AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage,
            SubjectAltName, SubjectKeyIdentifier,
        },
        AsExtension, Extension,
    },
    spki::SubjectPublicKeyInfoOwned,
};

use crate::{
    cert::template::CertificateTemplate,
    error::{PkiError, Result},
};

/// Sign `template` for the subject key `subject_spki_der`.
///
/// Without a parent the certificate is self-signed: the signing key must
/// be the subject key. With a parent, the issuer is the parent's subject
/// and the signing key must match the parent's public key.
pub fn sign_certificate(
    template: &CertificateTemplate,
    subject_spki_der: &[u8],
    signing_key: &PrivateKey,
    parent: Option<&Certificate>,
) -> Result<Vec<u8>> {
    let subject_public_key = SubjectPublicKeyInfoOwned::from_der(subject_spki_der)
        .map_err(|e| PkiError::SigningError(format!("invalid subject public key: {e}")))?;
    let signer_spki_der = signing_key.public_key_der()?;

    let (issuer, authority_key_id) = match parent {
        None => {
            if signer_spki_der != subject_spki_der {
                return Err(PkiError::SigningError(
                    "self-signed certificate must be signed by its own key".to_string(),
                ));
            }
            (
                template.subject.clone(),
                subject_key_id(&subject_public_key),
            )
        }
        Some(parent) => {
            let parent_tbs = &parent.tbs_certificate;
            if parent_tbs.subject_public_key_info.to_der()? != signer_spki_der {
                return Err(PkiError::SigningError(
                    "signing key does not match the issuer certificate".to_string(),
                ));
            }
            (parent_tbs.subject.clone(), issuer_key_id(parent)?)
        }
    };

    let extensions = build_extensions(template, &subject_public_key, authority_key_id)?;
    let algorithm = signing_key.signature_algorithm_id();

    let tbs_certificate = TbsCertificate {
        version: Version::V3,
        serial_number: template.serial_number.clone(),
        signature: algorithm.clone(),
        issuer,
        validity: template.validity()?,
        subject: template.subject.clone(),
        subject_public_key_info: subject_public_key,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: Some(extensions),
    };

    let tbs_der = tbs_certificate.to_der()?;
    let signature = signing_key
        .sign(&tbs_der)
        .map_err(|e| PkiError::SigningError(e.to_string()))?;

    let certificate = Certificate {
        tbs_certificate,
        signature_algorithm: algorithm,
        signature: BitString::from_bytes(&signature)?,
    };

    Ok(certificate.to_der()?)
}

fn subject_key_id(spki: &SubjectPublicKeyInfoOwned) -> Vec<u8> {
    key_identifier(spki.subject_public_key.raw_bytes()).to_vec()
}

/// The issuer's own SKI when it carries one, otherwise derived from its key
fn issuer_key_id(issuer: &Certificate) -> Result<Vec<u8>> {
    let declared = issuer
        .tbs_certificate
        .get::<SubjectKeyIdentifier>()
        .map_err(|e| PkiError::ParseError(format!("issuer subject key identifier: {e}")))?;

    Ok(match declared {
        Some((_, ski)) => ski.0.into_bytes(),
        None => subject_key_id(&issuer.tbs_certificate.subject_public_key_info),
    })
}

fn build_extensions(
    template: &CertificateTemplate,
    subject_public_key: &SubjectPublicKeyInfoOwned,
    authority_key_id: Vec<u8>,
) -> Result<Vec<Extension>> {
    let subject = &template.subject;
    let mut extensions: Vec<Extension> = Vec::new();

    let basic_constraints = BasicConstraints {
        ca: template.is_ca,
        path_len_constraint: if template.is_ca {
            template.max_path_len
        } else {
            None
        },
    };
    extensions.push(basic_constraints.to_extension(subject, &extensions)?);

    if template.usages.has_key_usage() {
        let key_usage = template.usages.key_usage;
        extensions.push(key_usage.to_extension(subject, &extensions)?);
    }

    if !template.usages.ext_key_usage.is_empty() {
        let eku = ExtendedKeyUsage(template.usages.ext_key_usage.clone());
        extensions.push(eku.to_extension(subject, &extensions)?);
    }

    let ski = SubjectKeyIdentifier(OctetString::new(subject_key_id(subject_public_key))?);
    extensions.push(ski.to_extension(subject, &extensions)?);

    let aki = AuthorityKeyIdentifier {
        key_identifier: Some(OctetString::new(authority_key_id)?),
        ..Default::default()
    };
    extensions.push(aki.to_extension(subject, &extensions)?);

    if !template.dns_names.is_empty() {
        let names = template
            .dns_names
            .iter()
            .map(|name| {
                Ia5String::new(name)
                    .map(GeneralName::DnsName)
                    .map_err(|_| PkiError::InvalidSubject(format!("invalid DNS name {name:?}")))
            })
            .collect::<Result<Vec<_>>>()?;
        extensions.push(SubjectAltName(names).to_extension(subject, &extensions)?);
    }

    Ok(extensions)
}
