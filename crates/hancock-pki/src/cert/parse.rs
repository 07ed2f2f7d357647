//! Decoding stored certificates into caller-facing projections.

use const_oid::db::{rfc4519, rfc5912, rfc8410};
use der::{
    asn1::{Ia5StringRef, PrintableStringRef, TeletexStringRef, Utf8StringRef},
    Decode, Tag, Tagged,
};
use x509_cert::{
    attr::AttributeTypeAndValue,
    certificate::Version,
    ext::pkix::{
        name::GeneralName, AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage,
        SubjectAltName, SubjectKeyIdentifier,
    },
    name::Name,
    Certificate,
};

use crate::{
    cert::{
        template::from_x509_time,
        types::{CertificateRecord, CertificateResponse, PkixName},
        usage::{ext_key_usage_name, key_usage_names},
    },
    error::{PkiError, Result},
};

pub fn parse_certificate(der: &[u8]) -> Result<Certificate> {
    Certificate::from_der(der).map_err(|e| PkiError::ParseError(format!("certificate: {e}")))
}

/// Flatten a distinguished name the way callers expect to read it.
pub fn pkix_name(name: &Name) -> PkixName {
    let mut out = PkixName::default();

    for atv in name.0.iter().flat_map(|rdn| rdn.0.iter()) {
        let Some(value) = attribute_string(atv) else {
            continue;
        };

        match atv.oid {
            oid if oid == rfc4519::CN => out.common_name = value,
            oid if oid == rfc4519::SERIAL_NUMBER => out.serial_number = value,
            oid if oid == rfc4519::C => out.country.push(value),
            oid if oid == rfc4519::O => out.organization.push(value),
            oid if oid == rfc4519::OU => out.organizational_unit.push(value),
            oid if oid == rfc4519::L => out.locality.push(value),
            oid if oid == rfc4519::ST => out.province.push(value),
            oid if oid == rfc4519::STREET => out.street_address.push(value),
            oid if oid == rfc4519::POSTAL_CODE => out.postal_code.push(value),
            _ => {}
        }
    }

    out
}

fn attribute_string(atv: &AttributeTypeAndValue) -> Option<String> {
    let value = &atv.value;
    let s = match value.tag() {
        Tag::Utf8String => Utf8StringRef::try_from(value).ok()?.as_str().to_string(),
        Tag::PrintableString => PrintableStringRef::try_from(value).ok()?.as_str().to_string(),
        Tag::Ia5String => Ia5StringRef::try_from(value).ok()?.as_str().to_string(),
        Tag::TeletexString => TeletexStringRef::try_from(value).ok()?.as_str().to_string(),
        _ => return None,
    };
    Some(s)
}

fn signature_algorithm_name(cert: &Certificate) -> String {
    let oid = cert.signature_algorithm.oid;
    if oid == rfc5912::SHA_256_WITH_RSA_ENCRYPTION {
        "SHA256-RSA".to_string()
    } else if oid == rfc5912::ECDSA_WITH_SHA_512 {
        "ECDSA-SHA512".to_string()
    } else if oid == rfc8410::ID_ED_25519 {
        "Ed25519".to_string()
    } else {
        oid.to_string()
    }
}

fn public_key_algorithm_name(cert: &Certificate) -> String {
    let oid = cert.tbs_certificate.subject_public_key_info.algorithm.oid;
    if oid == rfc5912::RSA_ENCRYPTION {
        "RSA".to_string()
    } else if oid == rfc5912::ID_EC_PUBLIC_KEY {
        "ECDSA".to_string()
    } else if oid == rfc8410::ID_ED_25519 {
        "Ed25519".to_string()
    } else {
        oid.to_string()
    }
}

fn extension<'a, T>(cert: &'a Certificate) -> Result<Option<T>>
where
    T: Decode<'a> + const_oid::AssociatedOid,
{
    cert.tbs_certificate
        .get::<T>()
        .map(|found| found.map(|(_, ext)| ext))
        .map_err(|e| PkiError::ParseError(format!("extension {}: {e}", T::OID)))
}

/// Project a stored record and its decoded certificate into a response.
pub fn project(record: &CertificateRecord) -> Result<CertificateResponse> {
    let cert = parse_certificate(&record.data)?;
    let tbs = &cert.tbs_certificate;

    let version = match tbs.version {
        Version::V1 => 1,
        Version::V2 => 2,
        Version::V3 => 3,
    };

    let (is_ca, path_len) = match extension::<BasicConstraints>(&cert)? {
        Some(bc) => (bc.ca, bc.path_len_constraint),
        None => (false, None),
    };

    let key_usage = extension::<KeyUsage>(&cert)?
        .map(|ku| key_usage_names(&ku))
        .unwrap_or_default();

    let ext_key_usage = extension::<ExtendedKeyUsage>(&cert)?
        .map(|eku| {
            eku.0
                .iter()
                .map(|oid| ext_key_usage_name(oid).to_string())
                .collect()
        })
        .unwrap_or_default();

    let dns_names = extension::<SubjectAltName>(&cert)?
        .map(|san| {
            san.0
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DnsName(dns) => Some(dns.as_str().to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let subject_key_id = extension::<SubjectKeyIdentifier>(&cert)?
        .map(|ski| hex::encode_upper(ski.0.as_bytes()));
    let authority_key_id = extension::<AuthorityKeyIdentifier>(&cert)?
        .and_then(|aki| aki.key_identifier)
        .map(|id| hex::encode_upper(id.as_bytes()));

    Ok(CertificateResponse {
        id: record.id,
        owner_id: record.user_id.clone(),
        name: record.name.clone(),
        cert_type: record.cert_type,
        created_at: record.created_at,
        key_id: record.key_id,
        parent_id: record.parent_id,
        signature_algorithm: signature_algorithm_name(&cert),
        public_key_algorithm: public_key_algorithm_name(&cert),
        version,
        serial_number: hex::encode_upper(tbs.serial_number.as_bytes()),
        issuer: pkix_name(&tbs.issuer),
        subject: pkix_name(&tbs.subject),
        not_before: from_x509_time(tbs.validity.not_before)?,
        not_after: from_x509_time(tbs.validity.not_after)?,
        is_ca,
        max_path_len: path_len.map(i32::from).unwrap_or(-1),
        max_path_len_zero: path_len == Some(0),
        key_usage,
        ext_key_usage,
        dns_names,
        subject_key_id,
        authority_key_id,
    })
}
