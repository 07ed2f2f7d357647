//! Certificate descriptors: everything that goes into a TBSCertificate
//! except the keys and the issuer.

use std::time::Duration;

use const_oid::{db::rfc4519, ObjectIdentifier};
use der::asn1::{Any, GeneralizedTime, PrintableStringRef, SetOfVec, UtcTime, Utf8StringRef};
use rand::RngCore;
use time::OffsetDateTime;
use x509_cert::{
    attr::AttributeTypeAndValue,
    name::{Name, RdnSequence, RelativeDistinguishedName},
    serial_number::SerialNumber,
    time::{Time, Validity},
};

use crate::{
    cert::{
        types::{CertificateType, Subject},
        usage::Usages,
    },
    config::{PkiConfig, SerialNumberPolicy},
    error::{PkiError, Result},
};

/// Canonical description of a certificate to be signed.
#[derive(Clone, Debug)]
pub struct CertificateTemplate {
    pub serial_number: SerialNumber,
    pub subject: Name,
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
    pub is_ca: bool,
    /// Only meaningful when `is_ca`; `Some(0)` is an explicit zero.
    pub max_path_len: Option<u8>,
    pub usages: Usages,
    pub dns_names: Vec<String>,
}

impl CertificateTemplate {
    /// Build the descriptor for a certificate of `cert_type`.
    ///
    /// CA types get the fixed CA usages and ignore `usage_names` and
    /// `sans`. Leaf certificates carry the named usages and the SANs plus
    /// the common name as DNS names.
    pub fn build<S: AsRef<str>>(
        subject: &Subject,
        cert_type: CertificateType,
        not_after: OffsetDateTime,
        usage_names: &[S],
        sans: &[S],
        config: &PkiConfig,
    ) -> Result<Self> {
        if subject.common_name.trim().is_empty() {
            return Err(PkiError::InvalidSubject(
                "common name must not be empty".to_string(),
            ));
        }

        let not_before = truncate_to_seconds(OffsetDateTime::now_utc());
        let not_after = truncate_to_seconds(not_after);
        if not_after <= not_before {
            return Err(PkiError::InvalidValidity(format!(
                "expiration {not_after} is not after {not_before}"
            )));
        }

        let (is_ca, max_path_len, usages, dns_names) = match cert_type {
            CertificateType::RootCa => (
                true,
                Some(config.root_max_path_len),
                Usages::certificate_authority(),
                Vec::new(),
            ),
            CertificateType::IntermediateCa => {
                (true, Some(0), Usages::certificate_authority(), Vec::new())
            }
            CertificateType::Certificate => (
                false,
                None,
                Usages::parse(usage_names)?,
                subject_alt_names(sans, &subject.common_name),
            ),
        };

        Ok(Self {
            serial_number: serial_number(config.serial_number)?,
            subject: encode_name(subject)?,
            not_before,
            not_after,
            is_ca,
            max_path_len,
            usages,
            dns_names,
        })
    }

    pub fn validity(&self) -> Result<Validity> {
        Ok(Validity {
            not_before: to_x509_time(self.not_before)?,
            not_after: to_x509_time(self.not_after)?,
        })
    }
}

fn truncate_to_seconds(t: OffsetDateTime) -> OffsetDateTime {
    t.replace_nanosecond(0).unwrap_or(t)
}

/// SANs in first-seen order, then the common name if not already listed.
fn subject_alt_names<S: AsRef<str>>(sans: &[S], common_name: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(sans.len() + 1);
    let candidates = sans.iter().map(AsRef::as_ref).chain([common_name]);
    for name in candidates {
        let name = name.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn serial_number(policy: SerialNumberPolicy) -> Result<SerialNumber> {
    match policy {
        SerialNumberPolicy::Fixed => Ok(SerialNumber::from(1u8)),
        SerialNumberPolicy::Random => {
            let mut bytes = [0u8; 16];
            rand::thread_rng().fill_bytes(&mut bytes);
            // positive and never shortened below 16 bytes
            bytes[0] &= 0x7F;
            bytes[0] |= 0x01;
            Ok(SerialNumber::new(&bytes)?)
        }
    }
}

/// Encode subject attributes as a distinguished name. Attribute order is
/// C, O, L, ST, STREET, postalCode, CN.
pub fn encode_name(subject: &Subject) -> Result<Name> {
    let attributes = [
        (rfc4519::C, subject.country.as_str()),
        (rfc4519::O, subject.organization.as_str()),
        (rfc4519::L, subject.locality.as_str()),
        (rfc4519::ST, subject.province.as_str()),
        (rfc4519::STREET, subject.street_address.as_str()),
        (rfc4519::POSTAL_CODE, subject.postal_code.as_str()),
        (rfc4519::CN, subject.common_name.as_str()),
    ];

    let mut rdns = Vec::new();
    for (oid, value) in attributes {
        if value.is_empty() {
            continue;
        }
        let atv = AttributeTypeAndValue {
            oid,
            value: attribute_value(oid, value)?,
        };
        let set = SetOfVec::try_from(vec![atv])?;
        rdns.push(RelativeDistinguishedName(set));
    }

    Ok(RdnSequence(rdns))
}

fn attribute_value(oid: ObjectIdentifier, value: &str) -> Result<Any> {
    if oid == rfc4519::C {
        let printable = PrintableStringRef::new(value).map_err(|_| {
            PkiError::InvalidSubject(format!("country {value:?} is not printable"))
        })?;
        return Ok(Any::from(printable));
    }
    Ok(Any::from(Utf8StringRef::new(value)?))
}

/// UTCTime through 2049, GeneralizedTime afterwards (RFC 5280 4.1.2.5).
pub fn to_x509_time(t: OffsetDateTime) -> Result<Time> {
    let secs = u64::try_from(t.unix_timestamp())
        .map_err(|_| PkiError::InvalidValidity(format!("{t} predates the unix epoch")))?;
    let duration = Duration::from_secs(secs);

    if t.year() <= i32::from(UtcTime::MAX_YEAR) {
        Ok(Time::UtcTime(UtcTime::from_unix_duration(duration)?))
    } else {
        Ok(Time::GeneralTime(GeneralizedTime::from_unix_duration(duration)?))
    }
}

pub fn from_x509_time(t: Time) -> Result<OffsetDateTime> {
    let secs = i64::try_from(t.to_unix_duration().as_secs())
        .map_err(|_| PkiError::ParseError("validity time out of range".to_string()))?;
    OffsetDateTime::from_unix_timestamp(secs)
        .map_err(|e| PkiError::ParseError(format!("validity time out of range: {e}")))
}
