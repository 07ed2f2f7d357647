use std::{fmt, str::FromStr};

use hancock_key::types::base64_bytes;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::PkiError;

/// Role of a certificate in the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateType {
    RootCa,
    IntermediateCa,
    Certificate,
}

impl CertificateType {
    pub const ALL: [CertificateType; 3] = [
        CertificateType::RootCa,
        CertificateType::IntermediateCa,
        CertificateType::Certificate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateType::RootCa => "root_ca",
            CertificateType::IntermediateCa => "intermediate_ca",
            CertificateType::Certificate => "certificate",
        }
    }

    pub fn is_ca(&self) -> bool {
        matches!(self, CertificateType::RootCa | CertificateType::IntermediateCa)
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateType {
    type Err = PkiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CertificateType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PkiError::InvalidCertificateType(s.to_string()))
    }
}

/// Subject attributes of a certificate. Empty fields are left out of the
/// encoded distinguished name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subject {
    pub common_name: String,
    pub organization: String,
    pub country: String,
    pub province: String,
    pub locality: String,
    pub street_address: String,
    pub postal_code: String,
}

impl Subject {
    pub fn common_name(name: impl Into<String>) -> Self {
        Self {
            common_name: name.into(),
            ..Default::default()
        }
    }
}

/// Request to create a root or intermediate CA. The CA's common name is
/// its `name`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaRequest {
    pub name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expiration: OffsetDateTime,
    #[serde(rename = "parentCA", default)]
    pub parent_ca: Option<Uuid>,
    #[serde(default)]
    pub parent_key_password: String,
    #[serde(rename = "key")]
    pub key_id: Uuid,
    #[serde(default)]
    pub key_password: String,
}

impl CreateCaRequest {
    pub fn subject(&self) -> Subject {
        Subject {
            common_name: self.name.clone(),
            organization: self.organization.clone(),
            country: self.country.clone(),
            province: self.state.clone(),
            locality: self.locality.clone(),
            street_address: self.street_address.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}

/// Request to issue a leaf certificate under a CA
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificateRequest {
    pub name: String,
    pub key_id: Uuid,
    #[serde(default)]
    pub key_password: String,
    #[serde(default)]
    pub key_usages: Vec<String>,
    pub common_name: String,
    #[serde(default)]
    pub subject_alternative_names: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub expiration: OffsetDateTime,
    #[serde(rename = "caKeyPassword", default)]
    pub ca_key_password: String,
}

/// Stored certificate. `data` is the DER encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub cert_type: CertificateType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub key_id: Uuid,
    pub parent_id: Option<Uuid>,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateLight {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
    #[serde(rename = "created", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&CertificateRecord> for CertificateLight {
    fn from(record: &CertificateRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            cert_type: record.cert_type,
            created_at: record.created_at,
        }
    }
}

/// Distinguished name as reported to callers. Multi-valued attributes keep
/// every occurrence in encoding order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PkixName {
    pub common_name: String,
    pub serial_number: String,
    pub country: Vec<String>,
    pub organization: Vec<String>,
    pub organizational_unit: Vec<String>,
    pub locality: Vec<String>,
    pub province: Vec<String>,
    pub street_address: Vec<String>,
    pub postal_code: Vec<String>,
}

/// Full projection of a stored certificate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
    #[serde(rename = "created", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub key_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub signature_algorithm: String,
    pub public_key_algorithm: String,
    pub version: u8,
    /// Hex, uppercase, no separators
    pub serial_number: String,
    pub issuer: PkixName,
    pub subject: PkixName,
    #[serde(with = "time::serde::rfc3339")]
    pub not_before: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub not_after: OffsetDateTime,
    #[serde(rename = "isCA")]
    pub is_ca: bool,
    /// -1 when no path length constraint is present
    pub max_path_len: i32,
    pub max_path_len_zero: bool,
    pub key_usage: Vec<String>,
    pub ext_key_usage: Vec<String>,
    #[serde(rename = "dnsNames")]
    pub dns_names: Vec<String>,
    pub subject_key_id: Option<String>,
    pub authority_key_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_type_names() {
        for t in CertificateType::ALL {
            assert_eq!(t.as_str().parse::<CertificateType>().unwrap(), t);
            assert_eq!(serde_json::to_string(&t).unwrap(), format!("\"{}\"", t));
        }
        assert!(CertificateType::RootCa.is_ca());
        assert!(!CertificateType::Certificate.is_ca());
        assert!(matches!(
            "leaf".parse::<CertificateType>(),
            Err(PkiError::InvalidCertificateType(_))
        ));
    }

    #[test]
    fn test_ca_request_wire_names() {
        let json = serde_json::json!({
            "name": "Root",
            "country": "US",
            "expiration": "2040-01-01T00:00:00Z",
            "key": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "keyPassword": "pw"
        });
        let request: CreateCaRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.parent_ca, None);
        assert_eq!(request.key_password, "pw");

        let subject = request.subject();
        assert_eq!(subject.common_name, "Root");
        assert_eq!(subject.country, "US");
        assert!(subject.organization.is_empty());
    }
}
