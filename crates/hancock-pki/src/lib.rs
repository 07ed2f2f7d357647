//! X.509 certificate authority engine for Hancock.
//!
//! Root and intermediate CAs, leaf issuance, chain verification and
//! owner-scoped certificate storage, on top of `hancock-key`.

pub mod cert;
pub mod config;
pub mod error;
pub mod service;
pub mod store;

pub use cert::{
    parse_certificate, project, sign_certificate, verify_issued_by, CertificateLight,
    CertificateRecord, CertificateResponse, CertificateTemplate, CertificateType,
    CreateCaRequest, CreateCertificateRequest, PkixName, Subject, Usages,
};
pub use config::{PkiConfig, SerialNumberPolicy};
pub use error::{PkiError, Result};
pub use service::CertificateService;
pub use store::{CertRepository, FileCertRepository, MemoryCertRepository};
