//! Certificate construction, signing and inspection

pub mod parse;
pub mod signer;
pub mod template;
pub mod types;
pub mod usage;
pub mod verify;

pub use parse::{parse_certificate, pkix_name, project};
pub use signer::sign_certificate;
pub use template::CertificateTemplate;
pub use types::{
    CertificateLight, CertificateRecord, CertificateResponse, CertificateType, CreateCaRequest,
    CreateCertificateRequest, PkixName, Subject,
};
pub use usage::Usages;
pub use verify::verify_issued_by;
