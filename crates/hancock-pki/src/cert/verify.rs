use der::{Decode, Encode};
use x509_cert::Certificate;

use crate::error::{PkiError, Result};

/// Check that `child_der` was issued by `issuer_der`: the child's issuer
/// name is the issuer's subject and the child's signature verifies under
/// the issuer's public key.
pub fn verify_issued_by(child_der: &[u8], issuer_der: &[u8]) -> Result<()> {
    let child = Certificate::from_der(child_der)
        .map_err(|e| PkiError::ParseError(format!("child certificate: {e}")))?;
    let issuer = Certificate::from_der(issuer_der)
        .map_err(|e| PkiError::ParseError(format!("issuer certificate: {e}")))?;

    if child.tbs_certificate.issuer != issuer.tbs_certificate.subject {
        return Err(PkiError::VerificationFailed(format!(
            "issuer {} does not match {}",
            child.tbs_certificate.issuer, issuer.tbs_certificate.subject
        )));
    }

    let message = child.tbs_certificate.to_der()?;
    let signature = child
        .signature
        .as_bytes()
        .ok_or_else(|| PkiError::ParseError("signature has unused bits".to_string()))?;
    let issuer_spki = issuer.tbs_certificate.subject_public_key_info.to_der()?;

    let valid = hancock_crypto::verify_signature(&issuer_spki, &message, signature)
        .map_err(|e| PkiError::VerificationFailed(e.to_string()))?;

    if valid {
        Ok(())
    } else {
        Err(PkiError::VerificationFailed(
            "signature does not verify under the issuer key".to_string(),
        ))
    }
}
