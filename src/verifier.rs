//! Verification orchestration.
//!
//! One linear pass per call: SubFilter check → signature extraction →
//! envelope decode → chain analysis → integrity check → combined verdict.
//! Any stage failure short-circuits into a negative result; a raw decode or
//! crypto error never escapes to the caller.

use crate::error::{Error, Result};
use crate::types::{CertificateDetails, VerificationMeta, VerificationResult};
use crate::{byterange, chain, envelope, integrity};

/// Verify the signature embedded in a PDF buffer.
///
/// Always returns a value. On success, `verified` combines the three
/// independent facts — `integrity && authenticity && !expired` — and `meta`
/// carries the ordered certificate details plus the signer-asserted
/// reason/contact/location strings. On any internal failure the result
/// collapses to `verified: false` with the error kind and message preserved.
///
/// ```no_run
/// let pdf = std::fs::read("signed.pdf").unwrap();
/// let result = pdf_verify::verify_pdf(&pdf);
/// if result.verified {
///     println!("signed by {:?}", result.meta.certs[0].common_name);
/// }
/// ```
pub fn verify_pdf(pdf: impl AsRef<[u8]>) -> VerificationResult {
    match verify_inner(pdf.as_ref()) {
        Ok(result) => result,
        Err(err) => {
            log::debug!("verification collapsed to failure: {}", err);
            VerificationResult::failure(&err)
        },
    }
}

fn verify_inner(buf: &[u8]) -> Result<VerificationResult> {
    if buf.is_empty() {
        return Err(Error::InputType);
    }
    envelope::check_sub_filter(buf)?;

    let extracted = byterange::extract_signature(buf)?;
    let message = envelope::decode_envelope(&extracted.signature_hex)?;

    let analysis = chain::analyze_chain(&message.certificates)?;
    let integrity =
        integrity::verify_integrity(&message, &extracted.signed_data, &analysis.certificates[0])?;

    Ok(VerificationResult {
        verified: integrity && analysis.authenticity && !analysis.expired,
        authenticity: analysis.authenticity,
        integrity,
        expired: analysis.expired,
        meta: VerificationMeta {
            certs: analysis.details,
            signature_meta: extracted.signature_meta,
        },
        message: None,
        error: None,
    })
}

/// Extract certificate details from a signed PDF without running the
/// cryptographic checks.
///
/// Unlike [`verify_pdf`] this propagates errors, since there is no verdict
/// to collapse into.
pub fn get_certificates_info(pdf: impl AsRef<[u8]>) -> Result<Vec<CertificateDetails>> {
    let buf = pdf.as_ref();
    if buf.is_empty() {
        return Err(Error::InputType);
    }
    let extracted = byterange::extract_signature(buf)?;
    let message = envelope::decode_envelope(&extracted.signature_hex)?;
    chain::certificate_details(&message.certificates)
}
